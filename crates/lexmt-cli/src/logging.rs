use std::io;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "lexmt=debug"
    } else {
        "lexmt=info"
    }
}

/// Install the global subscriber. Events go to stderr so translations on
/// stdout stay clean. Later calls are no-ops.
pub fn init_logging(verbose: bool, json: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
        let builder = tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(filter);
        if json {
            builder.json().with_target(true).init();
        } else {
            builder.with_target(false).init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "lexmt=info");
        assert_eq!(default_directive(true), "lexmt=debug");
    }
}
