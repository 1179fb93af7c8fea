use std::fmt;

/// Where the decoder reports progress, candidate dumps and coverage.
pub trait DecodeSink {
    fn info(&self, args: fmt::Arguments<'_>);
    fn debug(&self, args: fmt::Arguments<'_>);
}

/// Forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DecodeSink for TracingSink {
    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!("{}", args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!("{}", args);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DecodeSink for NullSink {
    fn info(&self, _args: fmt::Arguments<'_>) {}

    fn debug(&self, _args: fmt::Arguments<'_>) {}
}
