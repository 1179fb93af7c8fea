use std::fs;
use std::path::Path;
use std::process;

use lexmt_core::settings::{parse_settings_toml, Settings};

use crate::error::CliError;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Settings from `path`, or the embedded defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_settings_toml(&content)?)
}

pub fn settings_export() {
    print!("{}", lexmt_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let s = die!(load_settings(Some(Path::new(file))), "Error: {}");
    println!(
        "OK: decoder.window={}, decoder.context_size={}, lexicon.min_total={}, gazetteer.tags={}",
        s.decoder.window,
        s.decoder.context_size,
        s.lexicon.min_total,
        s.gazetteer.tags.join(",")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_settings_default() {
        let s = load_settings(None).unwrap();
        assert_eq!(s.decoder.window, 4);
    }

    #[test]
    fn test_load_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let custom = lexmt_core::settings::default_toml().replace("window = 4", "window = 2");
        fs::write(&path, custom).unwrap();
        let s = load_settings(Some(&path)).unwrap();
        assert_eq!(s.decoder.window, 2);
    }

    #[test]
    fn test_load_settings_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            load_settings(Some(&missing)),
            Err(CliError::Read { .. })
        ));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[decoder\nwindow = ").unwrap();
        assert!(matches!(load_settings(Some(&bad)), Err(CliError::Config(_))));
    }
}
