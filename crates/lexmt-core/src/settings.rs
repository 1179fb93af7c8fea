//! Decoder settings loaded from TOML.
//!
//! - `parse_settings_toml(toml)` parses and validates a settings file
//! - `Settings::default()` parses the embedded defaults
//! - `default_toml()` returns the embedded `default_settings.toml`
//!
//! Settings are passed explicitly to whatever needs them; there is no
//! process-wide instance.

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

/// Setup failures. Any of these aborts a run before decoding starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("unsupported translation method: {0}")]
    UnsupportedMethod(String),
    #[error("no lexicon for {source_lang}-{target_lang} at {}", .path.display())]
    MissingLexicon {
        source_lang: String,
        target_lang: String,
        path: PathBuf,
    },
    #[error("unknown corpus format: {0}")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub decoder: DecoderSettings,
    pub ignore: IgnoreSettings,
    pub lexicon: LexiconSettings,
    pub gazetteer: GazetteerSettings,
    pub lm: LmSettings,
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("default settings TOML must be valid")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecoderSettings {
    pub window: usize,
    pub context_size: usize,
    pub epsilon: f64,
    pub progress_step: f64,
    pub top_missed: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IgnoreSettings {
    pub max_number: u64,
    #[serde(default)]
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconSettings {
    pub min_total: f64,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerSettings {
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LmSettings {
    pub unknown_logprob: f64,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, ConfigError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), ConfigError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(ConfigError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive_f64 {
        ($section:ident . $field:ident) => {
            if !(s.$section.$field > 0.0) {
                return Err(ConfigError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(decoder.window);
    check_positive_f64!(decoder.epsilon);
    check_positive_f64!(decoder.progress_step);
    check_positive_f64!(lexicon.min_total);

    if !s.lm.unknown_logprob.is_finite() || s.lm.unknown_logprob > 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "lm.unknown_logprob".to_string(),
            reason: "must be a finite log10 probability (<= 0)".to_string(),
        });
    }

    // context_size = 0 is allowed: the LM then scores each word without context.
    Ok(())
}
