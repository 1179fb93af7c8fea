//! N-gram language models used to disambiguate translation candidates.

mod arpa;

pub use arpa::ArpaModel;

use std::io;

/// Scoring oracle consulted by the decoder.
pub trait LanguageModel {
    /// log10 probability of the last token of `tokens` given at most
    /// `order - 1` tokens before it.
    fn score_ngram(&self, tokens: &[&str], order: usize) -> f64;
}

#[derive(Debug, thiserror::Error)]
pub enum LmError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}
