//! Weighted source → target phrase table.
//!
//! `PhraseTable` maps a space-joined source phrase to its target candidates.
//! Candidates keep insertion order, which is also the tie-break order used
//! when two candidates score the same. `lexicon` builds tables from text
//! lexicons; `io` reads and writes the compiled `LXPT` format.

mod io;
pub mod lexicon;

use std::collections::HashMap;
use std::io as std_io;

use serde::{Deserialize, Serialize};

use crate::settings::ConfigError;

pub use lexicon::{
    load_for_pair, load_lexicon, load_table, parse_lexicon, resolve_lexicon_path, LexiconStats,
    Method, COMPILED_EXTENSION,
};
pub use io::MAGIC;

#[derive(Debug, thiserror::Error)]
pub enum PhraseTableError {
    #[error("IO error: {0}")]
    Io(#[from] std_io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected LXPT)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("checksum mismatch (expected {expected:08x}, got {actual:08x})")]
    Checksum { expected: u32, actual: u32 },

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One translation option for a source phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseCandidate {
    pub target: String,
    /// Prior score, already normalised by the loader. Not necessarily a
    /// distribution.
    pub weight: f64,
}

impl PhraseCandidate {
    pub fn new(target: impl Into<String>, weight: f64) -> Self {
        Self {
            target: target.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PhraseTable {
    entries: HashMap<String, Vec<PhraseCandidate>>,
}

impl PhraseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<PhraseCandidate>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Exact (case-sensitive) lookup.
    pub fn lookup(&self, phrase: &str) -> Option<&[PhraseCandidate]> {
        self.entries.get(phrase).map(Vec::as_slice)
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.entries.contains_key(phrase)
    }

    /// Create or overwrite the entry for `phrase`. Weights are stored as given.
    pub fn insert(&mut self, phrase: impl Into<String>, candidates: Vec<PhraseCandidate>) {
        self.entries.insert(phrase.into(), candidates);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all `(phrase, candidates)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PhraseCandidate])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns (phrase_count, candidate_count).
    pub fn stats(&self) -> (usize, usize) {
        let candidates = self.entries.values().map(Vec::len).sum();
        (self.entries.len(), candidates)
    }
}
