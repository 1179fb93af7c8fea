//! Heuristic stemmers that propose alternate dictionary keys.
//!
//! Only consulted after exact and lowercase lookups miss. Exactly one
//! expander is active per run, chosen from the source language.

use crate::lang::SourceLanguage;

const UZBEK_SUFFIXES: &[&str] = &[
    "ning", "lik", "lar", "ish", "dan", "idan", "ini", "lari", "ga", "ni",
];

/// Uzbek modifier letter turned comma (U+02BB).
const UZBEK_GLOTTAL: char = 'ʻ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expander {
    /// Strips plural `s` and past-tense `ed`.
    English,
    /// Strips case/plural suffixes and the glottal modifier.
    Uzbek,
}

impl Expander {
    pub fn for_language(lang: SourceLanguage) -> Option<Self> {
        match lang {
            SourceLanguage::English => Some(Self::English),
            SourceLanguage::Uzbek => Some(Self::Uzbek),
            SourceLanguage::Other => None,
        }
    }

    /// Alternate keys for `phrase`, in the order they should be tried.
    pub fn expand(&self, phrase: &str) -> Vec<String> {
        match self {
            Self::English => english_expand(phrase),
            Self::Uzbek => uzbek_expand(phrase),
        }
    }
}

fn english_expand(phrase: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(stem) = phrase.strip_suffix('s') {
        push_nonempty(&mut out, stem);
    }
    if let Some(stem) = phrase.strip_suffix("ed") {
        push_nonempty(&mut out, stem);
    }
    out
}

fn uzbek_expand(phrase: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut stem = phrase;
    let mut modified = false;
    loop {
        let mut stripped = false;
        // Each pass walks the whole list, so several suffixes can come off in one pass.
        for suffix in UZBEK_SUFFIXES {
            if let Some(rest) = stem.strip_suffix(suffix) {
                stem = rest;
                stripped = true;
                modified = true;
            }
        }
        if !stripped {
            break;
        }
    }
    if modified {
        push_nonempty(&mut out, stem);
    }
    if stem.contains(UZBEK_GLOTTAL) {
        push_nonempty(&mut out, &stem.replace(UZBEK_GLOTTAL, ""));
    }
    out
}

fn push_nonempty(out: &mut Vec<String>, s: &str) {
    if !s.is_empty() {
        out.push(s.to_string());
    }
}
