use std::collections::HashSet;

use crate::settings::IgnoreSettings;

/// Tokens whose misses are not counted: single ASCII punctuation
/// characters, decimal numbers `0..=max_number` written without leading
/// zeros, and a fixed list of literal tokens.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    max_number: u64,
    tokens: HashSet<String>,
}

impl IgnoreSet {
    pub fn new(max_number: u64, tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            max_number,
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn from_settings(s: &IgnoreSettings) -> Self {
        Self::new(s.max_number, s.tokens.iter().cloned())
    }

    pub fn contains(&self, word: &str) -> bool {
        is_single_punctuation(word) || self.is_small_number(word) || self.tokens.contains(word)
    }

    fn is_small_number(&self, word: &str) -> bool {
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if word.len() > 1 && word.starts_with('0') {
            return false;
        }
        word.parse::<u64>().is_ok_and(|n| n <= self.max_number)
    }
}

fn is_single_punctuation(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_punctuation())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> IgnoreSet {
        IgnoreSet::new(2049, ["-DOCSTART-".to_string(), "--".to_string()])
    }

    #[test]
    fn test_punctuation() {
        let s = set();
        for p in [".", ",", "!", "\"", "(", "$", "~"] {
            assert!(s.contains(p), "{p}");
        }
        assert!(!s.contains("..."));
        assert!(!s.contains("«"));
    }

    #[test]
    fn test_numbers() {
        let s = set();
        assert!(s.contains("0"));
        assert!(s.contains("1999"));
        assert!(s.contains("2049"));
        assert!(!s.contains("2050"));
        assert!(!s.contains("007"));
        assert!(!s.contains("3.5"));
    }

    #[test]
    fn test_literal_tokens() {
        let s = set();
        assert!(s.contains("-DOCSTART-"));
        assert!(s.contains("--"));
        assert!(!s.contains("house"));
    }
}
