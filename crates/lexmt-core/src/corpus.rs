//! Corpus codec: CoNLL rows and plaintext sentences to and from
//! `TaggedToken` sequences.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::settings::ConfigError;
use crate::text::{ends_with_trailing_punctuation, TRAILING_PUNCTUATION};
use crate::token::{TaggedToken, PLACEHOLDER_WORD, WORD_COLUMN};

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: expected at least {} columns, found {columns}", WORD_COLUMN + 1)]
    MalformedRow { line: usize, columns: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorpusFormat {
    #[default]
    Conll,
    Plaintext,
}

impl FromStr for CorpusFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conll" => Ok(Self::Conll),
            "plaintext" => Ok(Self::Plaintext),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for CorpusFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Conll => "conll",
            Self::Plaintext => "plaintext",
        })
    }
}

/// Parse tab-separated rows. Blank or whitespace-only lines are boundaries;
/// an empty word column becomes the placeholder so the row stays a token.
pub fn read_conll(text: &str) -> Result<Vec<TaggedToken>, CorpusError> {
    let mut tokens = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            tokens.push(TaggedToken::boundary());
            continue;
        }
        let mut columns: Vec<String> = line.split('\t').map(str::to_string).collect();
        if columns.len() <= WORD_COLUMN {
            return Err(CorpusError::MalformedRow {
                line: idx + 1,
                columns: columns.len(),
            });
        }
        if columns[WORD_COLUMN].is_empty() {
            columns[WORD_COLUMN] = PLACEHOLDER_WORD.to_string();
        }
        tokens.push(TaggedToken::from_columns(columns));
    }
    Ok(tokens)
}

pub fn write_conll(tokens: &[TaggedToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        if !token.is_boundary() {
            out.push_str(&token.columns().join("\t"));
        }
        out.push('\n');
    }
    out
}

/// Split one plaintext sentence into untagged rows. A word ending in one of
/// `. , ! : ; "` yields its stem and the punctuation as separate rows.
pub fn plaintext_to_tokens(line: &str) -> Vec<TaggedToken> {
    let mut tokens = Vec::new();
    for word in line.split_whitespace() {
        match word.strip_suffix(TRAILING_PUNCTUATION) {
            Some(stem) => {
                if !stem.is_empty() {
                    tokens.push(TaggedToken::new("O", stem));
                }
                tokens.push(TaggedToken::new("O", &word[stem.len()..]));
            }
            None => tokens.push(TaggedToken::new("O", word)),
        }
    }
    tokens
}

/// One sentence per line; each line is followed by a boundary.
pub fn read_plaintext(text: &str) -> Vec<TaggedToken> {
    let mut tokens = Vec::new();
    for line in text.lines() {
        tokens.extend(plaintext_to_tokens(line));
        tokens.push(TaggedToken::boundary());
    }
    tokens
}

/// Join rows back into sentences, one per boundary. Punctuation-final
/// words attach to the previous word without a space.
pub fn write_plaintext(tokens: &[TaggedToken]) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut sentence = String::new();
    for token in tokens {
        match token.word() {
            None => {
                sentences.push(sentence.trim().to_string());
                sentence.clear();
            }
            Some(word) => {
                if !ends_with_trailing_punctuation(word) {
                    sentence.push(' ');
                }
                sentence.push_str(word);
            }
        }
    }
    if !sentence.is_empty() {
        sentences.push(sentence.trim().to_string());
    }
    sentences
}

pub fn read_file(path: &Path, format: CorpusFormat) -> Result<Vec<TaggedToken>, CorpusError> {
    let text = fs::read_to_string(path)?;
    let tokens = match format {
        CorpusFormat::Conll => read_conll(&text)?,
        CorpusFormat::Plaintext => read_plaintext(&text),
    };
    debug!(path = %path.display(), %format, rows = tokens.len(), "read corpus");
    Ok(tokens)
}

pub fn write_file(path: &Path, format: CorpusFormat, tokens: &[TaggedToken]) -> Result<(), CorpusError> {
    let text = match format {
        CorpusFormat::Conll => write_conll(tokens),
        CorpusFormat::Plaintext => {
            let mut text = write_plaintext(tokens).join("\n");
            text.push('\n');
            text
        }
    };
    fs::write(path, text)?;
    debug!(path = %path.display(), %format, rows = tokens.len(), "wrote corpus");
    Ok(())
}
