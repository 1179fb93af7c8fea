//! Tagged token rows and decoding windows.
//!
//! A `TaggedToken` is one CoNLL row: the BIO tag sits in column 0 and the
//! word in column 5. Rows without a word column are sentence boundaries.

/// Column holding the BIO tag.
pub const TAG_COLUMN: usize = 0;
/// Column holding the surface word.
pub const WORD_COLUMN: usize = 5;
/// Stand-in for an empty word field, keeps the column layout intact.
pub const PLACEHOLDER_WORD: &str = "x";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaggedToken {
    columns: Vec<String>,
}

impl TaggedToken {
    /// A sentence boundary (blank line).
    pub fn boundary() -> Self {
        Self::default()
    }

    /// Build a row from raw columns. Rows shorter than `WORD_COLUMN + 1`
    /// carry no word and behave as boundaries.
    pub fn from_columns(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Build a nine-column row with placeholder auxiliary columns.
    pub fn new(tag: &str, word: &str) -> Self {
        let mut columns = vec![PLACEHOLDER_WORD.to_string(); 9];
        columns[TAG_COLUMN] = tag.to_string();
        columns[WORD_COLUMN] = word.to_string();
        Self { columns }
    }

    pub fn word(&self) -> Option<&str> {
        self.columns.get(WORD_COLUMN).map(String::as_str)
    }

    pub fn tag(&self) -> Option<&str> {
        if self.is_boundary() {
            return None;
        }
        self.columns.get(TAG_COLUMN).map(String::as_str)
    }

    pub fn is_boundary(&self) -> bool {
        self.word().is_none()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Copy of this row with the word column replaced.
    pub fn with_word(&self, word: &str) -> Self {
        let mut row = self.clone();
        if let Some(slot) = row.columns.get_mut(WORD_COLUMN) {
            *slot = word.to_string();
        }
        row
    }

    /// Copy of this row with the tag column replaced.
    pub fn with_tag(&self, tag: &str) -> Self {
        let mut row = self.clone();
        if let Some(slot) = row.columns.get_mut(TAG_COLUMN) {
            *slot = tag.to_string();
        }
        row
    }
}

/// True when a tag opens an entity (`B-...`).
pub fn is_begin_tag(tag: &str) -> bool {
    tag.starts_with('B')
}

/// Entity-type suffix of a BIO tag: everything after the two-character
/// prefix. `O` and other short tags yield an empty string.
pub fn entity_type(tag: &str) -> &str {
    tag.get(2..).unwrap_or("")
}

/// `B-PER` → `I-PER`. Tags without a type suffix have no continuation.
pub fn continuation_tag(tag: &str) -> Option<String> {
    tag.split_once('-').map(|(_, ty)| format!("I-{ty}"))
}

/// A run of consecutive non-boundary tokens.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    tokens: &'a [TaggedToken],
}

impl<'a> Window<'a> {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &'a [TaggedToken] {
        self.tokens
    }

    /// The first `len` tokens of this window.
    pub fn prefix(&self, len: usize) -> Window<'a> {
        Window {
            tokens: &self.tokens[..len.min(self.tokens.len())],
        }
    }

    pub fn words(&self) -> impl Iterator<Item = &'a str> {
        self.tokens.iter().filter_map(TaggedToken::word)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'a str> {
        self.tokens.iter().map(|t| t.tag().unwrap_or(""))
    }

    /// Space-joined words of the window.
    pub fn phrase(&self) -> String {
        self.words().collect::<Vec<_>>().join(" ")
    }
}

/// The longest run (at most `max_window`) of non-boundary tokens starting at
/// `i`. Returns `None` when the token at `i` is a boundary or `i` is past the
/// end; a window never extends across a boundary.
pub fn window_at(tokens: &[TaggedToken], i: usize, max_window: usize) -> Option<Window<'_>> {
    let rest = tokens.get(i..)?;
    let len = rest
        .iter()
        .take(max_window)
        .take_while(|t| !t.is_boundary())
        .count();
    if len == 0 {
        return None;
    }
    Some(Window {
        tokens: &rest[..len],
    })
}
