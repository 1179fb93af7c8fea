//! Language codes.

/// Source language of a decoding run. Selects the morphological expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    English,
    Uzbek,
    Other,
}

impl SourceLanguage {
    /// Parse a three-letter language code (`eng`, `uzb`, ...).
    pub fn from_code(code: &str) -> Self {
        match code {
            "eng" => Self::English,
            "uzb" => Self::Uzbek,
            _ => Self::Other,
        }
    }
}

/// Map a three-letter code to its two-letter form. Unknown codes are
/// returned as given.
pub fn iso639_1(code: &str) -> &str {
    match code {
        "eng" => "en",
        "ben" => "bn",
        "hin" => "hi",
        "mal" => "ml",
        "nld" => "nl",
        "rus" => "ru",
        "spa" => "es",
        "tam" => "ta",
        "tgl" => "tl",
        "tur" => "tr",
        "uig" => "ug",
        "urd" => "ur",
        "uzb" => "uz",
        "yor" => "yo",
        "deu" => "de",
        "fra" => "fr",
        other => other,
    }
}
