use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::{LanguageModel, LmError};

const UNK: &str = "<unk>";
const DEFAULT_UNKNOWN_LOGPROB: f64 = -99.0;

#[derive(Debug, Clone, Copy)]
struct NgramEntry {
    logprob: f64,
    backoff: f64,
}

/// Back-off n-gram model read from the ARPA text format.
///
/// `grams[k]` holds the (k+1)-grams keyed by their space-joined words.
pub struct ArpaModel {
    grams: Vec<HashMap<String, NgramEntry>>,
    unknown_logprob: f64,
    has_unk: bool,
}

enum Section {
    Preamble,
    Data,
    Ngrams(usize),
    End,
}

impl ArpaModel {
    pub fn from_text(text: &str) -> Result<Self, LmError> {
        let mut section = Section::Preamble;
        let mut declared: Vec<usize> = Vec::new();
        let mut grams: Vec<HashMap<String, NgramEntry>> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line == "\\data\\" {
                section = Section::Data;
                continue;
            }
            if line == "\\end\\" {
                section = Section::End;
                break;
            }
            if let Some(n) = parse_section_header(line) {
                if n == 0 || n > declared.len() {
                    return Err(parse_err(line_no, format!("unexpected section {n}-grams")));
                }
                section = Section::Ngrams(n);
                continue;
            }

            match section {
                Section::Preamble | Section::End => {}
                Section::Data => {
                    let (n, count) = parse_count(line)
                        .ok_or_else(|| parse_err(line_no, format!("bad count line: {line}")))?;
                    if n != declared.len() + 1 {
                        return Err(parse_err(line_no, format!("ngram {n} out of order")));
                    }
                    declared.push(count);
                    grams.push(HashMap::with_capacity(count));
                }
                Section::Ngrams(n) => {
                    let (key, entry) = parse_entry(line, n).ok_or_else(|| {
                        parse_err(line_no, format!("bad {n}-gram entry: {line}"))
                    })?;
                    grams[n - 1].insert(key, entry);
                }
            }
        }

        if !matches!(section, Section::End) {
            return Err(parse_err(text.lines().count(), "missing \\end\\".to_string()));
        }
        if grams.first().map_or(true, HashMap::is_empty) {
            return Err(parse_err(0, "model has no unigrams".to_string()));
        }
        for (k, (map, &count)) in grams.iter().zip(&declared).enumerate() {
            if map.len() != count {
                warn!(
                    order = k + 1,
                    declared = count,
                    found = map.len(),
                    "ARPA n-gram count mismatch"
                );
            }
        }

        let has_unk = grams[0].contains_key(UNK);
        Ok(Self {
            grams,
            unknown_logprob: DEFAULT_UNKNOWN_LOGPROB,
            has_unk,
        })
    }

    pub fn open(path: &Path) -> Result<Self, LmError> {
        let text = fs::read_to_string(path)?;
        let model = Self::from_text(&text)?;
        info!(
            path = %path.display(),
            order = model.order(),
            unigrams = model.grams[0].len(),
            "loaded language model"
        );
        Ok(model)
    }

    /// log10 probability used for words absent from the model when it has no
    /// `<unk>` entry.
    pub fn with_unknown_logprob(mut self, logprob: f64) -> Self {
        self.unknown_logprob = logprob;
        self
    }

    /// Highest n-gram order present.
    pub fn order(&self) -> usize {
        self.grams.len()
    }

    fn normalize<'w>(&self, word: &'w str) -> &'w str {
        if self.has_unk && !self.grams[0].contains_key(word) {
            UNK
        } else {
            word
        }
    }

    /// Katz back-off: use the full n-gram if present, else charge the
    /// context's back-off weight and retry with a shorter context.
    fn backoff_logprob(&self, words: &[&str]) -> f64 {
        let n = words.len();
        if let Some(entry) = self.grams[n - 1].get(&words.join(" ")) {
            return entry.logprob;
        }
        if n == 1 {
            return self.unknown_logprob;
        }
        let context = &words[..n - 1];
        let bow = self.grams[n - 2]
            .get(&context.join(" "))
            .map_or(0.0, |e| e.backoff);
        bow + self.backoff_logprob(&words[1..])
    }
}

impl LanguageModel for ArpaModel {
    fn score_ngram(&self, tokens: &[&str], order: usize) -> f64 {
        let n = order.min(self.order()).min(tokens.len());
        if n == 0 {
            return self.unknown_logprob;
        }
        let words: Vec<&str> = tokens[tokens.len() - n..]
            .iter()
            .map(|w| self.normalize(w))
            .collect();
        let score = self.backoff_logprob(&words);
        debug!(ngram = %words.join(" "), score, "lm score");
        score
    }
}

fn parse_err(line: usize, reason: String) -> LmError {
    LmError::Parse { line, reason }
}

/// `\2-grams:` → 2
fn parse_section_header(line: &str) -> Option<usize> {
    line.strip_prefix('\\')?
        .strip_suffix("-grams:")?
        .parse()
        .ok()
}

/// `ngram 2=1234` → (2, 1234)
fn parse_count(line: &str) -> Option<(usize, usize)> {
    let rest = line.strip_prefix("ngram")?.trim();
    let (n, count) = rest.split_once('=')?;
    Some((n.trim().parse().ok()?, count.trim().parse().ok()?))
}

fn parse_entry(line: &str, n: usize) -> Option<(String, NgramEntry)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < n + 1 {
        return None;
    }
    let logprob: f64 = fields[0].parse().ok()?;
    let backoff = match fields.get(n + 1) {
        Some(b) => b.parse().ok()?,
        None => 0.0,
    };
    Some((fields[1..=n].join(" "), NgramEntry { logprob, backoff }))
}
