//! Text lexicon loading and normalisation.
//!
//! Lexicon lines are `source<TAB>target[<TAB>count]`. Counts for a source
//! phrase are normalised into prior weights: `count / max(min_total, Σ counts)`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use super::{PhraseCandidate, PhraseTable, PhraseTableError};
use crate::settings::{ConfigError, LexiconSettings};

/// Extension of compiled phrase tables; anything else is read as a text lexicon.
pub const COMPILED_EXTENSION: &str = "lxpt";

/// How the phrase table is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Lexicon,
    /// Online translation mapping. Not available.
    Google,
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexicon" => Ok(Self::Lexicon),
            "google" => Ok(Self::Google),
            other => Err(ConfigError::UnsupportedMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexiconStats {
    pub lines: usize,
    pub skipped: usize,
    pub pairs: usize,
}

/// Parse a text lexicon. Blank lines, `#` comments and lines that do not
/// parse are skipped and counted in `LexiconStats::skipped`.
///
/// Candidates end up ordered by descending weight; equal weights keep the
/// order in which their targets first appear in the lexicon.
pub fn parse_lexicon(text: &str, min_total: f64) -> (PhraseTable, LexiconStats) {
    let mut stats = LexiconStats::default();
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, Vec<(String, f64)>> = HashMap::new();

    for line in text.lines() {
        stats.lines += 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            stats.skipped += 1;
            continue;
        }
        let Some((source, target, count)) = parse_line(line) else {
            stats.skipped += 1;
            continue;
        };
        stats.pairs += 1;

        let targets = counts.entry(source.to_string()).or_insert_with(|| {
            order.push(source.to_string());
            Vec::new()
        });
        match targets.iter_mut().find(|(t, _)| t == target) {
            Some((_, c)) => *c += count,
            None => targets.push((target.to_string(), count)),
        }
    }

    let mut table = PhraseTable::new();
    for source in order {
        let Some(targets) = counts.remove(&source) else {
            continue;
        };
        table.insert(source, normalize(targets, min_total));
    }
    (table, stats)
}

fn parse_line(line: &str) -> Option<(&str, &str, f64)> {
    let mut fields = line.split('\t');
    let source = fields.next()?.trim();
    let target = fields.next()?.trim();
    if source.is_empty() || target.is_empty() {
        return None;
    }
    let count = match fields.next().map(str::trim) {
        Some(c) if !c.is_empty() => c.parse::<f64>().ok()?,
        _ => 1.0,
    };
    if !count.is_finite() || count < 0.0 {
        return None;
    }
    Some((source, target, count))
}

fn normalize(targets: Vec<(String, f64)>, min_total: f64) -> Vec<PhraseCandidate> {
    let total = targets.iter().map(|(_, c)| c).sum::<f64>().max(min_total);
    let mut candidates: Vec<PhraseCandidate> = targets
        .into_iter()
        .map(|(target, count)| PhraseCandidate::new(target, count / total))
        .collect();
    // Stable: ties keep lexicon order.
    candidates.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    candidates
}

/// Read a text lexicon from disk.
pub fn load_lexicon(
    path: &Path,
    min_total: f64,
) -> Result<(PhraseTable, LexiconStats), PhraseTableError> {
    let text = fs::read_to_string(path)?;
    let (table, stats) = parse_lexicon(&text, min_total);
    info!(
        path = %path.display(),
        phrases = table.len(),
        pairs = stats.pairs,
        skipped = stats.skipped,
        "loaded lexicon"
    );
    Ok((table, stats))
}

/// Where the phrase table for a language pair lives: the named lexicon if
/// one is given, otherwise `<dir>/<source>-<target>.tsv`.
pub fn resolve_lexicon_path(
    method: Method,
    source: &str,
    target: &str,
    named: Option<&Path>,
    settings: &LexiconSettings,
) -> Result<PathBuf, ConfigError> {
    if method == Method::Google {
        return Err(ConfigError::UnsupportedMethod("google".to_string()));
    }
    let path = match named {
        Some(p) => p.to_path_buf(),
        None => settings.dir.join(format!("{source}-{target}.tsv")),
    };
    if !path.is_file() {
        return Err(ConfigError::MissingLexicon {
            source_lang: source.to_string(),
            target_lang: target.to_string(),
            path,
        });
    }
    Ok(path)
}

/// Load the phrase table for a language pair. Compiled `.lxpt` files are
/// opened directly; anything else is parsed as a text lexicon.
pub fn load_for_pair(
    method: Method,
    source: &str,
    target: &str,
    named: Option<&Path>,
    settings: &LexiconSettings,
) -> Result<PhraseTable, PhraseTableError> {
    let path = resolve_lexicon_path(method, source, target, named, settings)?;
    load_table(&path, settings.min_total)
}

/// Open a phrase table from either a compiled `.lxpt` file or a text
/// lexicon, chosen by extension.
pub fn load_table(path: &Path, min_total: f64) -> Result<PhraseTable, PhraseTableError> {
    let is_compiled = path
        .extension()
        .is_some_and(|ext| ext == COMPILED_EXTENSION);
    if is_compiled {
        debug!(path = %path.display(), "opening compiled phrase table");
        return PhraseTable::open(path);
    }
    load_lexicon(path, min_total).map(|(table, _)| table)
}
