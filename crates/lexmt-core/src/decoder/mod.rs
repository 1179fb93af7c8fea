//! Greedy longest-phrase decoding of tagged token sequences.
//!
//! At each position the decoder opens a window of up to `window` tokens
//! (never across a sentence boundary), then tries phrase lengths from the
//! longest down to one. The first length whose phrase resolves in the phrase
//! table (exact, lowercase, morphological expansion, then gazetteer
//! fallback) wins; its candidates are scored against LM context built from
//! already-emitted output, and the winning target is realigned onto the
//! source rows. Tokens nothing matches are copied through and counted as
//! misses.
//!
//! Gazetteer fallback writes its pick into the phrase table, so later
//! occurrences of the same phrase reuse it. A pass therefore mutates the
//! table it reads and is order-dependent; run concurrent passes on separate
//! tables.

mod context;
mod ignore;
mod scorer;
mod sink;
#[cfg(test)]
mod testutil;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use rand::RngCore;
use tracing::debug_span;

use crate::gazetteer::{single_entity_type, Gazetteer};
use crate::lang::SourceLanguage;
use crate::lm::LanguageModel;
use crate::morph::Expander;
use crate::phrase_table::{PhraseCandidate, PhraseTable};
use crate::settings::Settings;
use crate::token::{continuation_tag, is_begin_tag, window_at, TaggedToken, Window};

pub use context::build_context;
pub use ignore::IgnoreSet;
pub use scorer::{finalize_target, score_candidates, select_best, ScoredCandidate};
pub use sink::{DecodeSink, NullSink, TracingSink};

static DEFAULT_SINK: TracingSink = TracingSink;

/// Decoder parameters, normally derived from `Settings`.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    pub window: usize,
    pub context_size: usize,
    pub epsilon: f64,
    pub progress_step: f64,
    pub top_missed: usize,
    pub ignore: IgnoreSet,
    pub expander: Option<Expander>,
}

impl DecodeConfig {
    pub fn from_settings(settings: &Settings, source: SourceLanguage) -> Self {
        let d = &settings.decoder;
        Self {
            window: d.window.max(1),
            context_size: d.context_size,
            epsilon: d.epsilon,
            progress_step: d.progress_step,
            top_missed: d.top_missed,
            ignore: IgnoreSet::from_settings(&settings.ignore),
            expander: Expander::for_language(source),
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), SourceLanguage::English)
    }
}

/// Which lookup stage resolved a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Exact,
    Lowercase,
    Expanded,
    Gazetteer,
}

/// Find the phrase-table key for `phrase`: exact, then lowercase, then each
/// expander proposal in order. Returns the key that hit.
pub fn resolve_phrase(
    table: &PhraseTable,
    phrase: &str,
    expander: Option<&Expander>,
) -> Option<(String, Resolution)> {
    if table.contains(phrase) {
        return Some((phrase.to_string(), Resolution::Exact));
    }
    let lower = phrase.to_lowercase();
    if table.contains(&lower) {
        return Some((lower, Resolution::Lowercase));
    }
    expander?
        .expand(phrase)
        .into_iter()
        .find(|key| table.contains(key))
        .map(|key| (key, Resolution::Expanded))
}

/// Coverage counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Decision points: one per matched phrase or copied token.
    pub total: usize,
    /// Copied tokens outside the ignore set.
    pub missing: usize,
    pub missed_words: HashMap<String, usize>,
}

impl DecodeStats {
    /// Fraction of decision points that were translated. An empty pass has
    /// full coverage.
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.total - self.missing) as f64 / self.total as f64
    }

    /// The `n` most frequent missed words, most frequent first; ties are
    /// ordered by word.
    pub fn top_missed(&self, n: usize) -> Vec<(&str, usize)> {
        let mut words: Vec<(&str, usize)> = self
            .missed_words
            .iter()
            .map(|(w, &c)| (w.as_str(), c))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(n);
        words
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOutput {
    pub tokens: Vec<TaggedToken>,
    pub stats: DecodeStats,
}

/// One decoding pass configuration plus the resources it reads.
///
/// The phrase table is borrowed mutably because gazetteer fallback inserts
/// into it.
pub struct Decoder<'a> {
    table: &'a mut PhraseTable,
    config: DecodeConfig,
    lm: Option<&'a dyn LanguageModel>,
    gazetteer: Option<(&'a Gazetteer, &'a mut dyn RngCore)>,
    sink: &'a dyn DecodeSink,
}

impl<'a> Decoder<'a> {
    pub fn new(table: &'a mut PhraseTable, config: DecodeConfig) -> Self {
        Self {
            table,
            config,
            lm: None,
            gazetteer: None,
            sink: &DEFAULT_SINK,
        }
    }

    pub fn with_lm(mut self, lm: &'a dyn LanguageModel) -> Self {
        self.lm = Some(lm);
        self
    }

    /// Enable gazetteer fallback. `rng` drives the candidate pick.
    pub fn with_gazetteer(mut self, gazetteer: &'a Gazetteer, rng: &'a mut dyn RngCore) -> Self {
        self.gazetteer = Some((gazetteer, rng));
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn DecodeSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Translate `tokens`. Every non-boundary input token is either part of
    /// a translated span or copied to the output unchanged.
    pub fn decode(&mut self, tokens: &[TaggedToken]) -> DecodeOutput {
        let _span = debug_span!("decode", rows = tokens.len()).entered();
        let mut output: Vec<TaggedToken> = Vec::with_capacity(tokens.len());
        let mut stats = DecodeStats::default();
        let mut progress = 0.0f64;
        let mut i = 0usize;

        while i < tokens.len() {
            let fraction = i as f64 / tokens.len() as f64;
            if fraction > progress + self.config.progress_step {
                self.sink.info(format_args!("progress {:.1}%", fraction * 100.0));
                progress = fraction;
            }

            let Some(window) = window_at(tokens, i, self.config.window) else {
                output.push(TaggedToken::boundary());
                i += 1;
                continue;
            };

            match self.translate_longest(window, &mut output) {
                Some(consumed) => i += consumed,
                None => {
                    let first = &window.tokens()[0];
                    let word = first.word().unwrap_or_default();
                    if !self.config.ignore.contains(word) {
                        stats.missing += 1;
                        *stats.missed_words.entry(word.to_string()).or_default() += 1;
                    }
                    output.push(first.clone());
                    i += 1;
                }
            }
            stats.total += 1;
        }

        self.report(&stats);
        DecodeOutput {
            tokens: output,
            stats,
        }
    }

    /// Try phrase lengths from `window.len()` down to 1. On the first hit,
    /// append the realigned rows and return how many source tokens were
    /// consumed.
    fn translate_longest(
        &mut self,
        window: Window<'_>,
        output: &mut Vec<TaggedToken>,
    ) -> Option<usize> {
        for len in (1..=window.len()).rev() {
            let span = window.prefix(len);
            let phrase = span.phrase();
            let Some((key, resolution)) = self.resolve(&phrase, span) else {
                continue;
            };
            let Some(candidates) = self.table.lookup(&key) else {
                continue;
            };
            let Some(target) = self.choose(&key, candidates, output) else {
                continue;
            };
            let target_words: Vec<&str> = target.split_whitespace().collect();
            if target_words.is_empty() {
                continue;
            }
            self.sink.debug(format_args!(
                "{phrase} -> {target} ({resolution:?}, key {key:?})"
            ));
            realign(span, &target_words, output);
            return Some(len);
        }
        None
    }

    /// Phrase-table resolution followed by gazetteer fallback.
    fn resolve(&mut self, phrase: &str, span: Window<'_>) -> Option<(String, Resolution)> {
        if let Some(hit) = resolve_phrase(self.table, phrase, self.config.expander.as_ref()) {
            return Some(hit);
        }
        let (gazetteer, rng) = self.gazetteer.as_mut()?;
        let tags: Vec<&str> = span.tags().collect();
        let entity = single_entity_type(&tags)?;
        let pick = gazetteer.pick(entity, &mut **rng)?;
        self.sink.debug(format_args!(
            "gazetteer {entity}: {phrase} -> {pick}"
        ));
        self.table
            .insert(phrase, vec![PhraseCandidate::new(pick, 1.0)]);
        Some((phrase.to_string(), Resolution::Gazetteer))
    }

    /// Score candidates against the current output and return the finalized
    /// winning target.
    fn choose(
        &self,
        key: &str,
        candidates: &[PhraseCandidate],
        output: &[TaggedToken],
    ) -> Option<String> {
        let context = build_context(output, self.config.context_size);
        let mut scored = score_candidates(candidates, &context, self.lm, self.config.epsilon);
        let best = select_best(&scored)?.candidate;

        scored.sort_by(|a, b| a.score.total_cmp(&b.score));
        for s in &scored {
            self.sink
                .debug(format_args!("{key} : {} ({})", s.candidate.target, s.score));
        }
        Some(finalize_target(&best.target, output))
    }

    fn report(&self, stats: &DecodeStats) {
        self.sink.info(format_args!(
            "translated {:.4} of the corpus ({} of {} decisions missed)",
            stats.coverage(),
            stats.missing,
            stats.total
        ));
        let top = stats.top_missed(self.config.top_missed);
        if top.is_empty() {
            return;
        }
        self.sink.debug(format_args!("most frequent missed words:"));
        for (word, count) in top {
            self.sink.debug(format_args!("{word} : {count}"));
        }
    }
}

/// Write one output row per target word. Row `k` copies source row
/// `min(k, span.len() - 1)` with its word replaced; when a single `B-` token
/// fans out to several words, the extra rows continue the entity as `I-`.
fn realign(span: Window<'_>, target_words: &[&str], output: &mut Vec<TaggedToken>) {
    let rows = span.tokens();
    let last = rows.len() - 1;
    let fan_out_tag = match rows {
        [only] => only
            .tag()
            .filter(|t| is_begin_tag(t))
            .and_then(continuation_tag),
        _ => None,
    };
    for (k, word) in target_words.iter().enumerate() {
        let mut row = rows[k.min(last)].with_word(word);
        if k > 0 {
            if let Some(tag) = &fan_out_tag {
                row = row.with_tag(tag);
            }
        }
        output.push(row);
    }
}
