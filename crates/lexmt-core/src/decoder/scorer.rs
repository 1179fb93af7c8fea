use crate::lm::LanguageModel;
use crate::phrase_table::PhraseCandidate;
use crate::text::{capitalize_first, unescape_html};
use crate::token::TaggedToken;

/// A candidate with its combined score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'c> {
    pub candidate: &'c PhraseCandidate,
    pub score: f64,
}

/// Score every candidate with a non-empty target:
///
/// `score = lm(context + [first target word]) + ln(weight + epsilon)`
///
/// The LM is asked for order `context.len() + 1`. Without an LM only the
/// prior term remains. Output keeps candidate order.
pub fn score_candidates<'c>(
    candidates: &'c [PhraseCandidate],
    context: &[&str],
    lm: Option<&dyn LanguageModel>,
    epsilon: f64,
) -> Vec<ScoredCandidate<'c>> {
    let mut tokens: Vec<&str> = Vec::with_capacity(context.len() + 1);
    candidates
        .iter()
        .filter_map(|candidate| {
            let first = candidate.target.split_whitespace().next()?;
            let prior = (candidate.weight + epsilon).ln();
            let lm_score = lm.map_or(0.0, |lm| {
                tokens.clear();
                tokens.extend_from_slice(context);
                tokens.push(first);
                lm.score_ngram(&tokens, context.len() + 1)
            });
            Some(ScoredCandidate {
                candidate,
                score: lm_score + prior,
            })
        })
        .collect()
}

/// The first candidate with the strictly highest score.
pub fn select_best<'s, 'c>(scored: &'s [ScoredCandidate<'c>]) -> Option<&'s ScoredCandidate<'c>> {
    let mut best: Option<&ScoredCandidate<'c>> = None;
    for s in scored {
        match best {
            Some(b) if s.score <= b.score => {}
            _ => best = Some(s),
        }
    }
    best
}

/// Post-process the winning target: unescape HTML references, then
/// capitalize it when it opens a sentence (output empty or ending in a
/// boundary).
pub fn finalize_target(target: &str, output: &[TaggedToken]) -> String {
    let unescaped = unescape_html(target);
    let sentence_initial = output.last().map_or(true, TaggedToken::is_boundary);
    if sentence_initial {
        capitalize_first(&unescaped)
    } else {
        unescaped.into_owned()
    }
}
