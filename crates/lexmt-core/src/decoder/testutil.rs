use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

use crate::lm::LanguageModel;
use crate::phrase_table::{PhraseCandidate, PhraseTable};
use crate::token::TaggedToken;

use super::DecodeSink;

pub fn row(tag: &str, word: &str) -> TaggedToken {
    TaggedToken::new(tag, word)
}

/// Untagged (`O`) rows for each word; `None` is a boundary.
pub fn plain(words: &[Option<&str>]) -> Vec<TaggedToken> {
    words
        .iter()
        .map(|w| match w {
            Some(w) => row("O", w),
            None => TaggedToken::boundary(),
        })
        .collect()
}

pub fn words_of(tokens: &[TaggedToken]) -> Vec<Option<&str>> {
    tokens.iter().map(TaggedToken::word).collect()
}

pub fn tags_of(tokens: &[TaggedToken]) -> Vec<Option<&str>> {
    tokens.iter().map(TaggedToken::tag).collect()
}

pub fn table(entries: &[(&str, &[(&str, f64)])]) -> PhraseTable {
    PhraseTable::from_entries(entries.iter().map(|(src, cands)| {
        (
            src.to_string(),
            cands
                .iter()
                .map(|(t, w)| PhraseCandidate::new(*t, *w))
                .collect(),
        )
    }))
}

/// Shared English → Turkish table for decoder tests.
pub fn test_table() -> PhraseTable {
    table(&[
        ("the", &[("bu", 1.0)]),
        ("the big", &[("o büyük", 1.0)]),
        ("big", &[("iri", 0.6), ("büyük", 0.4)]),
        ("red", &[("kırmızı", 1.0)]),
        ("house", &[("ev", 0.8), ("konut", 0.2)]),
        ("good morning", &[("günaydın", 1.0)]),
        ("river", &[("nehir", 1.0)]),
        ("bank", &[("banka", 0.5), ("kıyı", 0.5)]),
        ("walk", &[("yürümek", 1.0)]),
        ("John", &[("Can Bey", 1.0)]),
    ])
}

/// Collects every sink message.
#[derive(Default)]
pub struct RecordingSink {
    pub info: RefCell<Vec<String>>,
    pub debug: RefCell<Vec<String>>,
}

impl DecodeSink for RecordingSink {
    fn info(&self, args: fmt::Arguments<'_>) {
        self.info.borrow_mut().push(args.to_string());
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.debug.borrow_mut().push(args.to_string());
    }
}

/// Bigram-table LM that records each query.
#[derive(Default)]
pub struct BigramLm {
    pub bigrams: HashMap<(String, String), f64>,
    pub calls: RefCell<Vec<(Vec<String>, usize)>>,
}

impl BigramLm {
    pub fn with(mut self, prev: &str, word: &str, logprob: f64) -> Self {
        self.bigrams
            .insert((prev.to_string(), word.to_string()), logprob);
        self
    }
}

impl LanguageModel for BigramLm {
    fn score_ngram(&self, tokens: &[&str], order: usize) -> f64 {
        self.calls
            .borrow_mut()
            .push((tokens.iter().map(|s| s.to_string()).collect(), order));
        match tokens {
            [.., prev, word] => self
                .bigrams
                .get(&(prev.to_string(), word.to_string()))
                .copied()
                .unwrap_or(-5.0),
            _ => -5.0,
        }
    }
}

/// Subscriber that records `(span name, rows field)` for each new span.
#[derive(Clone, Default)]
pub struct SpanRecorder {
    pub spans: Arc<Mutex<Vec<(String, Option<u64>)>>>,
}

struct RowsField(Option<u64>);

impl Visit for RowsField {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "rows" {
            self.0 = Some(value);
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

impl Subscriber for SpanRecorder {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, attrs: &Attributes<'_>) -> Id {
        let mut rows = RowsField(None);
        attrs.record(&mut rows);
        let mut spans = self.spans.lock().unwrap();
        spans.push((attrs.metadata().name().to_string(), rows.0));
        Id::from_u64(spans.len() as u64)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, _event: &Event<'_>) {}

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}
