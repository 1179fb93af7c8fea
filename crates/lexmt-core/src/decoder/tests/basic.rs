use super::super::testutil::*;
use super::super::*;
use crate::corpus::{plaintext_to_tokens, write_plaintext};
use crate::settings::Settings;
use crate::token::TaggedToken;

fn decode(table: &mut PhraseTable, tokens: &[TaggedToken]) -> DecodeOutput {
    Decoder::new(table, DecodeConfig::default())
        .with_sink(&NullSink)
        .decode(tokens)
}

fn config_for(lang: SourceLanguage) -> DecodeConfig {
    DecodeConfig::from_settings(&Settings::default(), lang)
}

#[test]
fn test_entity_fan_out_roundtrip() {
    let mut t = table(&[("Ankara", &[("Ankara şehri", 0.9)])]);
    let input = vec![row("B-LOC", "Ankara"), TaggedToken::boundary()];
    let out = decode(&mut t, &input);

    assert_eq!(
        out.tokens,
        vec![
            row("B-LOC", "Ankara"),
            row("I-LOC", "şehri"),
            TaggedToken::boundary()
        ]
    );
    assert_eq!(out.stats.total, 1);
    assert_eq!(out.stats.missing, 0);
}

#[test]
fn test_longest_prefix_wins() {
    // "the big red house", "the big red" miss; "the big" hits even though
    // "the" alone would too.
    let mut t = test_table();
    let input = plain(&[Some("the"), Some("big"), Some("red"), Some("house")]);
    let out = decode(&mut t, &input);

    assert_eq!(
        words_of(&out.tokens),
        vec![Some("O"), Some("büyük"), Some("kırmızı"), Some("ev")]
    );
    assert_eq!(out.stats.total, 3);
    assert_eq!(out.stats.missing, 0);
}

#[test]
fn test_single_begin_token_continues_entity() {
    let mut t = test_table();
    let input = vec![row("B-PER", "John"), row("O", "said")];
    let out = decode(&mut t, &input);

    assert_eq!(
        words_of(&out.tokens),
        vec![Some("Can"), Some("Bey"), Some("said")]
    );
    assert_eq!(
        tags_of(&out.tokens),
        vec![Some("B-PER"), Some("I-PER"), Some("O")]
    );
    assert_eq!(out.stats.missing, 1);
    assert_eq!(out.stats.missed_words.get("said"), Some(&1));
}

#[test]
fn test_multi_token_span_clamps_template() {
    let mut t = table(&[("New York", &[("Yeni York şehri", 1.0)])]);
    let input = vec![row("B-LOC", "New"), row("I-LOC", "York")];
    let out = decode(&mut t, &input);

    assert_eq!(
        words_of(&out.tokens),
        vec![Some("Yeni"), Some("York"), Some("şehri")]
    );
    assert_eq!(
        tags_of(&out.tokens),
        vec![Some("B-LOC"), Some("I-LOC"), Some("I-LOC")]
    );
}

#[test]
fn test_contraction_drops_extra_rows() {
    let mut t = test_table();
    let input = plain(&[Some("good"), Some("morning"), None]);
    let out = decode(&mut t, &input);

    assert_eq!(words_of(&out.tokens), vec![Some("Günaydın"), None]);
    assert_eq!(out.stats.total, 1);
}

#[test]
fn test_misses_and_ignore_set() {
    let mut t = test_table();
    let input = plain(&[
        Some("-DOCSTART-"),
        None,
        Some("1999"),
        Some("2050"),
        Some("."),
        Some("zzz"),
        Some("zzz"),
    ]);
    let out = decode(&mut t, &input);

    assert_eq!(out.tokens, input);
    assert_eq!(out.stats.total, 6);
    assert_eq!(out.stats.missing, 3);
    assert_eq!(out.stats.top_missed(10), vec![("zzz", 2), ("2050", 1)]);
    assert!((out.stats.coverage() - 0.5).abs() < 1e-12);
}

#[test]
fn test_boundaries_pass_through_uncounted() {
    let mut t = test_table();
    let input = plain(&[None, None, Some("house"), None]);
    let out = decode(&mut t, &input);
    assert_eq!(words_of(&out.tokens), vec![None, None, Some("Ev"), None]);
    assert_eq!(out.stats.total, 1);
}

#[test]
fn test_lowercase_fallback() {
    let mut t = test_table();
    let input = plain(&[Some("river"), Some("House")]);
    let out = decode(&mut t, &input);
    assert_eq!(words_of(&out.tokens), vec![Some("Nehir"), Some("ev")]);
}

#[test]
fn test_english_expander() {
    let mut t = test_table();
    let input = plain(&[Some("walked"), Some("houses")]);
    let out = decode(&mut t, &input);
    assert_eq!(words_of(&out.tokens), vec![Some("Yürümek"), Some("ev")]);
    assert_eq!(out.stats.missing, 0);
}

#[test]
fn test_no_expander_for_other_languages() {
    let mut t = test_table();
    let input = plain(&[Some("walked"), Some("houses")]);
    let out = Decoder::new(&mut t, config_for(SourceLanguage::Other))
        .with_sink(&NullSink)
        .decode(&input);
    assert_eq!(out.tokens, input);
    assert_eq!(out.stats.missing, 2);
}

#[test]
fn test_uzbek_expander() {
    let mut t = table(&[("kitob", &[("book", 1.0)])]);
    let input = plain(&[Some("kitoblarni")]);
    let out = Decoder::new(&mut t, config_for(SourceLanguage::Uzbek))
        .with_sink(&NullSink)
        .decode(&input);
    assert_eq!(words_of(&out.tokens), vec![Some("Book")]);
}

#[test]
fn test_capitalization_only_at_sentence_start() {
    let mut t = test_table();
    let input = plain(&[Some("house"), Some("house"), None, Some("house")]);
    let out = decode(&mut t, &input);
    assert_eq!(
        words_of(&out.tokens),
        vec![Some("Ev"), Some("ev"), None, Some("Ev")]
    );
}

#[test]
fn test_prior_breaks_ties_by_candidate_order() {
    let mut t = test_table();
    let input = plain(&[Some("river"), Some("bank")]);
    let out = decode(&mut t, &input);
    assert_eq!(words_of(&out.tokens), vec![Some("Nehir"), Some("banka")]);
}

#[test]
fn test_lm_disambiguates_with_context() {
    let mut t = test_table();
    let lm = BigramLm::default().with("Nehir", "kıyı", -0.1);
    let input = plain(&[Some("river"), Some("bank")]);
    let out = Decoder::new(&mut t, DecodeConfig::default())
        .with_lm(&lm)
        .with_sink(&NullSink)
        .decode(&input);
    assert_eq!(words_of(&out.tokens), vec![Some("Nehir"), Some("kıyı")]);
}

#[test]
fn test_context_resets_at_boundary() {
    let mut t = table(&[
        ("a", &[("p", 1.0)]),
        ("b", &[("q", 1.0)]),
        ("c", &[("r", 1.0)]),
        ("d", &[("s", 1.0)]),
        ("e", &[("u", 1.0)]),
    ]);
    let lm = BigramLm::default();
    let input = plain(&[Some("a"), Some("b"), Some("c"), Some("d"), None, Some("e")]);
    Decoder::new(&mut t, DecodeConfig::default())
        .with_lm(&lm)
        .with_sink(&NullSink)
        .decode(&input);

    let expected: Vec<(Vec<String>, usize)> = [
        (&["p"][..], 1),
        (&["P", "q"][..], 2),
        (&["P", "q", "r"][..], 3),
        (&["P", "q", "r", "s"][..], 4),
        (&["u"][..], 1),
    ]
    .iter()
    .map(|(t, o)| (t.iter().map(|w| w.to_string()).collect(), *o))
    .collect();
    assert_eq!(*lm.calls.borrow(), expected);
}

#[test]
fn test_winner_is_unescaped() {
    let mut t = table(&[
        ("river", &[("nehir", 1.0)]),
        ("rd", &[("Ar&amp;Ge", 1.0)]),
    ]);
    let input = plain(&[Some("river"), Some("rd")]);
    let out = decode(&mut t, &input);
    assert_eq!(words_of(&out.tokens), vec![Some("Nehir"), Some("Ar&Ge")]);
}

#[test]
fn test_unescape_keeps_bare_ampersand() {
    let mut t = table(&[
        ("river", &[("nehir", 1.0)]),
        ("rd", &[("Ar&Ge &amp; Co", 1.0)]),
    ]);
    let input = plain(&[Some("river"), Some("rd")]);
    let out = decode(&mut t, &input);
    assert_eq!(
        words_of(&out.tokens),
        vec![Some("Nehir"), Some("Ar&Ge"), Some("&"), Some("Co")]
    );
}

#[test]
fn test_empty_target_is_not_a_translation() {
    let mut t = table(&[("ghost", &[("", 1.0)])]);
    let input = plain(&[Some("ghost")]);
    let out = decode(&mut t, &input);
    assert_eq!(out.tokens, input);
    assert_eq!(out.stats.missing, 1);
}

#[test]
fn test_plaintext_sentence() {
    let mut t = test_table();
    let mut input = plaintext_to_tokens("Good morning.");
    assert_eq!(
        words_of(&input),
        vec![Some("Good"), Some("morning"), Some(".")]
    );
    input.push(TaggedToken::boundary());

    let out = decode(&mut t, &input);
    assert_eq!(write_plaintext(&out.tokens), vec!["Günaydın."]);
    assert_eq!(out.stats.missing, 0);
}

#[test]
fn test_sink_reports_progress_and_coverage() {
    let mut t = test_table();
    let input: Vec<TaggedToken> = (0..30)
        .map(|_| row("O", "house"))
        .chain([row("O", "qq")])
        .collect();
    let sink = RecordingSink::default();
    Decoder::new(&mut t, DecodeConfig::default())
        .with_sink(&sink)
        .decode(&input);

    let info = sink.info.borrow();
    assert!(info.iter().any(|m| m.starts_with("progress")));
    assert!(info.last().unwrap().starts_with("translated 0.9677"));
    let debug = sink.debug.borrow();
    assert!(debug.iter().any(|m| m == "qq : 1"));
}

#[test]
fn test_empty_input() {
    let mut t = test_table();
    let out = decode(&mut t, &[]);
    assert!(out.tokens.is_empty());
    assert_eq!(out.stats.total, 0);
    assert!((out.stats.coverage() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_resolve_phrase_stages() {
    let t = test_table();
    let en = Some(&Expander::English);
    assert_eq!(
        resolve_phrase(&t, "house", en),
        Some(("house".to_string(), Resolution::Exact))
    );
    assert_eq!(
        resolve_phrase(&t, "HOUSE", en),
        Some(("house".to_string(), Resolution::Lowercase))
    );
    assert_eq!(
        resolve_phrase(&t, "houses", en),
        Some(("house".to_string(), Resolution::Expanded))
    );
    assert_eq!(resolve_phrase(&t, "houses", None), None);
}

#[test]
fn test_decode_runs_in_span() {
    let recorder = SpanRecorder::default();
    let mut t = test_table();
    let input = plain(&[Some("the"), None, Some("house")]);
    tracing::subscriber::with_default(recorder.clone(), || {
        decode(&mut t, &input);
    });
    let spans = recorder.spans.lock().unwrap();
    assert_eq!(*spans, vec![("decode".to_string(), Some(3))]);
}
