use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use lexmt_core::corpus::{self, CorpusFormat};
use lexmt_core::decoder::{DecodeConfig, DecodeOutput, DecodeStats, Decoder};
use lexmt_core::gazetteer::Gazetteer;
use lexmt_core::lang::SourceLanguage;
use lexmt_core::lm::ArpaModel;
use lexmt_core::phrase_table::{load_for_pair, Method, PhraseTable};
use lexmt_core::token::TaggedToken;

use super::config_ops::load_settings;
use crate::error::CliError;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

const QUIT_WORDS: &[&str] = &["q", "Q", "exit"];

#[derive(Debug, Clone)]
pub struct TranslateOptions {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub source: String,
    pub target: String,
    pub format: CorpusFormat,
    pub lexicon: Option<PathBuf>,
    pub method: Method,
    pub lm: Option<PathBuf>,
    pub gazetteer: Option<PathBuf>,
    pub seed: Option<u64>,
    pub settings: Option<PathBuf>,
    pub json: bool,
}

/// A loaded phrase table plus the optional LM and gazetteer, ready to
/// decode any number of passes. Gazetteer picks accumulate in the table
/// across passes.
pub struct Translator {
    table: PhraseTable,
    config: DecodeConfig,
    lm: Option<ArpaModel>,
    gazetteer: Option<Gazetteer>,
    rng: ChaCha8Rng,
}

impl Translator {
    pub fn new(opts: &TranslateOptions) -> Result<Self, CliError> {
        let settings = load_settings(opts.settings.as_deref())?;
        let table = load_for_pair(
            opts.method,
            &opts.source,
            &opts.target,
            opts.lexicon.as_deref(),
            &settings.lexicon,
        )?;

        let lm = match opts.lm.as_deref() {
            Some(path) => {
                Some(ArpaModel::open(path)?.with_unknown_logprob(settings.lm.unknown_logprob))
            }
            None => {
                info!("no language model, scoring by prior only");
                None
            }
        };

        let gazetteer = match opts.gazetteer.as_deref() {
            Some(dir) => {
                let g = Gazetteer::load(dir, &opts.target, &settings.gazetteer.tags)?;
                if g.is_empty() {
                    warn!(dir = %dir.display(), "gazetteer is empty, fallback disabled");
                    None
                } else {
                    Some(g)
                }
            }
            None => None,
        };

        let rng = match opts.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let config = DecodeConfig::from_settings(&settings, SourceLanguage::from_code(&opts.source));
        Ok(Self {
            table,
            config,
            lm,
            gazetteer,
            rng,
        })
    }

    /// Prior-only translator over an in-memory table.
    pub fn from_table(table: PhraseTable, config: DecodeConfig, seed: u64) -> Self {
        Self {
            table,
            config,
            lm: None,
            gazetteer: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.gazetteer = Some(gazetteer);
        self
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn translate(&mut self, tokens: &[TaggedToken]) -> DecodeOutput {
        let mut decoder = Decoder::new(&mut self.table, self.config.clone());
        if let Some(lm) = &self.lm {
            decoder = decoder.with_lm(lm);
        }
        if let Some(g) = &self.gazetteer {
            decoder = decoder.with_gazetteer(g, &mut self.rng);
        }
        decoder.decode(tokens)
    }

    /// Translate one plaintext sentence.
    pub fn translate_sentence(&mut self, line: &str) -> String {
        let tokens = corpus::plaintext_to_tokens(line);
        let out = self.translate(&tokens);
        corpus::write_plaintext(&out.tokens)
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    pub fn translate_file(
        &mut self,
        input: &Path,
        output: &Path,
        format: CorpusFormat,
    ) -> Result<DecodeStats, CliError> {
        let tokens = corpus::read_file(input, format)?;
        let out = self.translate(&tokens);
        eprintln!("Writing to: {}", output.display());
        corpus::write_file(output, format, &out.tokens)?;
        Ok(out.stats)
    }
}

#[derive(Debug, Serialize)]
pub struct MissedWord<'a> {
    pub word: &'a str,
    pub count: usize,
}

/// Machine-readable summary of a pass.
#[derive(Debug, Serialize)]
pub struct StatsReport<'a> {
    pub total: usize,
    pub missing: usize,
    pub coverage: f64,
    pub top_missed: Vec<MissedWord<'a>>,
}

impl<'a> StatsReport<'a> {
    pub fn new(stats: &'a DecodeStats, top: usize) -> Self {
        Self {
            total: stats.total,
            missing: stats.missing,
            coverage: stats.coverage(),
            top_missed: stats
                .top_missed(top)
                .into_iter()
                .map(|(word, count)| MissedWord { word, count })
                .collect(),
        }
    }
}

/// Missed words padded to a common display width, one per line.
pub fn format_missed(rows: &[(&str, usize)]) -> String {
    let width = rows
        .iter()
        .map(|(w, _)| UnicodeWidthStr::width(*w))
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (word, count) in rows {
        let pad = width - UnicodeWidthStr::width(*word);
        out.push_str(&format!("  {word}{}  {count:>6}\n", " ".repeat(pad)));
    }
    out
}

pub fn is_quit(line: &str) -> bool {
    QUIT_WORDS.contains(&line)
}

pub fn translate(opts: &TranslateOptions) {
    let paths = match (&opts.input, &opts.output) {
        (Some(input), Some(output)) => Some((input, output)),
        (None, None) => None,
        _ => {
            eprintln!("Error: {}", CliError::UnpairedIo);
            process::exit(1);
        }
    };
    let mut translator = die!(Translator::new(opts), "Error: {}");

    match paths {
        Some((input, output)) => {
            let stats = die!(
                translator.translate_file(input, output, opts.format),
                "Error: {}"
            );
            print_stats(&stats, translator.config().top_missed, opts.json);
        }
        None => interactive(&mut translator, &opts.source, &opts.target),
    }
}

fn print_stats(stats: &DecodeStats, top: usize, json: bool) {
    if json {
        let report = StatsReport::new(stats, top);
        println!(
            "{}",
            die!(serde_json::to_string_pretty(&report), "Error: {}")
        );
        return;
    }
    println!(
        "Coverage: {:.4} ({} of {} missed)",
        stats.coverage(),
        stats.missing,
        stats.total
    );
    let rows = stats.top_missed(top);
    if !rows.is_empty() {
        println!("Most frequent missed words:");
        print!("{}", format_missed(&rows));
    }
}

fn interactive(translator: &mut Translator, source: &str, target: &str) {
    println!("Interactively translating from {source} to {target}. q, Q, or exit to quit.");
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{source}>> ");
        die!(io::stdout().flush(), "Error: {}");
        line.clear();
        let n = die!(stdin.lock().read_line(&mut line), "Error reading input: {}");
        if n == 0 {
            break;
        }
        let text = line.trim_end_matches(['\n', '\r']);
        if is_quit(text) {
            break;
        }
        if text.trim().is_empty() {
            continue;
        }
        println!("{target}: {}", translator.translate_sentence(text));
    }
}
