use std::fs;
use std::path::Path;
use std::process;

use lexmt_core::decoder::{resolve_phrase, Resolution};
use lexmt_core::lang::SourceLanguage;
use lexmt_core::morph::Expander;
use lexmt_core::phrase_table::{load_lexicon, load_table, PhraseCandidate, PhraseTable, MAGIC};

use super::config_ops::load_settings;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn compile(input: &str, output: &str, min_total: Option<f64>, settings: Option<&str>) {
    let settings = die!(load_settings(settings.map(Path::new)), "Error: {}");
    let min_total = min_total.unwrap_or(settings.lexicon.min_total);

    let (table, stats) = die!(
        load_lexicon(Path::new(input), min_total),
        "Error reading lexicon: {}"
    );
    eprintln!(
        "Parsed {} lines ({} skipped): {} phrases, {} pairs",
        stats.lines,
        stats.skipped,
        table.len(),
        stats.pairs
    );

    die!(
        table.save(Path::new(output)),
        "Error writing phrase table: {}"
    );
    let file_size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    eprintln!("Wrote {output} ({:.1} KB)", file_size as f64 / 1024.0);
}

/// Resolve `phrase` the way the decoder would (exact, lowercase, then the
/// source language's expander) and return the key and its candidates.
pub fn lookup_phrase<'t>(
    table: &'t PhraseTable,
    phrase: &str,
    source: SourceLanguage,
) -> Option<(String, Resolution, &'t [PhraseCandidate])> {
    let expander = Expander::for_language(source);
    let (key, resolution) = resolve_phrase(table, phrase, expander.as_ref())?;
    let candidates = table.lookup(&key)?;
    Some((key, resolution, candidates))
}

pub fn lookup(table_file: &str, phrase: &str, source: &str, settings: Option<&str>) {
    let settings = die!(load_settings(settings.map(Path::new)), "Error: {}");
    let table = die!(
        load_table(Path::new(table_file), settings.lexicon.min_total),
        "Error opening phrase table: {}"
    );
    match lookup_phrase(&table, phrase, SourceLanguage::from_code(source)) {
        None => println!("{phrase}: not found"),
        Some((key, resolution, candidates)) => {
            println!(
                "{phrase}: {} candidates ({resolution:?}, key {key:?})",
                candidates.len()
            );
            for c in candidates {
                println!("  {} \tweight={:.4}", c.target, c.weight);
            }
        }
    }
}

pub fn info(file: &str) {
    let is_compiled = fs::read(file)
        .ok()
        .and_then(|b| b.get(..4).map(|s| s == MAGIC))
        .unwrap_or(false);
    let settings = die!(load_settings(None), "Error: {}");
    let table = die!(
        load_table(Path::new(file), settings.lexicon.min_total),
        "Error opening phrase table: {}"
    );

    let file_size = fs::metadata(file).map(|m| m.len()).unwrap_or(0);
    let (phrases, candidates) = table.stats();
    let longest = table
        .iter()
        .map(|(p, _)| p.split_whitespace().count())
        .max()
        .unwrap_or(0);

    println!("Phrase table: {file}");
    println!(
        "Format:       {}",
        if is_compiled { "compiled (LXPT)" } else { "text lexicon" }
    );
    println!("File size:    {:.1} KB", file_size as f64 / 1024.0);
    println!("Phrases:      {phrases}");
    println!("Candidates:   {candidates}");
    println!("Longest:      {longest} words");
}
