use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lexmt_cli::commands::translate_ops::TranslateOptions;
use lexmt_cli::commands::{config_ops, lm_ops, table_ops, translate_ops};
use lexmt_cli::logging::init_logging;
use lexmt_core::corpus::CorpusFormat;
use lexmt_core::phrase_table::Method;

#[derive(Parser)]
#[command(name = "lexmt", about = "Lexicon-driven phrase translation of tagged corpora")]
struct Cli {
    /// Log decoder details (candidate scores, missed words)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a corpus file, or interactively when no files are given
    Translate {
        /// Input file (column 5 of each row is translated)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Source language code (3 letter)
        #[arg(short, long, default_value = "eng")]
        source: String,
        /// Target language code (3 letter)
        #[arg(short, long)]
        target: String,
        /// Format of the input and output files
        #[arg(short, long, default_value = "conll")]
        format: CorpusFormat,
        /// Specific lexicon (text or compiled) instead of the default for the pair
        #[arg(short, long)]
        lexicon: Option<PathBuf>,
        /// Where translations come from
        #[arg(long, default_value = "lexicon")]
        method: Method,
        /// ARPA language model used to rank candidates
        #[arg(long)]
        lm: Option<PathBuf>,
        /// Gazetteer directory for entity fallback
        #[arg(long)]
        gazetteer: Option<PathBuf>,
        /// Seed for gazetteer picks (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Settings TOML file
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Print pass statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compile a text lexicon into a phrase table
    Compile {
        /// Lexicon TSV (source, target, optional count)
        input: String,
        /// Output .lxpt file
        output: String,
        /// Floor for per-phrase count totals (default from settings)
        #[arg(long)]
        min_total: Option<f64>,
        /// Settings TOML file
        #[arg(long)]
        settings: Option<String>,
    },
    /// Look up a phrase the way the decoder would
    Lookup {
        /// Phrase table (.lxpt) or text lexicon
        table_file: String,
        /// Source phrase
        phrase: String,
        /// Source language code, selects the expander
        #[arg(short, long, default_value = "eng")]
        source: String,
        /// Settings TOML file
        #[arg(long)]
        settings: Option<String>,
    },
    /// Show phrase table statistics
    Info {
        /// Phrase table (.lxpt) or text lexicon
        file: String,
    },
    /// Score an n-gram with an ARPA language model
    LmScore {
        /// ARPA file
        lm_file: String,
        /// Whitespace-separated n-gram, last word is scored
        ngram: String,
        /// Order to query (default: number of words)
        #[arg(long)]
        order: Option<usize>,
        /// Settings TOML file
        #[arg(long)]
        settings: Option<String>,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match cli.command {
        Command::Translate {
            input,
            output,
            source,
            target,
            format,
            lexicon,
            method,
            lm,
            gazetteer,
            seed,
            settings,
            json,
        } => translate_ops::translate(&TranslateOptions {
            input,
            output,
            source,
            target,
            format,
            lexicon,
            method,
            lm,
            gazetteer,
            seed,
            settings,
            json,
        }),
        Command::Compile {
            input,
            output,
            min_total,
            settings,
        } => table_ops::compile(&input, &output, min_total, settings.as_deref()),
        Command::Lookup {
            table_file,
            phrase,
            source,
            settings,
        } => table_ops::lookup(&table_file, &phrase, &source, settings.as_deref()),
        Command::Info { file } => table_ops::info(&file),
        Command::LmScore {
            lm_file,
            ngram,
            order,
            settings,
        } => lm_ops::score(&lm_file, &ngram, order, settings.as_deref()),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
