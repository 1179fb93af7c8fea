use std::io;

use lexmt_core::corpus::CorpusError;
use lexmt_core::gazetteer::GazetteerError;
use lexmt_core::lm::LmError;
use lexmt_core::phrase_table::PhraseTableError;
use lexmt_core::settings::ConfigError;

/// Anything that can stop a command before or during a run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    PhraseTable(#[from] PhraseTableError),
    #[error(transparent)]
    Lm(#[from] LmError),
    #[error(transparent)]
    Gazetteer(#[from] GazetteerError),
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    #[error("error reading {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("either both or neither of --input and --output must be given")]
    UnpairedIo,
}
