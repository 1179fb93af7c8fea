use std::path::Path;
use std::process;

use lexmt_core::lm::{ArpaModel, LanguageModel};

use super::config_ops::load_settings;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn score(lm_file: &str, ngram: &str, order: Option<usize>, settings: Option<&str>) {
    let settings = die!(load_settings(settings.map(Path::new)), "Error: {}");
    let model = die!(
        ArpaModel::open(Path::new(lm_file)),
        "Error opening language model: {}"
    )
    .with_unknown_logprob(settings.lm.unknown_logprob);

    let tokens: Vec<&str> = ngram.split_whitespace().collect();
    if tokens.is_empty() {
        eprintln!("Error: empty n-gram");
        process::exit(1);
    }
    let order = order.unwrap_or(tokens.len());
    let logprob = model.score_ngram(&tokens, order);
    println!("{ngram}: {logprob:.4} (order {order}, model order {})", model.order());
}
