use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use phrasefst::driver::{self, Config};

mod logging;

/// Convert per-sentence phrase tables to weighted FSTs in AT&T text format.
#[derive(Debug, Parser)]
#[command(name = "phrasefst", version)]
struct Cli {
    /// Directory holding the default inputs
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Output directory [default: <DATA_DIR>/task2]
    #[arg(long, env = "OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Sentence file [default: <DATA_DIR>/dev.en]
    #[arg(long, env = "DEV_EN")]
    sentences: Option<PathBuf>,

    /// Weight file [default: <DATA_DIR>/weights.monotone]
    #[arg(long, env = "WEIGHTS_MONOTONE")]
    weights: Option<PathBuf>,

    /// Grammar directory [default: <DATA_DIR>/rules.monotone.dev]
    #[arg(long, env = "RULES_MONOTONE_DEV")]
    rules: Option<PathBuf>,

    /// Number of sentences to convert
    #[arg(short = 'n', long = "count", env = "N", default_value_t = 100)]
    count: usize,

    #[command(flatten)]
    logging: logging::LogArgs,
}

impl Cli {
    fn config(&self) -> Config {
        let under_data = |name: &str| self.data_dir.join(name);
        Config {
            sentences: self.sentences.clone().unwrap_or_else(|| under_data("dev.en")),
            weights: self
                .weights
                .clone()
                .unwrap_or_else(|| under_data("weights.monotone")),
            rules: self
                .rules
                .clone()
                .unwrap_or_else(|| under_data("rules.monotone.dev")),
            out_dir: self.out_dir.clone().unwrap_or_else(|| under_data("task2")),
            count: self.count,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.logging.setup_logging(3)?;
    let config = cli.config();
    log::debug!("{:?}", config);
    let n = driver::run(&config)?;
    log::info!("wrote {} FSTs to {}", n, config.out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_derives_paths_from_the_data_dir() {
        let cli = Cli::parse_from(["phrasefst", "--data-dir", "corpus", "-n", "5"]);
        let config = cli.config();
        assert_eq!(config.sentences, PathBuf::from("corpus/dev.en"));
        assert_eq!(config.weights, PathBuf::from("corpus/weights.monotone"));
        assert_eq!(config.rules, PathBuf::from("corpus/rules.monotone.dev"));
        assert_eq!(config.out_dir, PathBuf::from("corpus/task2"));
        assert_eq!(config.count, 5);
    }

    #[test]
    fn explicit_paths_win() {
        let cli = Cli::parse_from(["phrasefst", "--out-dir", "out", "--weights", "w.txt"]);
        let config = cli.config();
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.weights, PathBuf::from("w.txt"));
    }
}
