use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::emit::phrasetable_to_fst;
use crate::read_sentences;
use crate::rule::read_table;
use crate::weights::WeightTable;

/// Where to find inputs and put outputs
#[derive(Debug, Clone)]
pub struct Config {
    /// Sentences, one per line
    pub sentences: PathBuf,
    /// Weight file
    pub weights: PathBuf,
    /// Directory holding `grammar.<i>` for each sentence
    pub rules: PathBuf,
    /// Directory receiving `grammar.<i>` FSTs
    pub out_dir: PathBuf,
    /// Number of sentences to convert
    pub count: usize,
}

/// Per-sentence file name, shared by input grammars and output FSTs
pub fn grammar_file(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("grammar.{}", index))
}

/// Convert one sentence's grammar file and write the FST.
fn convert_one(sentence: &str, input: &Path, output: &Path, weights: &WeightTable) -> Result<usize> {
    let fh = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let rules = read_table(BufReader::new(fh)).with_context(|| format!("reading {}", input.display()))?;
    let arcs = phrasetable_to_fst(sentence, &rules, weights)
        .with_context(|| format!("converting {}", input.display()))?;
    let mut out = BufWriter::new(
        File::create(output).with_context(|| format!("creating {}", output.display()))?,
    );
    arcs.write_att(&mut out)?;
    out.flush()?;
    Ok(arcs.arcs.len())
}

/// Convert the first `count` grammars.  Stops at the first failure.
/// Returns the number of sentences converted.
pub fn run(config: &Config) -> Result<usize> {
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating {}", config.out_dir.display()))?;
    let sentences = read_sentences(&config.sentences, config.count)
        .with_context(|| format!("reading {}", config.sentences.display()))?;
    if sentences.len() < config.count {
        log::warn!(
            "asked for {} sentences but {} has only {}",
            config.count,
            config.sentences.display(),
            sentences.len()
        );
    }
    let weights = WeightTable::load(&config.weights)
        .with_context(|| format!("reading {}", config.weights.display()))?;
    log::debug!("loaded {} weights", weights.len());

    for (i, sentence) in sentences.iter().enumerate() {
        let input = grammar_file(&config.rules, i);
        let output = grammar_file(&config.out_dir, i);
        let narcs = convert_one(sentence, &input, &output, &weights).map_err(|err| {
            log::error!("{} is incomplete and must not be used", output.display());
            err
        })?;
        log::info!("{}/{}: {} arcs", i + 1, sentences.len(), narcs);
    }
    Ok(sentences.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(out_dir: &Path, count: usize) -> Config {
        Config {
            sentences: PathBuf::from("testdata/dev.en"),
            weights: PathBuf::from("testdata/weights.monotone"),
            rules: PathBuf::from("testdata/rules.monotone.dev"),
            out_dir: out_dir.to_path_buf(),
            count,
        }
    }

    #[test]
    fn it_converts_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("task2");
        let n = run(&config(&out_dir, 100)).unwrap();
        assert_eq!(n, 3);
        for i in 0..3 {
            let text = fs::read_to_string(grammar_file(&out_dir, i)).unwrap();
            assert!(!text.is_empty());
            for line in text.lines() {
                assert_eq!(line.split_whitespace().count(), 5, "{}", line);
            }
        }
        // "on" and "mat" have no rules in the first grammar
        let text = fs::read_to_string(grammar_file(&out_dir, 0)).unwrap();
        assert!(text.contains("0 0 on on 10\n"));
        assert!(text.contains("0 0 mat mat 10\n"));
        assert!(!grammar_file(&out_dir, 3).exists());
    }

    #[test]
    fn it_respects_the_count() {
        let tmp = tempfile::tempdir().unwrap();
        let n = run(&config(tmp.path(), 1)).unwrap();
        assert_eq!(n, 1);
        assert!(grammar_file(tmp.path(), 0).exists());
        assert!(!grammar_file(tmp.path(), 1).exists());
    }

    #[test]
    fn it_is_byte_identical_across_runs() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        run(&config(a.path(), 3)).unwrap();
        run(&config(b.path(), 3)).unwrap();
        for i in 0..3 {
            assert_eq!(
                fs::read(grammar_file(a.path(), i)).unwrap(),
                fs::read(grammar_file(b.path(), i)).unwrap()
            );
        }
    }

    #[test]
    fn it_fails_on_a_missing_grammar() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = config(tmp.path(), 3);
        config.rules = tmp.path().join("nowhere");
        let err = run(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("grammar.0"));
    }
}
