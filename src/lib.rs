use rustfst::fst_impls::VectorFst;
use rustfst::semirings::TropicalWeight;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

/// rustfst does not define this but we will
pub type StdVectorFst = VectorFst<TropicalWeight>;

/// AT&T text output and in-memory FST construction
pub mod att;
/// Batch conversion over a directory of grammars
pub mod driver;
/// State allocation and arc emission
pub mod emit;
/// Error types
pub mod error;
/// Phrase-table record parsing
pub mod rule;
/// Log-linear rule scoring
pub mod score;
/// Feature weights
pub mod weights;

pub use emit::{phrasetable_to_fst, ArcLabel, ArcList, ArcRecord};
pub use error::ConvertError;
pub use rule::Rule;
pub use weights::WeightTable;

/// Read up to `limit` sentences, one per line
pub fn read_sentences(input: &Path, limit: usize) -> error::Result<Vec<String>> {
    let fh = File::open(input)?;
    let sentences = BufReader::new(fh)
        .lines()
        .take(limit)
        .collect::<std::io::Result<Vec<String>>>()?;
    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn it_reads_sentences() {
        let sentences = read_sentences(&PathBuf::from("testdata/dev.en"), 100).unwrap();
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0], "the cat sat on the mat");
        let sentences = read_sentences(&PathBuf::from("testdata/dev.en"), 2).unwrap();
        assert_eq!(sentences.len(), 2);
    }
}
