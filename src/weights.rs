use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use crate::error::{ConvertError, Result};

/// Weight of the constant glue term added to every rule
pub const GLUE: &str = "Glue";
/// Weight of the per-target-token penalty
pub const WORD_PENALTY: &str = "WordPenalty";
/// Cost of copying an uncovered input word to the output
pub const PASS_THROUGH: &str = "PassThrough";

/// Feature name to log-linear coefficient
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    weights: HashMap<String, f64>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `name value` lines. Blank lines are skipped and a repeated
    /// name overwrites the earlier value.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = WeightTable::new();
        for line in reader.lines() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let Some(name) = fields.next() else {
                continue;
            };
            let value = fields.next().ok_or_else(|| ConvertError::MalformedWeight {
                line: line.clone(),
                reason: "missing value".to_string(),
            })?;
            let value: f64 = value.parse().map_err(|_| ConvertError::MalformedWeight {
                line: line.clone(),
                reason: format!("{:?} is not a number", value),
            })?;
            table.insert(name, value);
        }
        Ok(table)
    }

    /// Load a weight file
    pub fn load(path: &Path) -> Result<Self> {
        let fh = File::open(path)?;
        Self::from_reader(BufReader::new(fh))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.weights.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    /// Coefficient of a feature appearing in a rule
    pub fn feature(&self, name: &str) -> Result<f64> {
        self.get(name).ok_or_else(|| ConvertError::UnknownFeature {
            name: name.to_string(),
        })
    }

    /// One of the fixed weights every table must carry
    pub fn required(&self, name: &str) -> Result<f64> {
        self.get(name).ok_or_else(|| ConvertError::MissingWeightKey {
            name: name.to_string(),
        })
    }

    pub fn glue(&self) -> Result<f64> {
        self.required(GLUE)
    }

    pub fn word_penalty(&self) -> Result<f64> {
        self.required(WORD_PENALTY)
    }

    pub fn pass_through(&self) -> Result<f64> {
        self.required(PASS_THROUGH)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for WeightTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = WeightTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}
