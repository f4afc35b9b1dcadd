use std::io::prelude::*;

use crate::error::{ConvertError, Result};

/// Field delimiter in phrase-table records
pub const FIELD_DELIMITER: &str = "|||";
/// Number of `|||`-separated fields in a record
const NUM_FIELDS: usize = 5;

/// A single `name=value` feature assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub value: f64,
}

impl Feature {
    fn parse(token: &str, line: &str) -> Result<Self> {
        let (name, value) = token.split_once('=').ok_or_else(|| {
            ConvertError::malformed_rule(line, format!("feature {:?} has no '='", token))
        })?;
        if value.contains('=') {
            return Err(ConvertError::malformed_rule(
                line,
                format!("feature {:?} has more than one '='", token),
            ));
        }
        let value: f64 = value.parse().map_err(|_| {
            ConvertError::malformed_rule(line, format!("feature value {:?} is not a number", value))
        })?;
        Ok(Feature {
            name: name.to_string(),
            value,
        })
    }
}

/// One phrase-table entry.
///
/// Records look like `<lhs> ||| <source> ||| <target> ||| <features> ||| <alignment>`;
/// the first and last fields are not used.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Source phrase exactly as it appeared in the record
    pub source_text: String,
    /// Source tokens
    pub source: Vec<String>,
    /// Target tokens
    pub target: Vec<String>,
    /// Feature assignments, in record order
    pub features: Vec<Feature>,
}

impl Rule {
    /// Parse a raw phrase-table line.
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() != NUM_FIELDS {
            return Err(ConvertError::malformed_rule(
                line,
                format!("expected {} fields, found {}", NUM_FIELDS, fields.len()),
            ));
        }
        let source: Vec<String> = fields[1].split_whitespace().map(String::from).collect();
        let target: Vec<String> = fields[2].split_whitespace().map(String::from).collect();
        if source.is_empty() {
            return Err(ConvertError::malformed_rule(line, "empty source phrase"));
        }
        if target.is_empty() {
            return Err(ConvertError::malformed_rule(line, "empty target phrase"));
        }
        let features = fields[3]
            .split_whitespace()
            .map(|token| Feature::parse(token, line))
            .collect::<Result<Vec<_>>>()?;
        Ok(Rule {
            source_text: fields[1].to_string(),
            source,
            target,
            features,
        })
    }

    /// A rule mapping exactly one source token to one target token
    pub fn is_single_token(&self) -> bool {
        self.source.len() == 1 && self.target.len() == 1
    }
}

/// Parse every non-blank line of a grammar.
pub fn parse_table<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Rule>> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !line.trim().is_empty())
        .map(Rule::parse)
        .collect()
}

/// Read and parse a grammar file, one rule per line
pub fn read_table<R: BufRead>(reader: R) -> Result<Vec<Rule>> {
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    parse_table(&lines)
}
