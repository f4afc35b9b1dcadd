/// Errors raised while converting a phrase table to an FST.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A rule record does not have the expected field or token shape.
    #[error("malformed rule {line:?}: {reason}")]
    MalformedRule { line: String, reason: String },

    /// A feature name in a rule has no entry in the weight table.
    #[error("unknown feature: {name}")]
    UnknownFeature { name: String },

    /// One of the fixed weights (Glue, WordPenalty, PassThrough) is absent.
    #[error("missing required weight: {name}")]
    MissingWeightKey { name: String },

    /// A weight file line is not a `name value` pair.
    #[error("malformed weight line {line:?}: {reason}")]
    MalformedWeight { line: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Failure from rustfst while building an in-memory FST.
    #[error(transparent)]
    Fst(#[from] anyhow::Error),
}

impl ConvertError {
    pub(crate) fn malformed_rule(line: &str, reason: impl Into<String>) -> Self {
        ConvertError::MalformedRule {
            line: line.trim_end().to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
