//! Error types returned by datasets, channel construction and divergence
//! measures.
use thiserror::Error;

/// Errors raised while building or querying a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("attribute `{0}` is not in the dataset schema")]
    UnknownAttribute(String),

    #[error("attribute `{0}` appears more than once")]
    DuplicateAttribute(String),

    #[error("expected {expected} values per record, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("record {0} does not share the schema of the first record")]
    SchemaMismatch(usize),
}

/// Errors raised while building a channel, or deriving posteriors from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("dataset has no records")]
    EmptyDataset,

    #[error("attribute `{0}` is not in the dataset schema")]
    UnknownAttribute(String),

    #[error("secret attribute `{0}` cannot also be a quasi-identifier")]
    SecretInQids(String),

    #[error("attribute `{0}` appears more than once")]
    DuplicateAttribute(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("observation is not in the channel's domain")]
    UnknownObservation,

    #[error("prior and channel are defined over different secret domains")]
    DomainMismatch,
}

/// Errors raised by divergence measures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DivergenceError {
    #[error("reference probability at index {index} is 0 where the observed one is not")]
    ZeroReference { index: usize },
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_into_channel_error() {
        let err: ChannelError = DataError::SchemaMismatch(3).into();

        assert_eq!(err, ChannelError::Data(DataError::SchemaMismatch(3)));
        assert_eq!(err.to_string(),
                   "record 3 does not share the schema of the first record");
    }
}
