use thiserror::Error;

/// Batch-level failures surfaced to the caller.
///
/// None of these are fatal: the previous session stays usable and the next
/// ingestion attempt starts from scratch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("no usable rows: {reason}")]
    EmptyBatch { reason: String },

    #[error("could not read input: {message}")]
    MalformedInput { message: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl PipelineError {
    pub fn empty_batch(reason: impl Into<String>) -> Self {
        Self::EmptyBatch {
            reason: reason.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

impl From<regex::Error> for PipelineError {
    fn from(err: regex::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Why a single raw row did not become a record. Row-local, never aborts a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RowRejection {
    #[error("date is missing or unparsable")]
    MissingDate,
    #[error("amount is blank")]
    MissingAmount,
    #[error("amount is not a number")]
    InvalidAmount,
}

impl RowRejection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingDate => "missing_date",
            Self::MissingAmount => "missing_amount",
            Self::InvalidAmount => "invalid_amount",
        }
    }
}
