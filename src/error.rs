use thiserror::Error;

/// Errors raised by the recommendation core.
///
/// `NotFound` is the only one a user is expected to see; it should be shown as
/// a "not found" message rather than treated as a failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendError {
    #[error("track '{name}' by '{artist}' is not in the catalog")]
    NotFound { name: String, artist: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("dimension mismatch: {what} has {actual} entries, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl RecommendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecommendError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
