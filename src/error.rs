use thiserror::Error;

/// Errors returned by the distance engine, the k-NN predictor and configuration checks.
///
/// All of these describe bad inputs. Nothing here is transient, so callers
/// should report them rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Paired arrays disagree on a dimension or a length.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A point set with no rows was passed where at least one is required.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// `k` is outside `1..=available`.
    #[error("invalid k = {k}: must be between 1 and {available}")]
    InvalidK { k: usize, available: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
