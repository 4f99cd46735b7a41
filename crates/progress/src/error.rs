//! Engine errors.

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors the engine can report.
///
/// A missing tally is not an error; extraction returns `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// Average requested over an empty history
    #[error("insufficient data: no daily records available")]
    InsufficientData,
}
