/// Result type for ledger operations
pub type WheelResult<T> = Result<T, WheelError>;

/// Errors surfaced by ledger and session operations.
///
/// All of these are recoverable; the caller decides whether to log them,
/// show them inline, or ignore them.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WheelError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(String),
}
