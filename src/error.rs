use thiserror::Error;

/// Errors reported by fallible [`Vector`](crate::Vector) operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VectorError {
  /// The operation needs backing storage, but the vector has none yet
  #[error("attempting to access a vector with no backing storage")]
  NilAccess,
  /// The index is outside `0..len`
  #[error("index is out of bounds, index: {index}, len: {len}")]
  IndexOutOfBounds { index: usize, len: usize },
}
