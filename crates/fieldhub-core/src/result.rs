//! Convenience result type alias for FieldHub.

use crate::error::AppError;

/// A specialized `Result` type for FieldHub operations.
pub type AppResult<T> = Result<T, AppError>;
