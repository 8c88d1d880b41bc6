use thiserror::Error;

use crate::portfolio::ValidationError;

/// Errors surfaced by portfolio store operations.
///
/// Transport and availability failures from the backing store are never
/// folded into domain errors; they propagate as [`StoreError::Unavailable`]
/// so callers can decide retry policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    #[error("Backing store unavailable: {0}")]
    Unavailable(String),
    /// A chunked batch stopped between chunks. `completed` counts the
    /// logical units already applied; `failed_chunk` is the zero-based index
    /// of the chunk that failed. Both operations that chunk (reorder,
    /// cascading delete) are idempotent per item, so retrying is safe.
    #[error("Partially applied: {completed} items written before chunk {failed_chunk} failed")]
    PartiallyApplied { completed: usize, failed_chunk: usize },
}

impl From<ValidationError> for StoreError {
    fn from(error: ValidationError) -> Self {
        StoreError::ValidationFailed(error.to_string())
    }
}

/// Result type for portfolio store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = StoreError::NotFound {
            entity_type: "Project",
            id: "mountain-series".to_string(),
        };
        assert_eq!(error.to_string(), "Project not found: mountain-series");
    }

    #[test]
    fn test_already_exists_display() {
        let error = StoreError::AlreadyExists {
            entity_type: "CarouselItem",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "CarouselItem already exists: abc-123");
    }

    #[test]
    fn test_unavailable_display() {
        let error = StoreError::Unavailable("throughput exceeded".to_string());
        assert_eq!(
            error.to_string(),
            "Backing store unavailable: throughput exceeded"
        );
    }

    #[test]
    fn test_partially_applied_display() {
        let error = StoreError::PartiallyApplied {
            completed: 12,
            failed_chunk: 1,
        };
        assert_eq!(
            error.to_string(),
            "Partially applied: 12 items written before chunk 1 failed"
        );
    }

    #[test]
    fn test_validation_error_converts() {
        let error: StoreError = ValidationError::EmptyTitle.into();
        assert_eq!(
            error,
            StoreError::ValidationFailed("Title cannot be empty".to_string())
        );
    }
}
