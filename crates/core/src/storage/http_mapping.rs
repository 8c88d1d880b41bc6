//! Pure functions for mapping store errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`StoreError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// This is a pure function that returns the appropriate HTTP status code
/// for each error variant:
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `MalformedRecord` -> 500 (Internal Server Error)
/// - `ValidationFailed` -> 400 (Bad Request)
/// - `Unavailable` -> 503 (Service Unavailable)
/// - `PartiallyApplied` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use darkroom_core::storage::{store_error_to_status_code, StoreError};
///
/// let error = StoreError::NotFound {
///     entity_type: "Project",
///     id: "mountain-series".to_string(),
/// };
/// assert_eq!(store_error_to_status_code(&error), 404);
/// ```
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::NotFound { .. } => 404,
        StoreError::AlreadyExists { .. } => 409,
        StoreError::MalformedRecord(_) => 500,
        StoreError::ValidationFailed(_) => 400,
        StoreError::Unavailable(_) => 503,
        StoreError::PartiallyApplied { .. } => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = StoreError::NotFound {
            entity_type: "Project",
            id: "p-123".to_string(),
        };
        assert_eq!(store_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let error = StoreError::AlreadyExists {
            entity_type: "Image",
            id: "img-456".to_string(),
        };
        assert_eq!(store_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_malformed_record_maps_to_500() {
        let error = StoreError::MalformedRecord("missing field: project_id".to_string());
        assert_eq!(store_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_validation_failed_maps_to_400() {
        let error = StoreError::ValidationFailed("Title cannot be empty".to_string());
        assert_eq!(store_error_to_status_code(&error), 400);
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let error = StoreError::Unavailable("connection timeout".to_string());
        assert_eq!(store_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_partially_applied_maps_to_500() {
        let error = StoreError::PartiallyApplied {
            completed: 3,
            failed_chunk: 1,
        };
        assert_eq!(store_error_to_status_code(&error), 500);
    }
}
