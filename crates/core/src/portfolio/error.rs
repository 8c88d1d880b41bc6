use thiserror::Error;

/// Errors raised when caller-supplied portfolio data fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Category cannot be empty")]
    EmptyCategory,
    #[error("File path cannot be empty")]
    EmptyFilePath,
    #[error("Image path cannot be empty")]
    EmptyImagePath,
    #[error("Title does not reduce to a usable id")]
    UnusableSlug,
    #[error("Ordinal {value} exceeds the largest representable value {max}")]
    OrdinalOutOfRange { value: u32, max: u32 },
    #[error("Duplicate id in reorder request: {0}")]
    DuplicateReorderId(String),
    #[error("Duplicate target position in reorder request: {0}")]
    DuplicateReorderTarget(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::EmptyTitle.to_string(),
            "Title cannot be empty"
        );
        assert_eq!(
            ValidationError::OrdinalOutOfRange {
                value: 1200,
                max: 999
            }
            .to_string(),
            "Ordinal 1200 exceeds the largest representable value 999"
        );
        assert_eq!(
            ValidationError::DuplicateReorderTarget(4).to_string(),
            "Duplicate target position in reorder request: 4"
        );
    }
}
