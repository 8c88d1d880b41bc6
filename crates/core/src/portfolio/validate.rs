use std::collections::HashSet;

use super::error::ValidationError;
use super::requests::{
    CreateCarouselItem, CreateImage, CreateProject, ReorderPair, UpdateCarouselItem, UpdateImage,
    UpdateProject,
};

const MAX_TITLE_LEN: usize = 200;

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Validates a project creation request.
pub fn validate_new_project(request: &CreateProject) -> Result<(), ValidationError> {
    check_title(&request.title)?;
    if request.category.trim().is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(())
}

/// Validates a project update request. Only provided fields are checked.
pub fn validate_project_update(request: &UpdateProject) -> Result<(), ValidationError> {
    if let Some(title) = &request.title {
        check_title(title)?;
    }
    if let Some(category) = &request.category {
        if category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
    }
    Ok(())
}

/// Validates an image creation request.
pub fn validate_new_image(request: &CreateImage) -> Result<(), ValidationError> {
    check_title(&request.title)?;
    if request.file_path.trim().is_empty() || request.file_name.trim().is_empty() {
        return Err(ValidationError::EmptyFilePath);
    }
    Ok(())
}

/// Validates an image update request. Only provided fields are checked.
pub fn validate_image_update(request: &UpdateImage) -> Result<(), ValidationError> {
    if let Some(title) = &request.title {
        check_title(title)?;
    }
    if let Some(file_path) = &request.file_path {
        if file_path.trim().is_empty() {
            return Err(ValidationError::EmptyFilePath);
        }
    }
    if let Some(file_name) = &request.file_name {
        if file_name.trim().is_empty() {
            return Err(ValidationError::EmptyFilePath);
        }
    }
    Ok(())
}

/// Validates a carousel item creation request.
pub fn validate_new_carousel_item(request: &CreateCarouselItem) -> Result<(), ValidationError> {
    check_title(&request.title)?;
    if request.image_path.trim().is_empty() {
        return Err(ValidationError::EmptyImagePath);
    }
    Ok(())
}

/// Validates a carousel item update request. Only provided fields are
/// checked.
pub fn validate_carousel_update(request: &UpdateCarouselItem) -> Result<(), ValidationError> {
    if let Some(title) = &request.title {
        check_title(title)?;
    }
    if let Some(image_path) = &request.image_path {
        if image_path.trim().is_empty() {
            return Err(ValidationError::EmptyImagePath);
        }
    }
    Ok(())
}

/// Rejects reorder requests where the same id or the same target ordinal
/// appears twice; either would make the rewrite ambiguous.
pub fn validate_reorder_pairs(pairs: &[ReorderPair]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    let mut targets = HashSet::new();
    for pair in pairs {
        if !ids.insert(pair.id) {
            return Err(ValidationError::DuplicateReorderId(pair.id.to_string()));
        }
        if !targets.insert(pair.position) {
            return Err(ValidationError::DuplicateReorderTarget(pair.position));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn rejects_empty_title() {
        let request = CreateProject::new("   ", "landscape");
        assert_eq!(
            validate_new_project(&request),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn rejects_overlong_title() {
        let request = CreateProject::new("x".repeat(201), "landscape");
        assert_eq!(
            validate_new_project(&request),
            Err(ValidationError::TitleTooLong)
        );
    }

    #[test]
    fn rejects_empty_category() {
        let request = CreateProject::new("Title", " ");
        assert_eq!(
            validate_new_project(&request),
            Err(ValidationError::EmptyCategory)
        );
    }

    #[test]
    fn update_checks_only_provided_fields() {
        assert_eq!(validate_project_update(&UpdateProject::new()), Ok(()));
        assert_eq!(
            validate_project_update(&UpdateProject::new().with_title("")),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn image_requires_file_paths() {
        let request = CreateImage::new("Image", "", "/photos/a.jpg");
        assert_eq!(
            validate_new_image(&request),
            Err(ValidationError::EmptyFilePath)
        );
    }

    #[test]
    fn carousel_requires_image_path() {
        let request = CreateCarouselItem::new("Slide", "");
        assert_eq!(
            validate_new_carousel_item(&request),
            Err(ValidationError::EmptyImagePath)
        );
    }

    #[test]
    fn reorder_rejects_duplicate_ids() {
        let id = Uuid::new_v4();
        let pairs = [
            ReorderPair { id, position: 1 },
            ReorderPair { id, position: 2 },
        ];
        assert_eq!(
            validate_reorder_pairs(&pairs),
            Err(ValidationError::DuplicateReorderId(id.to_string()))
        );
    }

    #[test]
    fn reorder_rejects_duplicate_targets() {
        let pairs = [
            ReorderPair {
                id: Uuid::new_v4(),
                position: 1,
            },
            ReorderPair {
                id: Uuid::new_v4(),
                position: 1,
            },
        ];
        assert_eq!(
            validate_reorder_pairs(&pairs),
            Err(ValidationError::DuplicateReorderTarget(1))
        );
    }

    #[test]
    fn accepts_distinct_pairs() {
        let pairs = [
            ReorderPair {
                id: Uuid::new_v4(),
                position: 2,
            },
            ReorderPair {
                id: Uuid::new_v4(),
                position: 1,
            },
        ];
        assert_eq!(validate_reorder_pairs(&pairs), Ok(()));
    }
}
