//! API request types for portfolio operations.
//!
//! These types are shared between the server and its callers for type-safe
//! API communication. Pure data, no I/O. Update payloads distinguish "field
//! absent" (no change) from "field null" (clear the value) with a
//! double-`Option`: the outer `Option` is presence, the inner is the value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::types::{
    CarouselItem, CarouselStatus, Dimensions, Image, LinkType, Project, PublishStatus,
};

/// Which index-bearing attributes a partial update changed, so the
/// repository knows whether stored index keys must be recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexedAttrChanges {
    pub status: bool,
    pub category: bool,
    pub featured: bool,
    pub position: bool,
}

impl IndexedAttrChanges {
    /// True if any indexed attribute changed.
    pub fn any(&self) -> bool {
        self.status || self.category || self.featured || self.position
    }
}

/// One (id, ordinal) assignment in a reorder request. `position` is the
/// target sort order for images and the target slot for carousel items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderPair {
    pub id: Uuid,
    pub position: u32,
}

/// Request payload for creating a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Explicit slug; derived from the title when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl CreateProject {
    /// Create a new request with the required fields.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            project_id: None,
            title: title.into(),
            description: None,
            category: category.into(),
            status: None,
            tags: None,
            location: None,
            sort_order: None,
            is_visible: None,
            featured_image: None,
            cover_image: None,
        }
    }

    /// Set an explicit project id instead of deriving one from the title.
    pub fn with_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the project description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the publication status.
    pub fn with_status(mut self, status: PublishStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the visibility flag.
    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = Some(is_visible);
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Convert into a Project, filling documented defaults and stamping
    /// timestamps. `published_at` is set only when the record is born
    /// published.
    pub fn into_project(self, project_id: String, now: DateTime<Utc>) -> Project {
        let status = self.status.unwrap_or(PublishStatus::Draft);
        Project {
            project_id,
            title: self.title,
            description: self.description,
            category: self.category,
            status,
            tags: self.tags.unwrap_or_default(),
            location: self.location,
            sort_order: self.sort_order.unwrap_or(0),
            is_visible: self.is_visible.unwrap_or(true),
            image_count: 0,
            view_count: 0,
            featured_image: self.featured_image,
            cover_image: self.cover_image,
            created_at: now,
            updated_at: now,
            published_at: (status == PublishStatus::Published).then_some(now),
        }
    }
}

/// Request payload for partially updating a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub featured_image: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<Option<String>>,
}

impl UpdateProject {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the publication status.
    pub fn with_status(mut self, status: PublishStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the visibility flag.
    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = Some(is_visible);
        self
    }

    /// Merge the provided fields into `project`, refresh `updated_at`, and
    /// report which indexed attributes changed. The transition into
    /// `published` stamps `published_at`.
    pub fn apply_to(&self, project: &mut Project, now: DateTime<Utc>) -> IndexedAttrChanges {
        let mut changes = IndexedAttrChanges::default();
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(category) = &self.category {
            if *category != project.category {
                changes.category = true;
            }
            project.category = category.clone();
        }
        if let Some(status) = self.status {
            if status != project.status {
                changes.status = true;
                if status == PublishStatus::Published {
                    project.published_at = Some(now);
                }
            }
            project.status = status;
        }
        if let Some(tags) = &self.tags {
            project.tags = tags.clone();
        }
        if let Some(location) = &self.location {
            project.location = location.clone();
        }
        if let Some(sort_order) = self.sort_order {
            project.sort_order = sort_order;
        }
        if let Some(is_visible) = self.is_visible {
            project.is_visible = is_visible;
        }
        if let Some(featured_image) = &self.featured_image {
            project.featured_image = featured_image.clone();
        }
        if let Some(cover_image) = &self.cover_image {
            project.cover_image = cover_image.clone();
        }
        project.updated_at = now;
        changes
    }
}

/// Request payload for adding an image to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateImage {
    /// Explicit id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<Uuid>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file_name: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    /// Explicit sort order; assigned max+1 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif_data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<Vec<String>>,
}

impl CreateImage {
    /// Create a new request with the required fields.
    pub fn new(
        title: impl Into<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            image_id: None,
            title: title.into(),
            description: None,
            file_name: file_name.into(),
            file_path: file_path.into(),
            thumbnail_path: None,
            file_size: None,
            dimensions: None,
            format: None,
            status: None,
            sort_order: None,
            is_featured: None,
            is_visible: None,
            tags: None,
            exif_data: None,
            color_palette: None,
        }
    }

    /// Set an explicit image id.
    pub fn with_id(mut self, image_id: Uuid) -> Self {
        self.image_id = Some(image_id);
        self
    }

    /// Set the publication status.
    pub fn with_status(mut self, status: PublishStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set an explicit sort order instead of max+1 assignment.
    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Set the featured flag.
    pub fn with_featured(mut self, is_featured: bool) -> Self {
        self.is_featured = Some(is_featured);
        self
    }

    /// Set the visibility flag.
    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = Some(is_visible);
        self
    }

    /// Convert into an Image with defaults filled and timestamps stamped.
    pub fn into_image(
        self,
        image_id: Uuid,
        project_id: impl Into<String>,
        sort_order: u32,
        now: DateTime<Utc>,
    ) -> Image {
        Image {
            image_id,
            project_id: project_id.into(),
            title: self.title,
            description: self.description,
            file_name: self.file_name,
            file_path: self.file_path,
            thumbnail_path: self.thumbnail_path,
            file_size: self.file_size.unwrap_or(0),
            dimensions: self.dimensions,
            format: self.format,
            status: self.status.unwrap_or(PublishStatus::Draft),
            sort_order,
            is_featured: self.is_featured.unwrap_or(false),
            is_visible: self.is_visible.unwrap_or(true),
            tags: self.tags.unwrap_or_default(),
            exif_data: self.exif_data.unwrap_or_default(),
            color_palette: self.color_palette.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request payload for partially updating an image.
///
/// `sort_order` is deliberately absent: moving an image rewrites its sort
/// key and goes through the reorder operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_path: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub format: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exif_data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<Vec<String>>,
}

impl UpdateImage {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the publication status.
    pub fn with_status(mut self, status: PublishStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the featured flag.
    pub fn with_featured(mut self, is_featured: bool) -> Self {
        self.is_featured = Some(is_featured);
        self
    }

    /// Set the visibility flag.
    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = Some(is_visible);
        self
    }

    /// Merge the provided fields into `image`, refresh `updated_at`, and
    /// report which indexed attributes changed.
    pub fn apply_to(&self, image: &mut Image, now: DateTime<Utc>) -> IndexedAttrChanges {
        let mut changes = IndexedAttrChanges::default();
        if let Some(title) = &self.title {
            image.title = title.clone();
        }
        if let Some(description) = &self.description {
            image.description = description.clone();
        }
        if let Some(file_name) = &self.file_name {
            image.file_name = file_name.clone();
        }
        if let Some(file_path) = &self.file_path {
            image.file_path = file_path.clone();
        }
        if let Some(thumbnail_path) = &self.thumbnail_path {
            image.thumbnail_path = thumbnail_path.clone();
        }
        if let Some(file_size) = self.file_size {
            image.file_size = file_size;
        }
        if let Some(dimensions) = self.dimensions {
            image.dimensions = Some(dimensions);
        }
        if let Some(format) = &self.format {
            image.format = format.clone();
        }
        if let Some(status) = self.status {
            if status != image.status {
                changes.status = true;
            }
            image.status = status;
        }
        if let Some(is_featured) = self.is_featured {
            if is_featured != image.is_featured {
                changes.featured = true;
            }
            image.is_featured = is_featured;
        }
        if let Some(is_visible) = self.is_visible {
            image.is_visible = is_visible;
        }
        if let Some(tags) = &self.tags {
            image.tags = tags.clone();
        }
        if let Some(exif_data) = &self.exif_data {
            image.exif_data = exif_data.clone();
        }
        if let Some(color_palette) = &self.color_palette {
            image.color_palette = color_palette.clone();
        }
        image.updated_at = now;
        changes
    }
}

/// Request payload for creating a carousel item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCarouselItem {
    /// Explicit id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<Uuid>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    /// Explicit slot; assigned max+1 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CarouselStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_end: Option<DateTime<Utc>>,
}

impl CreateCarouselItem {
    /// Create a new request with the required fields.
    pub fn new(title: impl Into<String>, image_path: impl Into<String>) -> Self {
        Self {
            item_id: None,
            title: title.into(),
            subtitle: None,
            description: None,
            image_path: image_path.into(),
            mobile_image_path: None,
            link_type: None,
            link_target: None,
            link_url: None,
            button_text: None,
            position: None,
            status: None,
            is_visible: None,
            display_duration: None,
            transition_type: None,
            text_position: None,
            text_color: None,
            overlay_opacity: None,
            scheduled_start: None,
            scheduled_end: None,
        }
    }

    /// Set an explicit item id.
    pub fn with_id(mut self, item_id: Uuid) -> Self {
        self.item_id = Some(item_id);
        self
    }

    /// Set an explicit position instead of max+1 assignment.
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: CarouselStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the visibility flag.
    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = Some(is_visible);
        self
    }

    /// Convert into a CarouselItem with defaults filled and timestamps
    /// stamped.
    pub fn into_item(self, item_id: Uuid, position: u32, now: DateTime<Utc>) -> CarouselItem {
        CarouselItem {
            item_id,
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            image_path: self.image_path,
            mobile_image_path: self.mobile_image_path,
            link_type: self.link_type.unwrap_or(LinkType::None),
            link_target: self.link_target,
            link_url: self.link_url,
            button_text: self.button_text,
            position,
            status: self.status.unwrap_or(CarouselStatus::Draft),
            is_visible: self.is_visible.unwrap_or(true),
            display_duration: self.display_duration.unwrap_or(5000),
            transition_type: self.transition_type,
            text_position: self.text_position,
            text_color: self.text_color,
            overlay_opacity: self.overlay_opacity,
            scheduled_start: self.scheduled_start,
            scheduled_end: self.scheduled_end,
            view_count: 0,
            click_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request payload for partially updating a carousel item.
///
/// A `position` change moves the item's sort key; the repository applies it
/// as an atomic delete + put of the same record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCarouselItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtitle: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub mobile_image_path: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub link_target: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub link_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub button_text: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CarouselStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_duration: Option<u32>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub transition_type: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_position: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_color: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub overlay_opacity: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_start: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_end: Option<Option<DateTime<Utc>>>,
}

impl UpdateCarouselItem {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: CarouselStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the position.
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the visibility flag.
    pub fn with_visible(mut self, is_visible: bool) -> Self {
        self.is_visible = Some(is_visible);
        self
    }

    /// Merge the provided fields into `item`, refresh `updated_at`, and
    /// report which indexed attributes changed.
    pub fn apply_to(&self, item: &mut CarouselItem, now: DateTime<Utc>) -> IndexedAttrChanges {
        let mut changes = IndexedAttrChanges::default();
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(subtitle) = &self.subtitle {
            item.subtitle = subtitle.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(image_path) = &self.image_path {
            item.image_path = image_path.clone();
        }
        if let Some(mobile_image_path) = &self.mobile_image_path {
            item.mobile_image_path = mobile_image_path.clone();
        }
        if let Some(link_type) = self.link_type {
            item.link_type = link_type;
        }
        if let Some(link_target) = &self.link_target {
            item.link_target = link_target.clone();
        }
        if let Some(link_url) = &self.link_url {
            item.link_url = link_url.clone();
        }
        if let Some(button_text) = &self.button_text {
            item.button_text = button_text.clone();
        }
        if let Some(position) = self.position {
            if position != item.position {
                changes.position = true;
            }
            item.position = position;
        }
        if let Some(status) = self.status {
            if status != item.status {
                changes.status = true;
            }
            item.status = status;
        }
        if let Some(is_visible) = self.is_visible {
            item.is_visible = is_visible;
        }
        if let Some(display_duration) = self.display_duration {
            item.display_duration = display_duration;
        }
        if let Some(transition_type) = &self.transition_type {
            item.transition_type = transition_type.clone();
        }
        if let Some(text_position) = &self.text_position {
            item.text_position = text_position.clone();
        }
        if let Some(text_color) = &self.text_color {
            item.text_color = text_color.clone();
        }
        if let Some(overlay_opacity) = self.overlay_opacity {
            item.overlay_opacity = overlay_opacity;
        }
        if let Some(scheduled_start) = self.scheduled_start {
            item.scheduled_start = scheduled_start;
        }
        if let Some(scheduled_end) = self.scheduled_end {
            item.scheduled_end = scheduled_end;
        }
        item.updated_at = now;
        changes
    }
}

/// Deserializer distinguishing "field absent" from "field set to null".
/// Absent fields stay `None` via `#[serde(default)]`; any present value,
/// null included, arrives as `Some(inner)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn create_project_fills_defaults() {
        let project =
            CreateProject::new("Mountain Series", "landscape").into_project("mountain-series".to_string(), fixed_now());
        assert_eq!(project.project_id, "mountain-series");
        assert_eq!(project.status, PublishStatus::Draft);
        assert!(project.is_visible);
        assert_eq!(project.image_count, 0);
        assert_eq!(project.view_count, 0);
        assert!(project.tags.is_empty());
        assert_eq!(project.published_at, None);
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn project_born_published_gets_published_at() {
        let project = CreateProject::new("Live", "street")
            .with_status(PublishStatus::Published)
            .into_project("live".to_string(), fixed_now());
        assert_eq!(project.published_at, Some(fixed_now()));
    }

    #[test]
    fn update_project_merges_only_provided_fields() {
        let mut project = CreateProject::new("Original", "landscape")
            .with_description("keep me")
            .into_project("original".to_string(), fixed_now());
        let later = fixed_now() + chrono::Duration::hours(1);

        let changes = UpdateProject::new()
            .with_title("Renamed")
            .apply_to(&mut project, later);

        assert_eq!(project.title, "Renamed");
        assert_eq!(project.description.as_deref(), Some("keep me"));
        assert_eq!(project.updated_at, later);
        assert!(!changes.any());
    }

    #[test]
    fn update_project_reports_index_changes() {
        let mut project =
            CreateProject::new("P", "landscape").into_project("p".to_string(), fixed_now());
        let later = fixed_now() + chrono::Duration::hours(1);

        let changes = UpdateProject::new()
            .with_status(PublishStatus::Published)
            .with_category("street")
            .apply_to(&mut project, later);

        assert!(changes.status);
        assert!(changes.category);
        assert_eq!(project.published_at, Some(later));
    }

    #[test]
    fn update_with_same_values_reports_no_changes() {
        let mut project =
            CreateProject::new("P", "landscape").into_project("p".to_string(), fixed_now());
        let changes = UpdateProject::new()
            .with_status(PublishStatus::Draft)
            .with_category("landscape")
            .apply_to(&mut project, fixed_now());
        assert!(!changes.any());
        assert_eq!(project.published_at, None);
    }

    #[test]
    fn null_and_absent_fields_deserialize_differently() {
        let update: UpdateProject =
            serde_json::from_str(r#"{"description": null, "title": "T"}"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.location, None);
        assert_eq!(update.title.as_deref(), Some("T"));
    }

    #[test]
    fn explicit_null_clears_the_field() {
        let mut project = CreateProject::new("P", "landscape")
            .with_description("old")
            .into_project("p".to_string(), fixed_now());
        let update: UpdateProject = serde_json::from_str(r#"{"description": null}"#).unwrap();
        update.apply_to(&mut project, fixed_now());
        assert_eq!(project.description, None);
    }

    #[test]
    fn update_image_reports_featured_change() {
        let mut image = CreateImage::new("I", "i.jpg", "/photos/i.jpg").into_image(
            Uuid::new_v4(),
            "p",
            1,
            fixed_now(),
        );
        let changes = UpdateImage::new()
            .with_featured(true)
            .apply_to(&mut image, fixed_now());
        assert!(changes.featured);
        assert!(!changes.status);
    }

    #[test]
    fn update_carousel_reports_position_change() {
        let mut item =
            CreateCarouselItem::new("Slide", "/img/slide.jpg").into_item(Uuid::new_v4(), 3, fixed_now());
        let changes = UpdateCarouselItem::new()
            .with_position(1)
            .apply_to(&mut item, fixed_now());
        assert!(changes.position);

        let changes = UpdateCarouselItem::new()
            .with_position(1)
            .apply_to(&mut item, fixed_now());
        assert!(!changes.position);
    }

    #[test]
    fn create_carousel_item_fills_defaults() {
        let item = CreateCarouselItem::new("Slide", "/img/slide.jpg").into_item(
            Uuid::new_v4(),
            1,
            fixed_now(),
        );
        assert_eq!(item.link_type, LinkType::None);
        assert_eq!(item.status, CarouselStatus::Draft);
        assert_eq!(item.display_duration, 5000);
        assert!(item.is_visible);
        assert_eq!(item.view_count, 0);
        assert_eq!(item.click_count, 0);
    }
}
