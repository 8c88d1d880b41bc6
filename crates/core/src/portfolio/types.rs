use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Publication state shared by projects and images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    Published,
}

impl PublishStatus {
    /// The lowercase form used in index keys and stored attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Draft => "draft",
            PublishStatus::Published => "published",
        }
    }

    /// Parses the stored lowercase form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(PublishStatus::Draft),
            "published" => Some(PublishStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility state of a carousel item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarouselStatus {
    Draft,
    Active,
}

impl CarouselStatus {
    /// The lowercase form used in index keys and stored attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            CarouselStatus::Draft => "draft",
            CarouselStatus::Active => "active",
        }
    }

    /// Parses the stored lowercase form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(CarouselStatus::Draft),
            "active" => Some(CarouselStatus::Active),
            _ => None,
        }
    }
}

impl std::fmt::Display for CarouselStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a carousel item links to when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    None,
    Project,
    External,
    Page,
}

impl LinkType {
    /// The lowercase form used in stored attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::None => "none",
            LinkType::Project => "project",
            LinkType::External => "external",
            LinkType::Page => "page",
        }
    }

    /// Parses the stored lowercase form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(LinkType::None),
            "project" => Some(LinkType::Project),
            "external" => Some(LinkType::External),
            "page" => Some(LinkType::Page),
            _ => None,
        }
    }
}

/// Pixel dimensions of an image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A portfolio project grouping a series of images.
///
/// The identity is a URL slug, either supplied by the caller or derived from
/// the title. `image_count` is denormalized from the stored images and only
/// ever changes inside the transactional image operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub status: PublishStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub sort_order: u32,
    pub is_visible: bool,
    pub image_count: u32,
    pub view_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// A single photograph belonging to a project.
///
/// `sort_order` drives display order inside the project and is embedded in
/// the stored sort key; moving an image goes through the reorder operation,
/// never through a plain update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub image_id: Uuid,
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file_name: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub status: PublishStatus,
    pub sort_order: u32,
    pub is_featured: bool,
    pub is_visible: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Camera metadata as captured at upload time, stored verbatim.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub exif_data: Map<String, Value>,
    #[serde(default)]
    pub color_palette: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A slide on the homepage carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselItem {
    pub item_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_image_path: Option<String>,
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    pub position: u32,
    pub status: CarouselStatus,
    pub is_visible: bool,
    /// How long the slide stays on screen, in milliseconds.
    pub display_duration: u32,
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
    pub view_count: u32,
    pub click_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_status_round_trips_through_strings() {
        for status in [PublishStatus::Draft, PublishStatus::Published] {
            assert_eq!(PublishStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PublishStatus::parse("archived"), None);
    }

    #[test]
    fn carousel_status_round_trips_through_strings() {
        for status in [CarouselStatus::Draft, CarouselStatus::Active] {
            assert_eq!(CarouselStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CarouselStatus::parse("published"), None);
    }

    #[test]
    fn link_type_round_trips_through_strings() {
        for link in [
            LinkType::None,
            LinkType::Project,
            LinkType::External,
            LinkType::Page,
        ] {
            assert_eq!(LinkType::parse(link.as_str()), Some(link));
        }
        assert_eq!(LinkType::parse("anchor"), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PublishStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(
            serde_json::to_string(&CarouselStatus::Active).unwrap(),
            "\"active\""
        );
    }
}
