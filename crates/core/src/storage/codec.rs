//! Conversions between portfolio entities and stored items.
//!
//! Encoding derives every key attribute from the entity so callers never
//! assemble keys by hand. Decoding is tolerant: attributes added after a
//! record was written fall back to their defaults (`isVisible` to true,
//! counters to zero, lists to empty), while a record missing its identity
//! attributes is reported as [`StoreError::MalformedRecord`].

use serde_json::Value;

use crate::portfolio::{
    CarouselItem, CarouselStatus, Dimensions, Image, LinkType, Project, PublishStatus,
};

use super::error::StoreError;
use super::item::{self, StoredItem};
use super::keys;

pub const ATTR_ENTITY_TYPE: &str = "entityType";
pub const ATTR_PROJECT_ID: &str = "projectId";
pub const ATTR_IMAGE_ID: &str = "imageId";
pub const ATTR_ITEM_ID: &str = "itemId";
pub const ATTR_IMAGE_COUNT: &str = "imageCount";
pub const ATTR_VIEW_COUNT: &str = "viewCount";
pub const ATTR_CLICK_COUNT: &str = "clickCount";

pub const ENTITY_TYPE_PROJECT: &str = "PROJECT";
pub const ENTITY_TYPE_IMAGE: &str = "IMAGE";
pub const ENTITY_TYPE_CAROUSEL_ITEM: &str = "CAROUSEL_ITEM";

// ============================================================================
// Project conversions
// ============================================================================

pub fn project_to_item(project: &Project) -> StoredItem {
    let mut item = StoredItem::new();

    item.insert(
        keys::ATTR_PK.to_string(),
        Value::String(keys::project_pk().to_string()),
    );
    item.insert(
        keys::ATTR_SK.to_string(),
        Value::String(keys::project_sk(project.created_at, &project.project_id)),
    );
    item.insert(
        keys::ATTR_GSI1_PK.to_string(),
        Value::String(keys::project_gsi1_pk(project.status)),
    );
    item.insert(
        keys::ATTR_GSI1_SK.to_string(),
        Value::String(keys::project_gsi1_sk(project.updated_at)),
    );
    item.insert(
        keys::ATTR_GSI2_PK.to_string(),
        Value::String(keys::project_gsi2_pk(&project.category)),
    );
    item.insert(
        keys::ATTR_GSI2_SK.to_string(),
        Value::String(keys::project_gsi2_sk(project.updated_at)),
    );
    item.insert(
        ATTR_ENTITY_TYPE.to_string(),
        Value::String(ENTITY_TYPE_PROJECT.to_string()),
    );

    item.insert(
        ATTR_PROJECT_ID.to_string(),
        Value::String(project.project_id.clone()),
    );
    item.insert(
        "title".to_string(),
        Value::String(project.title.clone()),
    );
    if let Some(description) = &project.description {
        item.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    item.insert(
        "category".to_string(),
        Value::String(project.category.clone()),
    );
    item.insert(
        "status".to_string(),
        Value::String(project.status.as_str().to_string()),
    );
    item.insert("tags".to_string(), string_list(&project.tags));
    if let Some(location) = &project.location {
        item.insert("location".to_string(), Value::String(location.clone()));
    }
    item.insert("sortOrder".to_string(), Value::from(project.sort_order));
    item.insert("isVisible".to_string(), Value::Bool(project.is_visible));
    item.insert(ATTR_IMAGE_COUNT.to_string(), Value::from(project.image_count));
    item.insert(ATTR_VIEW_COUNT.to_string(), Value::from(project.view_count));
    if let Some(featured_image) = &project.featured_image {
        item.insert(
            "featuredImage".to_string(),
            Value::String(featured_image.clone()),
        );
    }
    if let Some(cover_image) = &project.cover_image {
        item.insert("coverImage".to_string(), Value::String(cover_image.clone()));
    }
    item.insert(
        "createdAt".to_string(),
        Value::String(keys::iso_millis(project.created_at)),
    );
    item.insert(
        "updatedAt".to_string(),
        Value::String(keys::iso_millis(project.updated_at)),
    );
    if let Some(published_at) = project.published_at {
        item.insert(
            "publishedAt".to_string(),
            Value::String(keys::iso_millis(published_at)),
        );
    }

    item
}

pub fn item_to_project(item: &StoredItem) -> Result<Project, StoreError> {
    Ok(Project {
        project_id: item::get_string(item, ATTR_PROJECT_ID)?,
        title: item::get_string(item, "title")?,
        description: item::get_optional_string(item, "description"),
        category: item::get_string(item, "category")?,
        status: parse_publish_status(item)?,
        tags: item::get_string_list(item, "tags"),
        location: item::get_optional_string(item, "location"),
        sort_order: item::get_u32_or(item, "sortOrder", 0),
        is_visible: item::get_bool_or(item, "isVisible", true),
        image_count: item::get_u32_or(item, ATTR_IMAGE_COUNT, 0),
        view_count: item::get_u32_or(item, ATTR_VIEW_COUNT, 0),
        featured_image: item::get_optional_string(item, "featuredImage"),
        cover_image: item::get_optional_string(item, "coverImage"),
        created_at: item::get_datetime(item, "createdAt")?,
        updated_at: item::get_datetime(item, "updatedAt")?,
        published_at: item::get_optional_datetime(item, "publishedAt")?,
    })
}

// ============================================================================
// Image conversions
// ============================================================================

pub fn image_to_item(image: &Image) -> StoredItem {
    let mut item = StoredItem::new();

    item.insert(
        keys::ATTR_PK.to_string(),
        Value::String(keys::image_pk(&image.project_id)),
    );
    item.insert(
        keys::ATTR_SK.to_string(),
        Value::String(keys::image_sk(image.sort_order, image.image_id)),
    );
    item.insert(
        keys::ATTR_GSI1_PK.to_string(),
        Value::String(keys::image_gsi1_pk(image.status)),
    );
    item.insert(
        keys::ATTR_GSI1_SK.to_string(),
        Value::String(keys::image_gsi1_sk(image.updated_at)),
    );
    item.insert(
        keys::ATTR_GSI2_PK.to_string(),
        Value::String(keys::image_gsi2_pk(image.is_featured)),
    );
    item.insert(
        keys::ATTR_GSI2_SK.to_string(),
        Value::String(keys::image_gsi2_sk(image.updated_at)),
    );
    item.insert(
        ATTR_ENTITY_TYPE.to_string(),
        Value::String(ENTITY_TYPE_IMAGE.to_string()),
    );

    item.insert(
        ATTR_IMAGE_ID.to_string(),
        Value::String(image.image_id.to_string()),
    );
    item.insert(
        ATTR_PROJECT_ID.to_string(),
        Value::String(image.project_id.clone()),
    );
    item.insert("title".to_string(), Value::String(image.title.clone()));
    if let Some(description) = &image.description {
        item.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    item.insert(
        "fileName".to_string(),
        Value::String(image.file_name.clone()),
    );
    item.insert(
        "filePath".to_string(),
        Value::String(image.file_path.clone()),
    );
    if let Some(thumbnail_path) = &image.thumbnail_path {
        item.insert(
            "thumbnailPath".to_string(),
            Value::String(thumbnail_path.clone()),
        );
    }
    item.insert("fileSize".to_string(), Value::from(image.file_size));
    if let Some(dimensions) = &image.dimensions {
        item.insert("width".to_string(), Value::from(dimensions.width));
        item.insert("height".to_string(), Value::from(dimensions.height));
    }
    if let Some(format) = &image.format {
        item.insert("format".to_string(), Value::String(format.clone()));
    }
    item.insert(
        "status".to_string(),
        Value::String(image.status.as_str().to_string()),
    );
    item.insert("sortOrder".to_string(), Value::from(image.sort_order));
    item.insert("isFeatured".to_string(), Value::Bool(image.is_featured));
    item.insert("isVisible".to_string(), Value::Bool(image.is_visible));
    item.insert("tags".to_string(), string_list(&image.tags));
    if !image.exif_data.is_empty() {
        item.insert(
            "exifData".to_string(),
            Value::Object(image.exif_data.clone()),
        );
    }
    item.insert(
        "colorPalette".to_string(),
        string_list(&image.color_palette),
    );
    item.insert(
        "createdAt".to_string(),
        Value::String(keys::iso_millis(image.created_at)),
    );
    item.insert(
        "updatedAt".to_string(),
        Value::String(keys::iso_millis(image.updated_at)),
    );

    item
}

pub fn item_to_image(item: &StoredItem) -> Result<Image, StoreError> {
    Ok(Image {
        image_id: item::get_uuid(item, ATTR_IMAGE_ID)?,
        project_id: item::get_string(item, ATTR_PROJECT_ID)?,
        title: item::get_string(item, "title")?,
        description: item::get_optional_string(item, "description"),
        file_name: item::get_string(item, "fileName")?,
        file_path: item::get_string(item, "filePath")?,
        thumbnail_path: item::get_optional_string(item, "thumbnailPath"),
        file_size: item::get_u64_or(item, "fileSize", 0),
        dimensions: decode_dimensions(item),
        format: item::get_optional_string(item, "format"),
        status: parse_publish_status(item)?,
        sort_order: item::get_u32(item, "sortOrder")?,
        is_featured: item::get_bool_or(item, "isFeatured", false),
        is_visible: item::get_bool_or(item, "isVisible", true),
        tags: item::get_string_list(item, "tags"),
        exif_data: item::get_object(item, "exifData"),
        color_palette: item::get_string_list(item, "colorPalette"),
        created_at: item::get_datetime(item, "createdAt")?,
        updated_at: item::get_datetime(item, "updatedAt")?,
    })
}

// ============================================================================
// CarouselItem conversions
// ============================================================================

pub fn carousel_item_to_item(carousel_item: &CarouselItem) -> StoredItem {
    let mut item = StoredItem::new();

    item.insert(
        keys::ATTR_PK.to_string(),
        Value::String(keys::carousel_pk().to_string()),
    );
    item.insert(
        keys::ATTR_SK.to_string(),
        Value::String(keys::carousel_sk(
            carousel_item.position,
            carousel_item.item_id,
        )),
    );
    item.insert(
        keys::ATTR_GSI1_PK.to_string(),
        Value::String(keys::carousel_gsi1_pk(carousel_item.status)),
    );
    item.insert(
        keys::ATTR_GSI1_SK.to_string(),
        Value::String(keys::carousel_gsi1_sk(carousel_item.position)),
    );
    item.insert(
        ATTR_ENTITY_TYPE.to_string(),
        Value::String(ENTITY_TYPE_CAROUSEL_ITEM.to_string()),
    );

    item.insert(
        ATTR_ITEM_ID.to_string(),
        Value::String(carousel_item.item_id.to_string()),
    );
    item.insert(
        "title".to_string(),
        Value::String(carousel_item.title.clone()),
    );
    if let Some(subtitle) = &carousel_item.subtitle {
        item.insert("subtitle".to_string(), Value::String(subtitle.clone()));
    }
    if let Some(description) = &carousel_item.description {
        item.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    item.insert(
        "imagePath".to_string(),
        Value::String(carousel_item.image_path.clone()),
    );
    if let Some(mobile_image_path) = &carousel_item.mobile_image_path {
        item.insert(
            "mobileImagePath".to_string(),
            Value::String(mobile_image_path.clone()),
        );
    }
    item.insert(
        "linkType".to_string(),
        Value::String(carousel_item.link_type.as_str().to_string()),
    );
    if let Some(link_target) = &carousel_item.link_target {
        item.insert("linkTarget".to_string(), Value::String(link_target.clone()));
    }
    if let Some(link_url) = &carousel_item.link_url {
        item.insert("linkUrl".to_string(), Value::String(link_url.clone()));
    }
    if let Some(button_text) = &carousel_item.button_text {
        item.insert("buttonText".to_string(), Value::String(button_text.clone()));
    }
    item.insert("position".to_string(), Value::from(carousel_item.position));
    item.insert(
        "status".to_string(),
        Value::String(carousel_item.status.as_str().to_string()),
    );
    item.insert(
        "isVisible".to_string(),
        Value::Bool(carousel_item.is_visible),
    );
    item.insert(
        "displayDuration".to_string(),
        Value::from(carousel_item.display_duration),
    );
    if let Some(transition_type) = &carousel_item.transition_type {
        item.insert(
            "transitionType".to_string(),
            Value::String(transition_type.clone()),
        );
    }
    if let Some(text_position) = &carousel_item.text_position {
        item.insert(
            "textPosition".to_string(),
            Value::String(text_position.clone()),
        );
    }
    if let Some(text_color) = &carousel_item.text_color {
        item.insert("textColor".to_string(), Value::String(text_color.clone()));
    }
    if let Some(overlay_opacity) = carousel_item.overlay_opacity {
        item.insert("overlayOpacity".to_string(), Value::from(overlay_opacity));
    }
    if let Some(scheduled_start) = carousel_item.scheduled_start {
        item.insert(
            "scheduledStart".to_string(),
            Value::String(keys::iso_millis(scheduled_start)),
        );
    }
    if let Some(scheduled_end) = carousel_item.scheduled_end {
        item.insert(
            "scheduledEnd".to_string(),
            Value::String(keys::iso_millis(scheduled_end)),
        );
    }
    item.insert(
        ATTR_VIEW_COUNT.to_string(),
        Value::from(carousel_item.view_count),
    );
    item.insert(
        ATTR_CLICK_COUNT.to_string(),
        Value::from(carousel_item.click_count),
    );
    item.insert(
        "createdAt".to_string(),
        Value::String(keys::iso_millis(carousel_item.created_at)),
    );
    item.insert(
        "updatedAt".to_string(),
        Value::String(keys::iso_millis(carousel_item.updated_at)),
    );

    item
}

pub fn item_to_carousel_item(item: &StoredItem) -> Result<CarouselItem, StoreError> {
    Ok(CarouselItem {
        item_id: item::get_uuid(item, ATTR_ITEM_ID)?,
        title: item::get_string(item, "title")?,
        subtitle: item::get_optional_string(item, "subtitle"),
        description: item::get_optional_string(item, "description"),
        image_path: item::get_string(item, "imagePath")?,
        mobile_image_path: item::get_optional_string(item, "mobileImagePath"),
        link_type: parse_link_type(item)?,
        link_target: item::get_optional_string(item, "linkTarget"),
        link_url: item::get_optional_string(item, "linkUrl"),
        button_text: item::get_optional_string(item, "buttonText"),
        position: item::get_u32(item, "position")?,
        status: parse_carousel_status(item)?,
        is_visible: item::get_bool_or(item, "isVisible", true),
        display_duration: item::get_u32_or(item, "displayDuration", 5000),
        transition_type: item::get_optional_string(item, "transitionType"),
        text_position: item::get_optional_string(item, "textPosition"),
        text_color: item::get_optional_string(item, "textColor"),
        overlay_opacity: item::get_optional_f64(item, "overlayOpacity"),
        scheduled_start: item::get_optional_datetime(item, "scheduledStart")?,
        scheduled_end: item::get_optional_datetime(item, "scheduledEnd")?,
        view_count: item::get_u32_or(item, ATTR_VIEW_COUNT, 0),
        click_count: item::get_u32_or(item, ATTR_CLICK_COUNT, 0),
        created_at: item::get_datetime(item, "createdAt")?,
        updated_at: item::get_datetime(item, "updatedAt")?,
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Error-context identity for a stored item: the entity label used in error
/// messages plus the item's own id.
pub fn item_identity(item: &StoredItem) -> (&'static str, String) {
    match item.get(ATTR_ENTITY_TYPE).and_then(Value::as_str) {
        Some(ENTITY_TYPE_PROJECT) => ("Project", fallback_id(item, ATTR_PROJECT_ID)),
        Some(ENTITY_TYPE_IMAGE) => ("Image", fallback_id(item, ATTR_IMAGE_ID)),
        Some(ENTITY_TYPE_CAROUSEL_ITEM) => ("CarouselItem", fallback_id(item, ATTR_ITEM_ID)),
        _ => ("Item", fallback_id(item, keys::ATTR_SK)),
    }
}

fn fallback_id(item: &StoredItem, key: &str) -> String {
    item::get_optional_string(item, key).unwrap_or_else(|| "unknown".to_string())
}

fn string_list(values: &[String]) -> Value {
    Value::Array(values.iter().map(|v| Value::String(v.clone())).collect())
}

fn decode_dimensions(item: &StoredItem) -> Option<Dimensions> {
    match (item::get_u32(item, "width"), item::get_u32(item, "height")) {
        (Ok(width), Ok(height)) => Some(Dimensions { width, height }),
        _ => None,
    }
}

fn parse_publish_status(item: &StoredItem) -> Result<PublishStatus, StoreError> {
    let status = item::get_string(item, "status")?;
    PublishStatus::parse(&status)
        .ok_or_else(|| StoreError::MalformedRecord(format!("Invalid status: {}", status)))
}

fn parse_carousel_status(item: &StoredItem) -> Result<CarouselStatus, StoreError> {
    let status = item::get_string(item, "status")?;
    CarouselStatus::parse(&status)
        .ok_or_else(|| StoreError::MalformedRecord(format!("Invalid status: {}", status)))
}

fn parse_link_type(item: &StoredItem) -> Result<LinkType, StoreError> {
    match item::get_optional_string(item, "linkType") {
        Some(link_type) => LinkType::parse(&link_type)
            .ok_or_else(|| StoreError::MalformedRecord(format!("Invalid link type: {}", link_type))),
        None => Ok(LinkType::None),
    }
}
