//! Key generation for the single-table portfolio design.
//!
//! Pure functions for generating partition, sort, and secondary-index keys.
//! All functions are sync and have no side effects. Ordinals (sort order,
//! position) are zero-padded so lexicographic sort-key order matches numeric
//! order; timestamps are rendered at fixed precision for the same reason.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::portfolio::{CarouselStatus, PublishStatus};

// ============================================================================
// Key attribute names
// ============================================================================

pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_GSI1_PK: &str = "GSI1PK";
pub const ATTR_GSI1_SK: &str = "GSI1SK";
pub const ATTR_GSI2_PK: &str = "GSI2PK";
pub const ATTR_GSI2_SK: &str = "GSI2SK";

// ============================================================================
// Key prefixes and partitions
// ============================================================================

pub const PROJECT_PARTITION: &str = "PROJECT";
pub const PROJECT_PREFIX: &str = "PROJECT#";
pub const IMAGE_PREFIX: &str = "IMAGE#";
pub const CAROUSEL_PARTITION: &str = "CAROUSEL";
pub const ITEM_PREFIX: &str = "ITEM#";
pub const SEQUENCE_PARTITION: &str = "SEQUENCE";

pub const PROJECT_STATUS_PREFIX: &str = "PROJECT#STATUS#";
pub const PROJECT_CATEGORY_PREFIX: &str = "PROJECT#CATEGORY#";
pub const IMAGE_STATUS_PREFIX: &str = "IMAGE#STATUS#";
pub const IMAGE_FEATURED_PREFIX: &str = "IMAGE#FEATURED#";
pub const CAROUSEL_STATUS_PREFIX: &str = "CAROUSEL#STATUS#";

// ============================================================================
// Ordinals and timestamps
// ============================================================================

/// Zero-pad width for sort-order and position key components. Must stay wide
/// enough that the largest expected per-partition item count fits.
pub const ORDINAL_PAD_WIDTH: usize = 3;

/// Largest ordinal representable at [`ORDINAL_PAD_WIDTH`].
pub const MAX_ORDINAL: u32 = 10u32.pow(ORDINAL_PAD_WIDTH as u32) - 1;

/// Zero-pads an ordinal to [`ORDINAL_PAD_WIDTH`] digits.
///
/// Callers validate `value <= MAX_ORDINAL` upstream; a wider value would
/// break lexicographic ordering.
pub fn pad_ordinal(value: u32) -> String {
    format!("{value:0width$}", width = ORDINAL_PAD_WIDTH)
}

/// Formats a timestamp for keys and stored attributes.
///
/// RFC 3339 with fixed millisecond precision and a `Z` suffix, so
/// lexicographic order equals chronological order.
pub fn iso_millis(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Project keys
// ============================================================================

/// Partition key shared by all Project records.
///
/// Pattern: `PROJECT`
pub fn project_pk() -> &'static str {
    PROJECT_PARTITION
}

/// Sort key for a Project.
///
/// Pattern: `PROJECT#<created_at>#<project_id>`. A descending scan of the
/// partition yields newest-first.
pub fn project_sk(created_at: DateTime<Utc>, project_id: &str) -> String {
    format!("{PROJECT_PREFIX}{}#{project_id}", iso_millis(created_at))
}

/// Sort-key prefix for querying all Project records.
///
/// Pattern: `PROJECT#`
pub fn project_sk_prefix() -> &'static str {
    PROJECT_PREFIX
}

/// GSI1 partition key for Project status scans.
///
/// Pattern: `PROJECT#STATUS#<status>`
pub fn project_gsi1_pk(status: PublishStatus) -> String {
    format!("{PROJECT_STATUS_PREFIX}{status}")
}

/// GSI1 sort key for a Project (recency order).
pub fn project_gsi1_sk(updated_at: DateTime<Utc>) -> String {
    iso_millis(updated_at)
}

/// GSI2 partition key for per-category Project scans.
///
/// Pattern: `PROJECT#CATEGORY#<category>`
pub fn project_gsi2_pk(category: &str) -> String {
    format!("{PROJECT_CATEGORY_PREFIX}{category}")
}

/// GSI2 sort key for a Project (recency order).
pub fn project_gsi2_sk(updated_at: DateTime<Utc>) -> String {
    iso_millis(updated_at)
}

// ============================================================================
// Image keys
// ============================================================================

/// Partition key for an Image, co-locating it with its parent project id.
///
/// Pattern: `PROJECT#<project_id>`
pub fn image_pk(project_id: &str) -> String {
    format!("{PROJECT_PREFIX}{project_id}")
}

/// Sort key for an Image.
///
/// Pattern: `IMAGE#<sort_order:padded>#<image_id>`. An ascending scan of
/// the partition yields display order.
pub fn image_sk(sort_order: u32, image_id: Uuid) -> String {
    format!("{IMAGE_PREFIX}{}#{image_id}", pad_ordinal(sort_order))
}

/// Sort-key prefix for querying all Images of a project.
///
/// Pattern: `IMAGE#`
pub fn image_sk_prefix() -> &'static str {
    IMAGE_PREFIX
}

/// GSI1 partition key for cross-project Image status scans.
///
/// Pattern: `IMAGE#STATUS#<status>`
pub fn image_gsi1_pk(status: PublishStatus) -> String {
    format!("{IMAGE_STATUS_PREFIX}{status}")
}

/// GSI1 sort key for an Image (recency order).
pub fn image_gsi1_sk(updated_at: DateTime<Utc>) -> String {
    iso_millis(updated_at)
}

/// GSI2 partition key for the global featured-image scan.
///
/// Pattern: `IMAGE#FEATURED#<true|false>`
pub fn image_gsi2_pk(is_featured: bool) -> String {
    format!("{IMAGE_FEATURED_PREFIX}{is_featured}")
}

/// GSI2 sort key for an Image (recency order).
pub fn image_gsi2_sk(updated_at: DateTime<Utc>) -> String {
    iso_millis(updated_at)
}

// ============================================================================
// Carousel keys
// ============================================================================

/// Partition key shared by all CarouselItem records.
///
/// Pattern: `CAROUSEL`
pub fn carousel_pk() -> &'static str {
    CAROUSEL_PARTITION
}

/// Sort key for a CarouselItem.
///
/// Pattern: `ITEM#<position:padded>#<item_id>`. An ascending scan of the
/// partition yields display order.
pub fn carousel_sk(position: u32, item_id: Uuid) -> String {
    format!("{ITEM_PREFIX}{}#{item_id}", pad_ordinal(position))
}

/// Sort-key prefix for querying all CarouselItem records.
///
/// Pattern: `ITEM#`
pub fn carousel_sk_prefix() -> &'static str {
    ITEM_PREFIX
}

/// GSI1 partition key for Carousel status scans.
///
/// Pattern: `CAROUSEL#STATUS#<status>`
pub fn carousel_gsi1_pk(status: CarouselStatus) -> String {
    format!("{CAROUSEL_STATUS_PREFIX}{status}")
}

/// GSI1 sort key for a CarouselItem: the zero-padded position, so the
/// active-item scan comes back ordered without a post-fetch sort.
pub fn carousel_gsi1_sk(position: u32) -> String {
    pad_ordinal(position)
}

// ============================================================================
// Sequence keys
// ============================================================================

/// Partition key for sequence records backing the strict-ordering
/// allocators. Lives outside every entity partition, so no entity query can
/// observe it.
pub fn sequence_pk() -> &'static str {
    SEQUENCE_PARTITION
}

/// Sequence name for a project's image sort orders.
///
/// Pattern: `IMAGE#<project_id>`
pub fn image_sequence_name(project_id: &str) -> String {
    format!("{IMAGE_PREFIX}{project_id}")
}

/// Sequence name for carousel positions.
///
/// Pattern: `CAROUSEL`
pub fn carousel_sequence_name() -> &'static str {
    CAROUSEL_PARTITION
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_pad_ordinal() {
        assert_eq!(pad_ordinal(0), "000");
        assert_eq!(pad_ordinal(7), "007");
        assert_eq!(pad_ordinal(42), "042");
        assert_eq!(pad_ordinal(MAX_ORDINAL), "999");
    }

    #[test]
    fn padded_ordinals_sort_numerically() {
        assert!(pad_ordinal(2) < pad_ordinal(10));
        assert!(pad_ordinal(99) < pad_ordinal(100));
    }

    #[test]
    fn test_iso_millis_is_fixed_width() {
        assert_eq!(iso_millis(ts()), "2024-06-15T12:30:45.000Z");
    }

    #[test]
    fn test_project_keys() {
        assert_eq!(project_pk(), "PROJECT");
        assert_eq!(
            project_sk(ts(), "mountain-series"),
            "PROJECT#2024-06-15T12:30:45.000Z#mountain-series"
        );
    }

    #[test]
    fn test_project_index_keys() {
        assert_eq!(
            project_gsi1_pk(PublishStatus::Published),
            "PROJECT#STATUS#published"
        );
        assert_eq!(project_gsi1_sk(ts()), "2024-06-15T12:30:45.000Z");
        assert_eq!(
            project_gsi2_pk("landscape"),
            "PROJECT#CATEGORY#landscape"
        );
    }

    #[test]
    fn test_image_keys() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        assert_eq!(image_pk("mountain-series"), "PROJECT#mountain-series");
        assert_eq!(
            image_sk(3, id),
            "IMAGE#003#550e8400-e29b-41d4-a716-446655440001"
        );
        assert_eq!(image_sk_prefix(), "IMAGE#");
    }

    #[test]
    fn test_image_index_keys() {
        assert_eq!(image_gsi1_pk(PublishStatus::Draft), "IMAGE#STATUS#draft");
        assert_eq!(image_gsi2_pk(true), "IMAGE#FEATURED#true");
        assert_eq!(image_gsi2_pk(false), "IMAGE#FEATURED#false");
    }

    #[test]
    fn test_carousel_keys() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap();
        assert_eq!(carousel_pk(), "CAROUSEL");
        assert_eq!(
            carousel_sk(12, id),
            "ITEM#012#550e8400-e29b-41d4-a716-446655440002"
        );
        assert_eq!(carousel_sk_prefix(), "ITEM#");
    }

    #[test]
    fn test_carousel_index_keys() {
        assert_eq!(
            carousel_gsi1_pk(CarouselStatus::Active),
            "CAROUSEL#STATUS#active"
        );
        assert_eq!(carousel_gsi1_sk(5), "005");
    }

    #[test]
    fn test_sequence_names() {
        assert_eq!(sequence_pk(), "SEQUENCE");
        assert_eq!(
            image_sequence_name("mountain-series"),
            "IMAGE#mountain-series"
        );
        assert_eq!(carousel_sequence_name(), "CAROUSEL");
    }

    #[test]
    fn keys_are_deterministic() {
        assert_eq!(
            project_sk(ts(), "mountain-series"),
            project_sk(ts(), "mountain-series")
        );
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        assert_eq!(image_sk(1, id), image_sk(1, id));
    }
}
