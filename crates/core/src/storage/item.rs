//! The generic stored-item shape and typed attribute accessors.
//!
//! Every backend stores the same representation: a string-keyed map of JSON
//! scalars and collections, including the key attributes from the key
//! scheme. The DynamoDB backend converts this to and from `AttributeValue`
//! maps at its edge; the in-memory backend stores it directly.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::StoreError;

/// One stored item: attribute name to JSON value, key attributes included.
pub type StoredItem = Map<String, Value>;

/// Get a required string attribute.
pub fn get_string(item: &StoredItem, key: &str) -> Result<String, StoreError> {
    item.get(key)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::MalformedRecord(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute.
pub fn get_optional_string(item: &StoredItem, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(|s| s.to_string())
}

/// Get a required UUID attribute.
pub fn get_uuid(item: &StoredItem, key: &str) -> Result<Uuid, StoreError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| StoreError::MalformedRecord(format!("Invalid UUID {}: {}", key, e)))
}

/// Get a required datetime attribute (RFC 3339 format).
pub fn get_datetime(item: &StoredItem, key: &str) -> Result<DateTime<Utc>, StoreError> {
    let s = get_string(item, key)?;
    parse_datetime(&s, key)
}

/// Get an optional datetime attribute. Absent is `None`; present but
/// unparsable is an error.
pub fn get_optional_datetime(
    item: &StoredItem,
    key: &str,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    match get_optional_string(item, key) {
        Some(s) => parse_datetime(&s, key).map(Some),
        None => Ok(None),
    }
}

fn parse_datetime(s: &str, key: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::MalformedRecord(format!("Invalid datetime {}: {}", key, e)))
}

/// Get a required unsigned integer attribute.
pub fn get_u32(item: &StoredItem, key: &str) -> Result<u32, StoreError> {
    item.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| StoreError::MalformedRecord(format!("Missing or invalid field: {}", key)))
}

/// Get an unsigned integer attribute, falling back to a default when the
/// attribute is absent (the schema has evolved additively).
pub fn get_u32_or(item: &StoredItem, key: &str, default: u32) -> u32 {
    item.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}

/// Get a wide unsigned integer attribute with a default.
pub fn get_u64_or(item: &StoredItem, key: &str, default: u64) -> u64 {
    item.get(key).and_then(Value::as_u64).unwrap_or(default)
}

/// Get a boolean attribute with a default.
pub fn get_bool_or(item: &StoredItem, key: &str, default: bool) -> bool {
    item.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Get an optional float attribute.
pub fn get_optional_f64(item: &StoredItem, key: &str) -> Option<f64> {
    item.get(key).and_then(Value::as_f64)
}

/// Get a list-of-strings attribute, empty when absent.
pub fn get_string_list(item: &StoredItem, key: &str) -> Vec<String> {
    item.get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Get an opaque object attribute, empty when absent.
pub fn get_object(item: &StoredItem, key: &str) -> Map<String, Value> {
    item.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> StoredItem {
        let mut item = StoredItem::new();
        item.insert("title".to_string(), json!("Dunes"));
        item.insert("viewCount".to_string(), json!(7));
        item.insert("isVisible".to_string(), json!(false));
        item.insert("tags".to_string(), json!(["sand", "dawn"]));
        item
    }

    #[test]
    fn test_get_string_missing_field() {
        let item = sample_item();
        assert_eq!(
            get_string(&item, "missing"),
            Err(StoreError::MalformedRecord(
                "Missing or invalid field: missing".to_string()
            ))
        );
        assert_eq!(get_string(&item, "title").unwrap(), "Dunes");
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let item = sample_item();
        assert!(get_string(&item, "viewCount").is_err());
        assert!(get_u32(&item, "title").is_err());
    }

    #[test]
    fn test_defaults_for_absent_attributes() {
        let item = sample_item();
        assert_eq!(get_u32_or(&item, "viewCount", 0), 7);
        assert_eq!(get_u32_or(&item, "clickCount", 0), 0);
        assert!(get_bool_or(&item, "isFeatured", true));
        assert!(!get_bool_or(&item, "isVisible", true));
        assert!(get_string_list(&item, "colorPalette").is_empty());
        assert_eq!(get_string_list(&item, "tags"), vec!["sand", "dawn"]);
    }

    #[test]
    fn test_optional_datetime() {
        let mut item = sample_item();
        assert_eq!(get_optional_datetime(&item, "publishedAt"), Ok(None));

        item.insert("publishedAt".to_string(), json!("2024-06-15T12:00:00.000Z"));
        assert!(get_optional_datetime(&item, "publishedAt")
            .unwrap()
            .is_some());

        item.insert("publishedAt".to_string(), json!("yesterday"));
        assert!(get_optional_datetime(&item, "publishedAt").is_err());
    }
}
