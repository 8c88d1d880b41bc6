//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! the JSON items the codec produces. These are testable in isolation
//! without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use darkroom_core::storage::{Result, StoreError, StoredItem};

/// Convert a stored item to a DynamoDB attribute map.
pub fn item_to_attributes(item: &StoredItem) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(key, value)| (key.clone(), value_to_attr(value)))
        .collect()
}

/// Convert a DynamoDB attribute map back to a stored item.
pub fn attributes_to_item(attrs: &HashMap<String, AttributeValue>) -> Result<StoredItem> {
    let mut item = StoredItem::new();
    for (key, attr) in attrs {
        item.insert(key.clone(), attr_to_value(key, attr)?);
    }
    Ok(item)
}

fn value_to_attr(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(value_to_attr).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(key, value)| (key.clone(), value_to_attr(value)))
                .collect(),
        ),
    }
}

fn attr_to_value(key: &str, attr: &AttributeValue) -> Result<Value> {
    match attr {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::N(digits) => parse_number(key, digits),
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::L(values) => values
            .iter()
            .map(|value| attr_to_value(key, value))
            .collect::<Result<Vec<Value>>>()
            .map(Value::Array),
        AttributeValue::M(map) => {
            let mut object = Map::new();
            for (inner_key, value) in map {
                object.insert(inner_key.clone(), attr_to_value(inner_key, value)?);
            }
            Ok(Value::Object(object))
        }
        _ => Err(StoreError::MalformedRecord(format!(
            "Unsupported attribute type for field: {key}"
        ))),
    }
}

/// Numeric attributes hold counters, ordinals and the occasional ratio;
/// prefer integer forms so they round-trip exactly.
fn parse_number(key: &str, digits: &str) -> Result<Value> {
    if let Ok(number) = digits.parse::<u64>() {
        return Ok(Value::from(number));
    }
    if let Ok(number) = digits.parse::<i64>() {
        return Ok(Value::from(number));
    }
    digits
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::MalformedRecord(format!("Invalid number {key}: {digits}")))
}
