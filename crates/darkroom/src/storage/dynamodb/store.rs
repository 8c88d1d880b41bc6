//! DynamoDB implementation of the table-store seam.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeValue, Delete, Put, ReturnValue, TransactWriteItem, Update,
};
use aws_sdk_dynamodb::Client;

use darkroom_core::storage::{
    item_identity, keys, Result, ScanOrder, SecondaryIndex, StoreError, StoredItem, TableStore,
    WriteOp, MAX_TRANSACT_OPS,
};

use super::convert::{attributes_to_item, item_to_attributes};
use super::error::{
    map_build_error, map_delete_item_error, map_get_item_error, map_put_existing_error,
    map_put_new_error, map_query_error, map_transact_error, map_update_item_error,
};

/// DynamoDB-backed table store.
///
/// All conditional semantics ride on condition expressions, so concurrent
/// writers fail cleanly instead of clobbering each other.
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Translate one write into its transactional form.
    fn transact_item(&self, op: &WriteOp) -> Result<TransactWriteItem> {
        let item = match op {
            WriteOp::PutNew { item } => {
                let put = Put::builder()
                    .table_name(&self.table_name)
                    .set_item(Some(item_to_attributes(item)))
                    .condition_expression("attribute_not_exists(PK)")
                    .build()
                    .map_err(map_build_error)?;
                TransactWriteItem::builder().put(put).build()
            }
            WriteOp::Put { item } => {
                let put = Put::builder()
                    .table_name(&self.table_name)
                    .set_item(Some(item_to_attributes(item)))
                    .build()
                    .map_err(map_build_error)?;
                TransactWriteItem::builder().put(put).build()
            }
            WriteOp::Delete { pk, sk } => {
                let delete = Delete::builder()
                    .table_name(&self.table_name)
                    .key(keys::ATTR_PK, AttributeValue::S(pk.clone()))
                    .key(keys::ATTR_SK, AttributeValue::S(sk.clone()))
                    .build()
                    .map_err(map_build_error)?;
                TransactWriteItem::builder().delete(delete).build()
            }
            WriteOp::DeleteExisting { pk, sk, .. } => {
                let delete = Delete::builder()
                    .table_name(&self.table_name)
                    .key(keys::ATTR_PK, AttributeValue::S(pk.clone()))
                    .key(keys::ATTR_SK, AttributeValue::S(sk.clone()))
                    .condition_expression("attribute_exists(PK)")
                    .build()
                    .map_err(map_build_error)?;
                TransactWriteItem::builder().delete(delete).build()
            }
            WriteOp::Add {
                pk,
                sk,
                attribute,
                delta,
                ..
            } => {
                let update = Update::builder()
                    .table_name(&self.table_name)
                    .key(keys::ATTR_PK, AttributeValue::S(pk.clone()))
                    .key(keys::ATTR_SK, AttributeValue::S(sk.clone()))
                    .update_expression("ADD #attr :delta")
                    .expression_attribute_names("#attr", *attribute)
                    .expression_attribute_values(":delta", AttributeValue::N(delta.to_string()))
                    .condition_expression("attribute_exists(PK)")
                    .build()
                    .map_err(map_build_error)?;
                TransactWriteItem::builder().update(update).build()
            }
        };
        Ok(item)
    }
}

#[async_trait]
impl TableStore for DynamoDbStore {
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<StoredItem>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(keys::ATTR_PK, AttributeValue::S(pk.to_string()))
            .key(keys::ATTR_SK, AttributeValue::S(sk.to_string()))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(attrs) => Ok(Some(attributes_to_item(&attrs)?)),
            None => Ok(None),
        }
    }

    async fn put_new(&self, item: StoredItem) -> Result<()> {
        let (entity_type, id) = item_identity(&item);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(&item)))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| map_put_new_error(e, entity_type, id))?;

        Ok(())
    }

    async fn put_existing(&self, item: StoredItem) -> Result<()> {
        let (entity_type, id) = item_identity(&item);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item_to_attributes(&item)))
            .condition_expression("attribute_exists(PK)")
            .send()
            .await
            .map_err(|e| map_put_existing_error(e, entity_type, id))?;

        Ok(())
    }

    async fn delete_existing(
        &self,
        pk: &str,
        sk: &str,
        entity_type: &'static str,
        id: &str,
    ) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(keys::ATTR_PK, AttributeValue::S(pk.to_string()))
            .key(keys::ATTR_SK, AttributeValue::S(sk.to_string()))
            .condition_expression("attribute_exists(PK)")
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, entity_type, id))?;

        Ok(())
    }

    async fn query(&self, pk: &str, sk_prefix: &str, order: ScanOrder) -> Result<Vec<StoredItem>> {
        let mut request = self
            .client
            .query()
            .table_name(&self.table_name)
            .scan_index_forward(order == ScanOrder::Ascending);

        // An empty string is not a valid expression value; an empty prefix
        // means the whole partition.
        if sk_prefix.is_empty() {
            request = request
                .key_condition_expression("PK = :pk")
                .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()));
        } else {
            request = request
                .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
                .expression_attribute_values(
                    ":sk_prefix",
                    AttributeValue::S(sk_prefix.to_string()),
                );
        }

        let result = request.send().await.map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(attributes_to_item).collect()
    }

    async fn query_index(
        &self,
        index: SecondaryIndex,
        pk: &str,
        order: ScanOrder,
    ) -> Result<Vec<StoredItem>> {
        let key_condition = match index {
            SecondaryIndex::One => "GSI1PK = :pk",
            SecondaryIndex::Two => "GSI2PK = :pk",
        };

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(index.name())
            .key_condition_expression(key_condition)
            .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
            .scan_index_forward(order == ScanOrder::Ascending)
            .send()
            .await
            .map_err(map_query_error)?;

        let items = result.items.unwrap_or_default();
        items.iter().map(attributes_to_item).collect()
    }

    async fn transact(&self, ops: Vec<WriteOp>) -> Result<()> {
        if ops.len() > MAX_TRANSACT_OPS {
            return Err(StoreError::ValidationFailed(format!(
                "transaction of {} operations exceeds the limit of {}",
                ops.len(),
                MAX_TRANSACT_OPS
            )));
        }

        let mut items = Vec::with_capacity(ops.len());
        for op in &ops {
            items.push(self.transact_item(op)?);
        }

        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
            .map_err(|e| map_transact_error(e, &ops))?;

        Ok(())
    }

    async fn add(
        &self,
        pk: &str,
        sk: &str,
        attribute: &str,
        delta: i64,
        entity_type: &'static str,
        id: &str,
    ) -> Result<()> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(keys::ATTR_PK, AttributeValue::S(pk.to_string()))
            .key(keys::ATTR_SK, AttributeValue::S(sk.to_string()))
            .update_expression("ADD #attr :delta")
            .expression_attribute_names("#attr", attribute)
            .expression_attribute_values(":delta", AttributeValue::N(delta.to_string()))
            .condition_expression("attribute_exists(PK)")
            .send()
            .await
            .map_err(|e| map_update_item_error(e, entity_type, id))?;

        Ok(())
    }

    async fn next_in_sequence(&self, name: &str) -> Result<u64> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(
                keys::ATTR_PK,
                AttributeValue::S(keys::sequence_pk().to_string()),
            )
            .key(keys::ATTR_SK, AttributeValue::S(name.to_string()))
            .update_expression("ADD #value :one")
            .expression_attribute_names("#value", "value")
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, "Sequence", name))?;

        result
            .attributes
            .unwrap_or_default()
            .get("value")
            .and_then(|attr| attr.as_n().ok())
            .and_then(|digits| digits.parse::<u64>().ok())
            .ok_or_else(|| StoreError::MalformedRecord(format!("Invalid sequence value for: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn test_store() -> DynamoDbStore {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .build();
        DynamoDbStore::new(Client::from_conf(config), "darkroom-test")
    }

    fn project_item() -> StoredItem {
        let Value::Object(map) = json!({
            "PK": "PROJECTS",
            "SK": "PROJECT#2024-06-15T12:30:45.000Z#mountain-series",
            "entityType": "PROJECT",
            "projectId": "mountain-series",
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn test_create_put_is_conditional() {
        let store = test_store();

        let op = WriteOp::PutNew {
            item: project_item(),
        };
        let item = store.transact_item(&op).unwrap();

        let put = item.put().unwrap();
        assert_eq!(put.table_name(), "darkroom-test");
        assert_eq!(put.condition_expression(), Some("attribute_not_exists(PK)"));
        assert!(put.item().contains_key("projectId"));
    }

    #[test]
    fn test_plain_put_has_no_condition() {
        let store = test_store();

        let op = WriteOp::Put {
            item: project_item(),
        };
        let item = store.transact_item(&op).unwrap();

        assert_eq!(item.put().unwrap().condition_expression(), None);
    }

    #[test]
    fn test_delete_carries_both_keys() {
        let store = test_store();

        let op = WriteOp::Delete {
            pk: "PROJECTS".to_string(),
            sk: "PROJECT#2024-06-15T12:30:45.000Z#mountain-series".to_string(),
        };
        let item = store.transact_item(&op).unwrap();

        let delete = item.delete().unwrap();
        assert_eq!(delete.condition_expression(), None);
        assert_eq!(
            delete.key().get("PK"),
            Some(&AttributeValue::S("PROJECTS".to_string()))
        );
        assert_eq!(
            delete.key().get("SK"),
            Some(&AttributeValue::S(
                "PROJECT#2024-06-15T12:30:45.000Z#mountain-series".to_string()
            ))
        );
    }

    #[test]
    fn test_guarded_delete_requires_existence() {
        let store = test_store();

        let op = WriteOp::DeleteExisting {
            pk: "PROJECTS".to_string(),
            sk: "PROJECT#2024-06-15T12:30:45.000Z#mountain-series".to_string(),
            entity_type: "Project",
            id: "mountain-series".to_string(),
        };
        let item = store.transact_item(&op).unwrap();

        assert_eq!(
            item.delete().unwrap().condition_expression(),
            Some("attribute_exists(PK)")
        );
    }

    #[test]
    fn test_counter_add_becomes_update_expression() {
        let store = test_store();

        let op = WriteOp::Add {
            pk: "PROJECTS".to_string(),
            sk: "PROJECT#2024-06-15T12:30:45.000Z#mountain-series".to_string(),
            attribute: "imageCount",
            delta: -1,
            entity_type: "Project",
            id: "mountain-series".to_string(),
        };
        let item = store.transact_item(&op).unwrap();

        let update = item.update().unwrap();
        assert_eq!(update.update_expression(), "ADD #attr :delta");
        assert_eq!(
            update.expression_attribute_names().unwrap().get("#attr"),
            Some(&"imageCount".to_string())
        );
        assert_eq!(
            update.expression_attribute_values().unwrap().get(":delta"),
            Some(&AttributeValue::N("-1".to_string()))
        );
        assert_eq!(
            update.condition_expression(),
            Some("attribute_exists(PK)")
        );
    }

    #[tokio::test]
    async fn test_oversized_transaction_is_rejected_before_sending() {
        let store = test_store();

        let ops: Vec<WriteOp> = (0..MAX_TRANSACT_OPS + 1)
            .map(|n| WriteOp::Delete {
                pk: "PROJECTS".to_string(),
                sk: format!("PROJECT#2024-06-15T12:30:45.000Z#p{n}"),
            })
            .collect();

        let result = store.transact(ops).await;

        assert!(matches!(result, Err(StoreError::ValidationFailed(_))));
    }
}
