//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `darkroom_core::storage`.
//! Conditional-check failures carry an identity so callers see which
//! record was missing or already present; everything operational maps
//! to `Unavailable`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;

use darkroom_core::storage::{item_identity, StoreError, WriteOp};

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            StoreError::Unavailable("Table not found".to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Unavailable("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            StoreError::Unavailable("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unavailable(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            StoreError::Unavailable("Table not found".to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::Unavailable("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::Unavailable("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unavailable(format!("Query failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error for a create to StoreError.
///
/// The conditional check guards `attribute_not_exists`, so a failure means
/// the record is already there.
pub fn map_put_new_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> StoreError {
    let id_str = id.into();
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::AlreadyExists {
            entity_type,
            id: id_str,
        },
        err => put_item_failure(err),
    }
}

/// Map a PutItem SDK error for a replace to StoreError.
///
/// The conditional check guards `attribute_exists`, so a failure means the
/// record is gone.
pub fn map_put_existing_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> StoreError {
    let id_str = id.into();
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => StoreError::NotFound {
            entity_type,
            id: id_str,
        },
        err => put_item_failure(err),
    }
}

fn put_item_failure(err: PutItemError) -> StoreError {
    match err {
        PutItemError::ResourceNotFoundException(_) => {
            StoreError::Unavailable("Table not found".to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Unavailable("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::Unavailable("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Unavailable("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => {
            StoreError::Unavailable("Transaction conflict, please retry".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unavailable(format!("PutItem failed: {:?}", err)),
    }
}

/// Map an UpdateItem SDK error to StoreError.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> StoreError {
    let id_str = id.into();
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => StoreError::NotFound {
            entity_type,
            id: id_str,
        },
        UpdateItemError::ResourceNotFoundException(_) => {
            StoreError::Unavailable("Table not found".to_string())
        }
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Unavailable("Throughput exceeded, please retry".to_string())
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            StoreError::Unavailable("Request limit exceeded, please retry".to_string())
        }
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Unavailable("Item collection size limit exceeded".to_string())
        }
        UpdateItemError::TransactionConflictException(_) => {
            StoreError::Unavailable("Transaction conflict, please retry".to_string())
        }
        UpdateItemError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unavailable(format!("UpdateItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> StoreError {
    let id_str = id.into();
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => StoreError::NotFound {
            entity_type,
            id: id_str,
        },
        DeleteItemError::ResourceNotFoundException(_) => {
            StoreError::Unavailable("Table not found".to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Unavailable("Throughput exceeded, please retry".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            StoreError::Unavailable("Request limit exceeded, please retry".to_string())
        }
        DeleteItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Unavailable("Item collection size limit exceeded".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => {
            StoreError::Unavailable("Transaction conflict, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unavailable(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a TransactWriteItems SDK error to StoreError.
///
/// Cancellation reasons line up with the submitted operations, so a failed
/// condition resolves to the identity carried by the operation at that
/// position.
pub fn map_transact_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<TransactWriteItemsError, R>,
    ops: &[WriteOp],
) -> StoreError {
    match err.into_service_error() {
        TransactWriteItemsError::TransactionCanceledException(canceled) => {
            for (index, reason) in canceled.cancellation_reasons().iter().enumerate() {
                if reason.code() == Some("ConditionalCheckFailed") {
                    return condition_failure(ops.get(index));
                }
            }
            StoreError::Unavailable(format!("Transaction canceled: {:?}", canceled))
        }
        TransactWriteItemsError::TransactionInProgressException(_) => {
            StoreError::Unavailable("Transaction already in progress, please retry".to_string())
        }
        TransactWriteItemsError::IdempotentParameterMismatchException(_) => {
            StoreError::Unavailable("Idempotent parameter mismatch".to_string())
        }
        TransactWriteItemsError::ProvisionedThroughputExceededException(_) => {
            StoreError::Unavailable("Throughput exceeded, please retry".to_string())
        }
        TransactWriteItemsError::RequestLimitExceeded(_) => {
            StoreError::Unavailable("Request limit exceeded, please retry".to_string())
        }
        TransactWriteItemsError::ResourceNotFoundException(_) => {
            StoreError::Unavailable("Table not found".to_string())
        }
        TransactWriteItemsError::InternalServerError(_) => {
            StoreError::Unavailable("DynamoDB internal server error".to_string())
        }
        err => StoreError::Unavailable(format!("TransactWriteItems failed: {:?}", err)),
    }
}

/// Map a builder error for a transaction operation to StoreError.
pub fn map_build_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::ValidationFailed(format!("Invalid transaction operation: {err}"))
}

/// Resolve the failed condition to the identity its operation carries.
fn condition_failure(op: Option<&WriteOp>) -> StoreError {
    match op {
        Some(WriteOp::PutNew { item }) => {
            let (entity_type, id) = item_identity(item);
            StoreError::AlreadyExists { entity_type, id }
        }
        Some(WriteOp::DeleteExisting {
            entity_type, id, ..
        }) => StoreError::NotFound {
            entity_type,
            id: id.clone(),
        },
        Some(WriteOp::Add {
            entity_type, id, ..
        }) => StoreError::NotFound {
            entity_type,
            id: id.clone(),
        },
        _ => StoreError::Unavailable("Transaction condition failed".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    use darkroom_core::storage::StoredItem;

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
    fn test_failed_create_condition_is_already_exists() {
        let op = WriteOp::PutNew {
            item: project_item(),
        };

        let err = condition_failure(Some(&op));

        assert_eq!(
            err,
            StoreError::AlreadyExists {
                entity_type: "Project",
                id: "mountain-series".to_string()
            }
        );
    }

    #[test]
    fn test_failed_delete_condition_is_not_found() {
        let op = WriteOp::DeleteExisting {
            pk: "PROJECTS".to_string(),
            sk: "PROJECT#2024-06-15T12:30:45.000Z#mountain-series".to_string(),
            entity_type: "Project",
            id: "mountain-series".to_string(),
        };

        let err = condition_failure(Some(&op));

        assert_eq!(
            err,
            StoreError::NotFound {
                entity_type: "Project",
                id: "mountain-series".to_string()
            }
        );
    }

    #[test]
    fn test_failed_add_condition_is_not_found() {
        let op = WriteOp::Add {
            pk: "PROJECTS".to_string(),
            sk: "PROJECT#2024-06-15T12:30:45.000Z#mountain-series".to_string(),
            attribute: "imageCount",
            delta: 1,
            entity_type: "Project",
            id: "mountain-series".to_string(),
        };

        let err = condition_failure(Some(&op));

        assert_eq!(
            err,
            StoreError::NotFound {
                entity_type: "Project",
                id: "mountain-series".to_string()
            }
        );
    }

    #[test]
    fn test_unconditional_op_falls_back_to_unavailable() {
        let op = WriteOp::Delete {
            pk: "PROJECTS".to_string(),
            sk: "PROJECT#2024-06-15T12:30:45.000Z#mountain-series".to_string(),
        };

        assert!(matches!(
            condition_failure(Some(&op)),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(condition_failure(None), StoreError::Unavailable(_)));
    }
}
