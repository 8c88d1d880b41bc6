//! DynamoDB storage backend implementation.
//!
//! This module implements the `TableStore` trait from
//! `darkroom_core::storage` using `aws-sdk-dynamodb`: one table addressed
//! by PK/SK with two overloaded secondary indexes, conditional writes, and
//! `TransactWriteItems` for the multi-item operations.

mod convert;
mod error;
mod store;

pub use store::DynamoDbStore;
