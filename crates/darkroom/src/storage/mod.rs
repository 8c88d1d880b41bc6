//! Storage backend implementations.
//!
//! The in-memory backend ships with `darkroom_core`; this module holds the
//! DynamoDB implementation of the `TableStore` trait, selected at compile
//! time via the `dynamodb` feature flag.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): in-memory storage from `darkroom_core`
//! - `dynamodb`: AWS DynamoDB storage backend using `aws-sdk-dynamodb`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
