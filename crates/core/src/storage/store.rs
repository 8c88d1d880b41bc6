//! The backing-store seam.
//!
//! [`TableStore`] is the narrow interface every backend implements: key-pair
//! gets, conditional puts and deletes, prefix and index queries, atomic
//! multi-item transactions, and native counter adds. The repository builds
//! every portfolio operation on top of it, so its semantics are identical
//! against the in-memory store and against DynamoDB.

use async_trait::async_trait;

use super::error::Result;
use super::item::StoredItem;

/// Upper bound on the number of operations one atomic transaction may carry,
/// matching the transactional write limit of the backing store.
pub const MAX_TRANSACT_OPS: usize = 25;

/// Scan direction over a sort-key range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    Ascending,
    Descending,
}

/// The two overloaded secondary indexes of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryIndex {
    One,
    Two,
}

impl SecondaryIndex {
    /// Physical index name in the backing table.
    pub fn name(self) -> &'static str {
        match self {
            SecondaryIndex::One => "GSI1",
            SecondaryIndex::Two => "GSI2",
        }
    }
}

/// One write inside an atomic transaction.
///
/// Conditional variants carry the identity used in the error when their
/// condition fails, so a failed transaction surfaces which record was
/// missing or already present.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Put that must create. Fails the transaction with `AlreadyExists`
    /// when the key pair is taken; identity comes from the item itself.
    PutNew { item: StoredItem },
    /// Unconditional put.
    Put { item: StoredItem },
    /// Unconditional delete.
    Delete { pk: String, sk: String },
    /// Delete that must find its target. Fails the transaction with
    /// `NotFound` when the key pair is absent.
    DeleteExisting {
        pk: String,
        sk: String,
        entity_type: &'static str,
        id: String,
    },
    /// Atomic numeric add on an attribute of an existing item.
    Add {
        pk: String,
        sk: String,
        attribute: &'static str,
        delta: i64,
        entity_type: &'static str,
        id: String,
    },
}

/// A single-table store addressed by partition and sort key.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Gets the item stored under a key pair.
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<StoredItem>>;

    /// Puts an item that must not exist yet. Returns `AlreadyExists` when
    /// the key pair is taken.
    async fn put_new(&self, item: StoredItem) -> Result<()>;

    /// Replaces an item that must already exist. Returns `NotFound` when
    /// the key pair is absent.
    async fn put_existing(&self, item: StoredItem) -> Result<()>;

    /// Deletes an item that must exist. Returns `NotFound` for the given
    /// identity when the key pair is absent.
    async fn delete_existing(
        &self,
        pk: &str,
        sk: &str,
        entity_type: &'static str,
        id: &str,
    ) -> Result<()>;

    /// Queries a partition for items whose sort key starts with a prefix,
    /// in sort-key order.
    async fn query(&self, pk: &str, sk_prefix: &str, order: ScanOrder) -> Result<Vec<StoredItem>>;

    /// Queries a secondary-index partition, in index sort-key order.
    async fn query_index(
        &self,
        index: SecondaryIndex,
        pk: &str,
        order: ScanOrder,
    ) -> Result<Vec<StoredItem>>;

    /// Applies up to [`MAX_TRANSACT_OPS`] writes atomically. Either every
    /// operation takes effect or none does.
    async fn transact(&self, ops: Vec<WriteOp>) -> Result<()>;

    /// Atomically adds to a numeric attribute of an existing item. Returns
    /// `NotFound` for the given identity when the key pair is absent.
    async fn add(
        &self,
        pk: &str,
        sk: &str,
        attribute: &str,
        delta: i64,
        entity_type: &'static str,
        id: &str,
    ) -> Result<()>;

    /// Increments a named sequence and returns the new value. The first
    /// call for a name creates the sequence record and returns 1.
    async fn next_in_sequence(&self, name: &str) -> Result<u64>;
}
