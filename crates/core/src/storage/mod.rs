mod codec;
mod error;
mod http_mapping;
mod item;
pub mod keys;
mod memory;
mod repository;
mod store;
mod types;

pub use codec::item_identity;
pub use error::{Result, StoreError};
pub use http_mapping::store_error_to_status_code;
pub use item::StoredItem;
pub use memory::MemoryStore;
pub use repository::PortfolioRepository;
pub use store::{ScanOrder, SecondaryIndex, TableStore, WriteOp, MAX_TRANSACT_OPS};
pub use types::ProjectWithImages;
