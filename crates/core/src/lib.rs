//! Core library for the darkroom portfolio backend.
//!
//! Pure domain types plus the single-table portfolio store: key scheme,
//! entity codec, the `TableStore` abstraction over the backing table, an
//! in-memory reference backend, and the repository operations built on top.
//! Following the Functional Core pattern, everything here is side-effect
//! free except for calls through [`storage::TableStore`].

pub mod portfolio;
pub mod storage;
