//! Persistence for daily delta records.
//!
//! This crate provides a trait-based append-only record store with a JSON
//! file implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory_storage;

pub use trait_::{RecordStore, StorageError, Result, SortOrder};
pub use json_storage::JsonStorage;
pub use memory_storage::MemoryStorage;
