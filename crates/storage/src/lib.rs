#![forbid(unsafe_code)]

pub mod document_store;
pub mod repository;
pub mod sqlite;

pub use document_store::{DocumentStore, STORAGE_KEY};
pub use repository::{InMemorySlots, SlotStore, Storage, StorageError};
