use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("could not build seed document: {0}")]
    Seed(String),
}

/// Key-value slots holding whole serialized values.
///
/// A write replaces the previous value of the slot in full.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read the raw value of a slot, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backend is unavailable.
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot with a new raw value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backend is unavailable.
    async fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Simple in-memory slot store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySlots {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySlots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for InMemorySlots {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Slot backend behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub slots: Arc<dyn SlotStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            slots: Arc::new(InMemorySlots::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_slot_reads_none() {
        let slots = InMemorySlots::new();
        assert!(slots.read_slot("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_overwrites_whole_value() {
        let slots = InMemorySlots::new();
        slots.write_slot("k", "first value").await.unwrap();
        slots.write_slot("k", "2").await.unwrap();
        assert_eq!(slots.read_slot("k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn clones_share_the_same_slots() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.slots.write_slot("k", "v").await.unwrap();
        assert_eq!(other.slots.read_slot("k").await.unwrap().as_deref(), Some("v"));
    }
}
