use std::sync::Arc;

use lms_core::model::Document;
use tracing::{debug, warn};

use crate::repository::{SlotStore, StorageError};

/// Slot that holds the whole serialized document.
pub const STORAGE_KEY: &str = "lms_portal_data";

/// Loads and saves the document as one JSON value in one slot.
#[derive(Clone)]
pub struct DocumentStore {
    slots: Arc<dyn SlotStore>,
    key: String,
}

impl DocumentStore {
    #[must_use]
    pub fn new(slots: Arc<dyn SlotStore>) -> Self {
        Self::with_key(slots, STORAGE_KEY)
    }

    #[must_use]
    pub fn with_key(slots: Arc<dyn SlotStore>, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    /// Returns the slot key the document is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored document, falling back to the seed document when the
    /// slot is empty or does not parse.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the slot cannot be read, or
    /// `StorageError::Seed` if the seed document cannot be built.
    pub async fn load(&self) -> Result<Document, StorageError> {
        let Some(raw) = self.slots.read_slot(&self.key).await? else {
            debug!(key = %self.key, "slot empty, using seed document");
            return seed();
        };
        match decode(&raw) {
            Ok(document) => Ok(document),
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored document unreadable, using seed document");
                seed()
            }
        }
    }

    /// Serialize the document and overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails, or
    /// `StorageError::Connection` if the slot cannot be written.
    pub async fn save(&self, document: &Document) -> Result<(), StorageError> {
        let raw = encode(document)?;
        self.slots.write_slot(&self.key, &raw).await?;
        debug!(key = %self.key, bytes = raw.len(), "document saved");
        Ok(())
    }
}

fn seed() -> Result<Document, StorageError> {
    Document::seed().map_err(|e| StorageError::Seed(e.to_string()))
}

/// Encode a document as the JSON stored in the slot.
///
/// # Errors
///
/// Returns `StorageError::Serialization` on encoding failure.
pub fn encode(document: &Document) -> Result<String, StorageError> {
    serde_json::to_string(document).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode the JSON stored in the slot.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the value is not a valid document.
pub fn decode(raw: &str) -> Result<Document, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySlots;
    use lms_core::model::{CourseId, ModuleId, NoteDraft, NoteId};

    fn store() -> (InMemorySlots, DocumentStore) {
        let slots = InMemorySlots::new();
        let store = DocumentStore::new(Arc::new(slots.clone()));
        (slots, store)
    }

    #[tokio::test]
    async fn empty_slot_loads_seed() {
        let (_, store) = store();
        let doc = store.load().await.unwrap();
        assert!(doc.has_user("student"));
        assert_eq!(doc.courses().len(), 1);
        assert!(doc.notes().is_empty());
    }

    #[tokio::test]
    async fn garbage_slot_loads_seed() {
        let (slots, store) = store();
        slots.write_slot(STORAGE_KEY, "{not json").await.unwrap();
        let doc = store.load().await.unwrap();
        assert!(doc.has_user("student"));
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (slots, store) = store();
        let mut doc = store.load().await.unwrap();
        doc.user_mut("student")
            .unwrap()
            .progress_mut()
            .mark_complete(CourseId::new(1), ModuleId::new(1));
        doc.push_note(
            NoteDraft::new("Mathematics 101", "x = 12")
                .validate()
                .unwrap()
                .assign(NoteId::new(1_700_000_000_000), "student"),
        );

        store.save(&doc).await.unwrap();
        assert!(slots.read_slot(STORAGE_KEY).await.unwrap().is_some());

        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded, doc);
    }

    #[tokio::test]
    async fn custom_key_is_isolated() {
        let slots = Arc::new(InMemorySlots::new());
        let a = DocumentStore::with_key(slots.clone(), "a");
        let b = DocumentStore::with_key(slots, "b");
        a.save(&Document::empty()).await.unwrap();
        assert_eq!(a.load().await.unwrap(), Document::empty());
        assert!(b.load().await.unwrap().has_user("student"));
    }
}
