use std::sync::Arc;

use lms_core::model::Document;
use storage::repository::{InMemorySlots, StorageError};
use storage::DocumentStore;
use tracing::error;

/// The in-memory document plus the store it is saved to.
///
/// All writes go through [`Workspace::commit`], so the document held here is
/// always the last one that was saved successfully.
pub struct Workspace {
    document: Document,
    store: DocumentStore,
}

impl Workspace {
    /// Load the document from the store (or the seed document).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    pub async fn open(store: DocumentStore) -> Result<Self, StorageError> {
        let document = store.load().await?;
        Ok(Self { document, store })
    }

    /// Workspace over fresh in-memory slots, seeded on first load.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Seed` if the seed document cannot be built.
    pub async fn in_memory() -> Result<Self, StorageError> {
        Self::open(DocumentStore::new(Arc::new(InMemorySlots::new()))).await
    }

    /// Returns the last successfully saved document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Apply `change` to a staged copy of the document, save the copy, and
    /// only then make it current.
    ///
    /// If `change` fails nothing is saved. If the save fails the staged copy
    /// is discarded and the storage error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error from `change`, or the save failure converted into `E`.
    pub async fn commit<T, E, F>(&mut self, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StorageError>,
    {
        let mut staged = self.document.clone();
        let value = change(&mut staged)?;
        if let Err(err) = self.store.save(&staged).await {
            error!(key = self.store.key(), error = %err, "save failed, change discarded");
            return Err(err.into());
        }
        self.document = staged;
        Ok(value)
    }
}
