//! In-memory document store.
//!
//! Holds the documents uploaded in the current session, in upload order.
//! The store is the only owner of documents; everything else reads them
//! through a borrowed slice.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::Document;

/// Minimum number of documents an analysis needs
pub const MIN_DOCUMENTS_FOR_ANALYSIS: usize = 2;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document id already present: {0}")]
    DuplicateId(Uuid),
}

/// Ordered, append/remove-only collection of documents
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document. Names may repeat; ids may not.
    pub fn add(&mut self, document: Document) -> Result<(), StoreError> {
        if self.contains(document.id) {
            return Err(StoreError::DuplicateId(document.id));
        }
        self.documents.push(document);
        Ok(())
    }

    /// Remove the document with this id, returning it if it was present
    pub fn remove(&mut self, id: Uuid) -> Option<Document> {
        let idx = self.documents.iter().position(|d| d.id == id)?;
        Some(self.documents.remove(idx))
    }

    /// Drop every document
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.documents.iter().any(|d| d.id == id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document names in store order
    pub fn names(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.name.clone()).collect()
    }

    /// Whether enough documents are present to analyze
    pub fn can_analyze(&self) -> bool {
        self.len() >= MIN_DOCUMENTS_FOR_ANALYSIS
    }
}
