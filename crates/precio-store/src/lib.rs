//! Document-store access for the precio catalog tools.
//!
//! The maintenance jobs are written against the [`DocumentStore`] trait so
//! the store client is an injected collaborator rather than a global:
//! production runs use [`FirestoreClient`] (Firestore v1 REST API), tests use
//! [`MemoryStore`]. Documents are flat maps of field name to JSON scalar;
//! the store enforces no schema beyond that.

pub mod error;
pub mod firestore;
pub mod memory;
mod retry;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use error::StoreError;
pub use firestore::FirestoreClient;
pub use memory::MemoryStore;

/// Flat field map of a persisted document. Values are JSON scalars only;
/// nested arrays/objects are rejected at the client boundary.
pub type DocumentFields = Map<String, Value>;

/// A document as returned by enumeration: the store-assigned identifier plus
/// its field map. Identifiers are opaque and stable across updates, but a
/// destructive reseed produces entirely new ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: DocumentFields,
}

/// Minimal client surface the batch jobs need from the document database.
///
/// All operations are blocking I/O from the job's point of view: the jobs
/// await each call in program order and never overlap operations on the same
/// collection.
#[async_trait]
pub trait DocumentStore {
    /// Returns a finite snapshot of every document in `collection`.
    /// Rerunning the enumeration starts over from the live state.
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Creates a document with a store-assigned identifier and returns it.
    async fn add_document(
        &self,
        collection: &str,
        fields: DocumentFields,
    ) -> Result<String, StoreError>;

    /// Writes the full field map of an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document no longer exists,
    /// e.g. it was deleted by another actor between enumeration and this
    /// write. Callers decide whether that is fatal.
    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: DocumentFields,
    ) -> Result<(), StoreError>;

    /// Deletes a document. Deleting an already-absent document succeeds.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}
