//! In-memory [`DocumentStore`] used by job tests.
//!
//! Mirrors the store semantics the jobs rely on: store-assigned identifiers,
//! snapshot enumeration, and a not-found error when writing to a document
//! that has vanished. Iteration order is deterministic so tests are stable.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::{Document, DocumentFields, DocumentStore};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, BTreeMap<String, DocumentFields>>,
    next_id: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Synchronous insert for test setup.
    pub fn seed_document(&self, collection: &str, fields: DocumentFields) -> String {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = format!("doc-{:05}", inner.next_id);
        inner
            .collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), fields);
        id
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<DocumentFields> {
        self.lock()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    pub fn count(&self, collection: &str) -> usize {
        self.lock()
            .collections
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add_document(
        &self,
        collection: &str,
        fields: DocumentFields,
    ) -> Result<String, StoreError> {
        Ok(self.seed_document(collection, fields))
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: DocumentFields,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        match inner
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        {
            Some(existing) => {
                *existing = fields;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                path: format!("{collection}/{id}"),
            }),
        }
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if let Some(docs) = inner.collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
