use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Map};

use precio_store::{Document, DocumentFields, DocumentStore, MemoryStore, StoreError};

use super::*;

fn product_fields(name: &str, price: f64) -> DocumentFields {
    let mut fields = Map::new();
    fields.insert("name".to_string(), json!(name));
    fields.insert("price".to_string(), json!(price));
    fields.insert("store".to_string(), json!("Tienda D"));
    fields.insert("category".to_string(), json!("Lácteos"));
    fields
}

async fn snapshot(store: &MemoryStore) -> Vec<Document> {
    store.list_documents("products").await.unwrap()
}

/// Delegates to a `MemoryStore` but reports the given document as vanished
/// on write, simulating a concurrent deletion between enumeration and update.
struct VanishingDocument {
    inner: MemoryStore,
    vanished_id: String,
}

#[async_trait]
impl DocumentStore for VanishingDocument {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.list_documents(collection).await
    }

    async fn add_document(
        &self,
        collection: &str,
        fields: DocumentFields,
    ) -> Result<String, StoreError> {
        self.inner.add_document(collection, fields).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: DocumentFields,
    ) -> Result<(), StoreError> {
        if id == self.vanished_id {
            return Err(StoreError::NotFound {
                path: format!("{collection}/{id}"),
            });
        }
        self.inner.set_document(collection, id, fields).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete_document(collection, id).await
    }
}

/// Delegates to a `MemoryStore` but fails the n-th write with a server error.
struct FailingWrites {
    inner: MemoryStore,
    fail_on_call: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl DocumentStore for FailingWrites {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.list_documents(collection).await
    }

    async fn add_document(
        &self,
        collection: &str,
        fields: DocumentFields,
    ) -> Result<String, StoreError> {
        self.inner.add_document(collection, fields).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: DocumentFields,
    ) -> Result<(), StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on_call {
            return Err(StoreError::UnexpectedStatus {
                status: 503,
                url: format!("{collection}/{id}"),
            });
        }
        self.inner.set_document(collection, id, fields).await
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete_document(collection, id).await
    }
}

#[tokio::test]
async fn adds_name_lower_where_missing() {
    let store = MemoryStore::new();
    let leche = store.seed_document("products", product_fields("Leche Entera 1L", 900.0));
    let cafe = store.seed_document("products", product_fields("CAFÉ Molido 250g", 650.0));
    let mut already = product_fields("Harina 1kg", 350.0);
    already.insert("name_lower".to_string(), json!("harina 1kg"));
    store.seed_document("products", already);

    let report = run_backfill(&store, "products")
        .await
        .expect("backfill should succeed");

    assert_eq!(
        report,
        BackfillReport {
            scanned: 3,
            updated: 2,
            already_present: 1,
            skipped: 0
        }
    );
    assert_eq!(
        store.document("products", &leche).unwrap()["name_lower"],
        json!("leche entera 1l")
    );
    assert_eq!(
        store.document("products", &cafe).unwrap()["name_lower"],
        json!("café molido 250g")
    );
}

#[tokio::test]
async fn second_run_is_a_noop() {
    let store = MemoryStore::new();
    for name in ["Leche Entera 1L", "Agua Mineral 2L", "Manteca 200g"] {
        store.seed_document("products", product_fields(name, 500.0));
    }

    run_backfill(&store, "products")
        .await
        .expect("first run should succeed");
    let after_first = snapshot(&store).await;

    let report = run_backfill(&store, "products")
        .await
        .expect("second run should succeed");
    let after_second = snapshot(&store).await;

    assert_eq!(report.updated, 0, "no field is recomputed on the second pass");
    assert_eq!(report.already_present, report.scanned);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn preserves_every_other_field() {
    let store = MemoryStore::new();
    let id = store.seed_document("products", product_fields("Pan Lactal 500g", 450.75));
    let before = store.document("products", &id).unwrap();

    run_backfill(&store, "products")
        .await
        .expect("backfill should succeed");

    let after = store.document("products", &id).unwrap();
    for (field, value) in &before {
        assert_eq!(after.get(field), Some(value), "field {field} must be unchanged");
    }
    assert_eq!(after.len(), before.len() + 1, "only name_lower is added");
}

#[tokio::test]
async fn never_overwrites_an_existing_name_lower() {
    let store = MemoryStore::new();
    let mut fields = product_fields("Yogur Natural 500g", 600.0);
    // Deliberately inconsistent value: presence alone must protect it.
    fields.insert("name_lower".to_string(), json!("CUSTOM"));
    let id = store.seed_document("products", fields);

    run_backfill(&store, "products")
        .await
        .expect("backfill should succeed");

    assert_eq!(
        store.document("products", &id).unwrap()["name_lower"],
        json!("CUSTOM")
    );
}

#[tokio::test]
async fn documents_without_a_usable_name_are_skipped() {
    let store = MemoryStore::new();
    let mut nameless = Map::new();
    nameless.insert("price".to_string(), json!(100.0));
    let nameless_id = store.seed_document("products", nameless);

    let mut numeric_name = Map::new();
    numeric_name.insert("name".to_string(), json!(42));
    let numeric_id = store.seed_document("products", numeric_name);

    let ok = store.seed_document("products", product_fields("Esponja de Limpieza", 150.0));

    let report = run_backfill(&store, "products")
        .await
        .expect("anomalies must not abort the run");

    assert_eq!(report.skipped, 2);
    assert_eq!(report.updated, 1);
    assert!(!store
        .document("products", &nameless_id)
        .unwrap()
        .contains_key("name_lower"));
    assert!(!store
        .document("products", &numeric_id)
        .unwrap()
        .contains_key("name_lower"));
    assert!(store
        .document("products", &ok)
        .unwrap()
        .contains_key("name_lower"));
}

#[tokio::test]
async fn vanished_document_is_skipped_not_fatal() {
    let inner = MemoryStore::new();
    let ghost = inner.seed_document("products", product_fields("Pizza Congelada 400g", 950.0));
    let other = inner.seed_document("products", product_fields("Helado de Vainilla 1L", 1100.0));
    let store = VanishingDocument {
        inner,
        vanished_id: ghost,
    };

    let report = run_backfill(&store, "products")
        .await
        .expect("a vanished document must not abort the run");

    assert_eq!(report.skipped, 1);
    assert_eq!(report.updated, 1);
    assert!(store
        .inner
        .document("products", &other)
        .unwrap()
        .contains_key("name_lower"));
}

#[tokio::test]
async fn write_failure_halts_and_keeps_earlier_updates() {
    let inner = MemoryStore::new();
    let first = inner.seed_document("products", product_fields("Arroz Integral 1kg", 800.0));
    let second = inner.seed_document("products", product_fields("Detergente Líquido 1L", 700.0));
    let third = inner.seed_document("products", product_fields("Shampoo 400ml", 850.0));
    let store = FailingWrites {
        inner,
        fail_on_call: 2,
        calls: AtomicUsize::new(0),
    };

    let err = run_backfill(&store, "products")
        .await
        .expect_err("second write fails");
    assert!(err.to_string().contains("1 of 2"), "context records progress: {err:#}");

    let inner = &store.inner;
    assert!(inner.document("products", &first).unwrap().contains_key("name_lower"));
    assert!(!inner.document("products", &second).unwrap().contains_key("name_lower"));
    assert!(
        !inner.document("products", &third).unwrap().contains_key("name_lower"),
        "documents after the failure are left unvisited"
    );
}
