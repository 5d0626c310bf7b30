use anyhow::Context;
use serde_json::Value;

use precio_core::{lowercase_name, product};
use precio_store::{DocumentStore, StoreError};

/// Counts of work performed by a backfill run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BackfillReport {
    pub scanned: usize,
    pub updated: usize,
    /// Documents that already carried `name_lower` and were left untouched.
    pub already_present: usize,
    /// Documents skipped with a warning: unusable `name` field, or deleted
    /// by another actor between enumeration and the write.
    pub skipped: usize,
}

/// Adds `name_lower` to every document in `collection` that lacks it.
///
/// The pass is idempotent: documents are skipped on field *presence*, never
/// on value comparison, so an existing `name_lower` is never recomputed or
/// overwritten and a second run performs no writes. All other fields are
/// carried through each update unchanged.
///
/// Anomalies do not halt the run: a document without a usable `name`, or
/// one deleted concurrently, is logged and skipped so a rerun can pick up
/// whatever remains. Any other write failure stops the scan; documents
/// updated earlier keep their update.
///
/// # Errors
///
/// Propagates the first unexpected store error, with context recording how
/// many updates landed before halting.
pub(crate) async fn run_backfill<S>(store: &S, collection: &str) -> anyhow::Result<BackfillReport>
where
    S: DocumentStore + Sync,
{
    let documents = store
        .list_documents(collection)
        .await
        .with_context(|| format!("listing documents in '{collection}'"))?;

    let mut report = BackfillReport::default();
    for document in documents {
        report.scanned += 1;

        if document.fields.contains_key(product::FIELD_NAME_LOWER) {
            report.already_present += 1;
            continue;
        }

        let Some(name) = document
            .fields
            .get(product::FIELD_NAME)
            .and_then(Value::as_str)
        else {
            tracing::warn!(id = %document.id, "skipping document without a usable name field");
            report.skipped += 1;
            continue;
        };

        let lower = lowercase_name(name);
        let mut fields = document.fields.clone();
        fields.insert(
            product::FIELD_NAME_LOWER.to_string(),
            Value::String(lower.clone()),
        );

        match store.set_document(collection, &document.id, fields).await {
            Ok(()) => {
                report.updated += 1;
                println!("updated {} name_lower={lower}", document.id);
            }
            Err(StoreError::NotFound { .. }) => {
                tracing::warn!(id = %document.id, "document vanished during backfill; skipping");
                report.skipped += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "backfill aborted on '{}': {} of {} documents updated",
                        document.id, report.updated, report.scanned
                    )
                });
            }
        }
    }

    println!(
        "backfill complete: scanned {}, updated {}, already present {}, skipped {}",
        report.scanned, report.updated, report.already_present, report.skipped
    );
    Ok(report)
}

#[cfg(test)]
#[path = "backfill_test.rs"]
mod tests;
