use anyhow::Context;
use rand::Rng;

use precio_core::{generate_products, BASE_TEMPLATES};
use precio_store::DocumentStore;

/// Counts of work performed by a reseed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReseedReport {
    pub deleted: usize,
    pub inserted: usize,
}

/// Replaces the full contents of `collection` with `count` generated records.
///
/// Runs in two strictly ordered phases: every existing document is deleted
/// first, then the generated records are inserted. A failure while deleting
/// leaves the survivors in place and never starts the insertion phase; a
/// failure while inserting keeps the records already written. Prior record
/// identifiers do not survive a reseed.
///
/// When `dry_run` is `true` the store is only read, never written.
///
/// # Errors
///
/// Propagates the first store error, with context recording how far the run
/// got before halting.
pub(crate) async fn run_reseed<S, R>(
    store: &S,
    collection: &str,
    count: usize,
    dry_run: bool,
    rng: &mut R,
) -> anyhow::Result<ReseedReport>
where
    S: DocumentStore + Sync,
    R: Rng + ?Sized,
{
    let existing = store
        .list_documents(collection)
        .await
        .with_context(|| format!("listing existing documents in '{collection}'"))?;

    if dry_run {
        println!(
            "dry-run: would delete {} documents from '{collection}' and insert {count} records cycling {} templates",
            existing.len(),
            BASE_TEMPLATES.len()
        );
        return Ok(ReseedReport::default());
    }

    let mut deleted = 0usize;
    for document in &existing {
        store
            .delete_document(collection, &document.id)
            .await
            .with_context(|| {
                format!(
                    "reseed aborted while clearing '{collection}': {deleted} of {} documents deleted",
                    existing.len()
                )
            })?;
        deleted += 1;
        println!("deleted {}", document.id);
    }
    println!("cleared {deleted} existing documents from '{collection}'");

    let records = generate_products(count, rng);
    let mut inserted = 0usize;
    for record in &records {
        let id = store
            .add_document(collection, record.to_fields())
            .await
            .with_context(|| {
                format!("reseed aborted while inserting: {inserted} of {count} records written")
            })?;
        inserted += 1;
        println!(
            "added {} - {} ({}) [{id}]",
            record.name, record.price, record.store
        );
    }

    println!("reseed complete: deleted {deleted}, inserted {inserted}");
    Ok(ReseedReport { deleted, inserted })
}

#[cfg(test)]
#[path = "reseed_test.rs"]
mod tests;
