//! Batch job handlers for the CLI.
//!
//! Both jobs are written against the `DocumentStore` trait and run strictly
//! sequentially: one store operation at a time, stop at the first unexpected
//! error. Neither job is transactional. A failure mid-run leaves the work
//! done so far in place, which the reseed accepts as a known failure mode and
//! the backfill absorbs by being idempotent.

mod backfill;
mod reseed;

pub(crate) use backfill::run_backfill;
pub(crate) use reseed::run_reseed;
