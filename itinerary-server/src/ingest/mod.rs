//! Concurrent loading of feed files into a store.
//!
//! Each source file becomes an [`IngestJob`]; a [`WorkerPool`] runs jobs in
//! parallel and every decoded itinerary goes through the store's single
//! insert path. Failures stay inside the job that hit them.

mod cancel;
mod pool;
mod worker;


pub use cancel::Cancellation;
pub use pool::{PoolError, WorkerPool};
pub use worker::{IngestJob, IngestReport, Outcome, ingest_file, source_files};
