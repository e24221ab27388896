//! A single file's worth of ingestion.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::feed::ItineraryReader;
use crate::store::ItineraryStore;

use super::cancel::Cancellation;

/// Everything a worker needs to load one source file.
#[derive(Clone)]
pub struct IngestJob {
    pub cancel: Cancellation,
    pub path: PathBuf,
    pub store: Arc<dyn ItineraryStore>,
}

impl IngestJob {
    pub fn new(cancel: Cancellation, path: impl Into<PathBuf>, store: Arc<dyn ItineraryStore>) -> Self {
        Self {
            cancel,
            path: path.into(),
            store,
        }
    }
}

impl fmt::Debug for IngestJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestJob")
            .field("path", &self.path)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Read to the end of the file.
    Completed,
    /// Stopped early because the job was cancelled.
    Cancelled,
    /// Stopped early because the file couldn't be opened or parsed.
    Abandoned { reason: String },
}

/// Summary of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub path: PathBuf,
    /// Itineraries handed to the store and accepted.
    pub added: usize,
    /// Records that failed to decode.
    pub skipped: usize,
    /// Decoded itineraries the store dropped for having no onward flights.
    pub unrouted: usize,
    pub outcome: Outcome,
}

impl IngestReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            added: 0,
            skipped: 0,
            unrouted: 0,
            outcome: Outcome::Completed,
        }
    }
}

/// Load every itinerary in `job.path` into `job.store`.
///
/// Blocking: reads the file synchronously. Errors never escape; they are
/// logged and folded into the report.
pub fn ingest_file(job: &IngestJob) -> IngestReport {
    let mut report = IngestReport::new(&job.path);
    let path = job.path.display();

    let mut reader = match ItineraryReader::open(&job.path) {
        Ok(reader) => reader,
        Err(e) => {
            warn!(%path, error = %e, "Abandoning source file");
            report.outcome = Outcome::Abandoned {
                reason: e.to_string(),
            };
            return report;
        }
    };
    debug!(%path, "Opened source file");

    loop {
        if job.cancel.is_cancelled() {
            info!(%path, added = report.added, "Ingestion cancelled");
            report.outcome = Outcome::Cancelled;
            return report;
        }

        let Some(item) = reader.next() else {
            break;
        };

        match item {
            Ok(itinerary) => match job.store.insert(itinerary) {
                Some(_) => report.added += 1,
                None => report.unrouted += 1,
            },
            Err(e) if e.is_recoverable() => {
                debug!(%path, error = %e, "Skipping record");
                report.skipped += 1;
            }
            Err(e) => {
                warn!(%path, error = %e, added = report.added, "Abandoning source file");
                report.outcome = Outcome::Abandoned {
                    reason: e.to_string(),
                };
                return report;
            }
        }
    }

    info!(
        %path,
        added = report.added,
        skipped = report.skipped,
        unrouted = report.unrouted,
        "Added itineraries"
    );
    report
}

/// Regular files directly inside `dir`, sorted by name.
pub fn source_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
