//! Read pipeline - sequentially materialize accepted files.
//!
//! Files are read one at a time, in batch order. Each read ends (loaded,
//! failed, or aborted) before the next starts, so progress accounting and
//! error indices stay deterministic. A failed read is reported and skipped;
//! the rest of the batch still runs.

use std::cell::RefCell;

use futures::future::LocalBoxFuture;
use tracing::{info, warn};

use super::progress::ProgressTracker;
use crate::error::{ReadError, ReadFailure};
use crate::types::{Batch, Blob, LoadedFile, ReadMode, ReadOutcome, ReadPayload};

// =============================================================================
// Reader primitive
// =============================================================================

/// Host primitive that reads one file.
///
/// `on_progress` receives the number of bytes of *this file* loaded so far
/// and may be called any number of times (including zero) before the future
/// resolves.
pub trait BlobReader<F> {
    fn read<'a>(
        &'a self,
        file: &'a F,
        mode: ReadMode,
        on_progress: &'a dyn Fn(u64),
    ) -> LocalBoxFuture<'a, Result<ReadPayload, ReadError>>;
}

// =============================================================================
// Batch
// =============================================================================

/// Notification sinks for one batch.
pub struct BatchSinks<'a> {
    /// Cumulative percent of the batch, in `[0, 100]`.
    pub on_progress: &'a dyn Fn(f64),
    pub on_error: &'a dyn Fn(&ReadFailure),
    /// `(done, total)` before each file's read starts.
    pub on_file_start: &'a dyn Fn(usize, usize),
}

/// Per-file outcomes of one batch, in batch order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport<F> {
    pub outcomes: Vec<ReadOutcome<F>>,
}

impl<F> BatchReport<F> {
    /// Successful reads, in batch order.
    pub fn into_loaded(self) -> Vec<LoadedFile<F>> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                ReadOutcome::Loaded(loaded) => Some(loaded),
                ReadOutcome::Failed(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReadFailure> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ReadOutcome::Failed(failure) => Some(failure),
            ReadOutcome::Loaded(_) => None,
        })
    }
}

/// Read every accepted candidate in order.
pub async fn read_batch<F, R>(
    reader: &R,
    accepted: Batch<F>,
    mode: ReadMode,
    sinks: BatchSinks<'_>,
) -> BatchReport<F>
where
    F: Blob,
    R: BlobReader<F> + ?Sized,
{
    let file_count = accepted.len();
    let tracker = RefCell::new(ProgressTracker::for_sizes(accepted.iter().map(|c| c.size())));
    info!(
        files = file_count,
        bytes = tracker.borrow().total(),
        ?mode,
        "reading batch"
    );

    let mut outcomes = Vec::with_capacity(file_count);
    for (done, candidate) in accepted.into_iter().enumerate() {
        (sinks.on_file_start)(done, file_count);

        let size = candidate.size();
        let tick = |loaded: u64| {
            let percent = tracker.borrow_mut().tick(loaded, size);
            if let Some(percent) = percent {
                (sinks.on_progress)(percent);
            }
        };

        let result = reader.read(&candidate.file, mode, &tick).await;

        let outcome = match result {
            Ok(payload) => ReadOutcome::Loaded(LoadedFile {
                source_index: candidate.source_index,
                file: candidate.file,
                payload,
            }),
            Err(source) => {
                let failure = ReadFailure::new(candidate.source_index, source);
                warn!(index = failure.index, error = %failure.source, "read failed");
                (sinks.on_error)(&failure);
                ReadOutcome::Failed(failure)
            }
        };

        let percent = tracker.borrow_mut().finish_file(size);
        (sinks.on_progress)(percent);

        outcomes.push(outcome);
    }

    let report = BatchReport { outcomes };
    info!(
        files = file_count,
        failed = report.failures().count(),
        "batch finished"
    );
    report
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryFile, MemoryReader};
    use crate::pipeline::collect::collect_picker;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorded {
        progress: Rc<RefCell<Vec<f64>>>,
        errors: Rc<RefCell<Vec<String>>>,
        starts: Rc<RefCell<Vec<(usize, usize)>>>,
    }

    fn run(reader: &MemoryReader, files: Vec<MemoryFile>, mode: ReadMode) -> (BatchReport<MemoryFile>, Recorded) {
        let rec = Recorded {
            progress: Rc::new(RefCell::new(Vec::new())),
            errors: Rc::new(RefCell::new(Vec::new())),
            starts: Rc::new(RefCell::new(Vec::new())),
        };
        let on_progress = |p: f64| rec.progress.borrow_mut().push(p);
        let on_error = |f: &ReadFailure| rec.errors.borrow_mut().push(f.to_string());
        let on_file_start = |done: usize, total: usize| rec.starts.borrow_mut().push((done, total));

        let report = block_on(read_batch(
            reader,
            collect_picker(files, true),
            mode,
            BatchSinks {
                on_progress: &on_progress,
                on_error: &on_error,
                on_file_start: &on_file_start,
            },
        ));
        (report, rec)
    }

    #[test]
    fn test_progress_reaches_100() {
        let reader = MemoryReader::new(2);
        let files = vec![
            MemoryFile::new("a", "text/plain", b"abcd".to_vec()),
            MemoryFile::new("b", "text/plain", b"efgh".to_vec()),
        ];

        let (report, rec) = run(&reader, files, ReadMode::Text);

        // Chunks of 2: one mid tick per file plus one boundary per file
        assert_eq!(*rec.progress.borrow(), vec![25.0, 50.0, 75.0, 100.0]);
        assert_eq!(*rec.starts.borrow(), vec![(0, 2), (1, 2)]);
        assert!(rec.errors.borrow().is_empty());

        let loaded = report.into_loaded();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].payload, ReadPayload::Text("abcd".to_string()));
        assert_eq!(loaded[1].source_index, 1);
    }

    #[test]
    fn test_failure_is_isolated() {
        let reader = MemoryReader::new(64);
        reader.fail("b", ReadError::Failed("disk on fire".to_string()));
        let files = vec![
            MemoryFile::new("a", "", vec![1; 10]),
            MemoryFile::new("b", "", vec![2; 10]),
            MemoryFile::new("c", "", vec![3; 20]),
        ];

        let (report, rec) = run(&reader, files, ReadMode::ArrayBuffer);

        assert_eq!(reader.read_log(), vec!["a", "b", "c"]);
        assert_eq!(
            *rec.errors.borrow(),
            vec!["Something went wrong while uploading file number 1.".to_string()]
        );

        let failures: Vec<usize> = report.failures().map(|f| f.index).collect();
        assert_eq!(failures, vec![1]);

        let loaded: Vec<usize> = report.into_loaded().iter().map(|l| l.source_index).collect();
        assert_eq!(loaded, vec![0, 2]);

        // Boundaries still advance past the failed file
        assert_eq!(*rec.progress.borrow(), vec![25.0, 50.0, 100.0]);
    }

    #[test]
    fn test_abort_reported_like_failure() {
        let reader = MemoryReader::new(8);
        reader.fail("a", ReadError::Aborted);

        let (report, rec) = run(&reader, vec![MemoryFile::new("a", "", vec![0; 4])], ReadMode::DataUrl);

        assert_eq!(rec.errors.borrow().len(), 1);
        assert!(report.failures().all(|f| f.is_abort()));
        assert!(report.into_loaded().is_empty());
    }

    #[test]
    fn test_empty_batch_reports_nothing() {
        let reader = MemoryReader::new(8);
        let (report, rec) = run(&reader, Vec::new(), ReadMode::Text);

        assert!(report.outcomes.is_empty());
        assert!(rec.progress.borrow().is_empty());
        assert_eq!(reader.read_count(), 0);
    }
}
