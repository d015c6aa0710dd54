//! Batch progress accounting.
//!
//! The denominator is the total size of the accepted files, fixed when the
//! batch starts. Rejected files never count.

use tracing::trace;

/// Running byte counter for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    total: u64,
    completed: u64,
    last: f64,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            completed: 0,
            last: 0.0,
        }
    }

    /// Tracker for an iterator of file sizes.
    pub fn for_sizes(sizes: impl IntoIterator<Item = u64>) -> Self {
        Self::new(sizes.into_iter().sum())
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Bytes of files whose read has ended.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Last percentage handed out.
    pub fn last(&self) -> f64 {
        self.last
    }

    /// Mid-read tick for the current file.
    ///
    /// Returns `None` when the tick reaches the end of the file (that value is
    /// reported once by [`finish_file`](Self::finish_file)) or when the batch
    /// is empty.
    pub fn tick(&mut self, loaded: u64, file_size: u64) -> Option<f64> {
        if loaded >= file_size || self.total == 0 {
            return None;
        }
        let percent = self.percent_for(self.completed + loaded);
        trace!(loaded, file_size, percent, "read progress");
        Some(percent)
    }

    /// A file's read ended (loaded, failed, or aborted).
    pub fn finish_file(&mut self, file_size: u64) -> f64 {
        self.completed += file_size;
        if self.total == 0 {
            self.last = 100.0;
            return self.last;
        }
        self.percent_for(self.completed)
    }

    fn percent_for(&mut self, bytes: u64) -> f64 {
        let percent = (bytes as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0);
        self.last = self.last.max(percent);
        self.last
    }
}
