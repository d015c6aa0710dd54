//! Intake pipeline.
//!
//! ```text
//! DropPayload / picker list ─► collect ─► validate ─► read (+ progress) ─► callbacks
//! ```

pub mod collect;
pub mod progress;
pub mod read;
pub mod validate;

pub use collect::{collect_drop, collect_picker};
pub use progress::ProgressTracker;
pub use read::{BatchReport, BatchSinks, BlobReader, read_batch};
pub use validate::{Classification, Partition, classify, matching_prefix, partition};
