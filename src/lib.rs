//! # spark-dropzone
//!
//! Headless drag-and-drop / file-picker intake surface.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! reactive hover, progress, and status state.
//!
//! ## Architecture
//!
//! The widget owns the intake pipeline and the interaction state machine. The
//! embedder owns the surface: it forwards gestures, opens the native picker,
//! and supplies the byte reader through [`IntakeHost`].
//!
//! ```text
//! drag / drop / click / key ─► InteractionState
//!                                  │
//!            drop payload / picker ▼
//!                collect ─► validate ─► read_batch ─► accepted / rejected callbacks
//!                                           │
//!                                           └─► progress (0..=100), on_error
//! ```
//!
//! Reads are sequential and a failed read never stops the batch.
//!
//! ## Modules
//!
//! - [`types`] - Blobs, drop payloads, read modes, MIME prefixes
//! - [`error`] - Read errors and per-file failures
//! - [`state`] - Hover / disabled state machine, keyboard events
//! - [`pipeline`] - Collect, validate, read, progress
//! - [`primitives`] - The [`FileIntakeWidget`] and its props
//! - [`backend`] - In-memory and filesystem hosts

pub mod backend;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{ReadError, ReadFailure};

pub use pipeline::{
    collect_drop, collect_picker, classify, matching_prefix, partition, read_batch,
    BatchReport, BatchSinks, BlobReader, Classification, Partition, ProgressTracker,
};

pub use primitives::{
    AcceptedCallback, Cleanup, Cursor, DragCallback, DropCallback, ErrorCallback,
    FileIntakeWidget, HoverCallback, IntakeHost, IntakeProps, ProgressCallback,
    RejectedCallback, SurfaceAttributes,
};

pub use state::{
    // Interaction
    DropDecision, InteractionFlags, InteractionState,
    // Keyboard
    is_activation_key, KeyHandler, KeyListeners, KeyState, KeyboardEvent,
};

pub use backend::{FsReader, MemoryFile, MemoryHost, MemoryReader, PathFile};
