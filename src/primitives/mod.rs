//! Primitives - The drop zone and its props.
//!
//! - [`FileIntakeWidget`] - Drop / picker intake surface mounted on a host
//! - [`IntakeProps`] - Callbacks and flags configuring it
//! - [`IntakeHost`] - What the embedder provides
//!
//! # Lifecycle
//!
//! 1. `mount` attaches the keydown listener (when keyboard is allowed)
//! 2. The host forwards drag, drop, click, and picker events
//! 3. Drop and picker events return a future the host spawns
//! 4. `unmount` (or dropping the widget) detaches and silences callbacks
//!
//! ```ignore
//! let widget = FileIntakeWidget::mount(host, props);
//! spawn_local(widget.picker_change(files));
//! widget.unmount();
//! ```

mod drop_zone;
mod types;

pub use drop_zone::FileIntakeWidget;
pub use types::*;
