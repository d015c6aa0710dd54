//! Drop Zone Primitive - File intake surface.
//!
//! Turns a host container into a place files can be dropped on or picked
//! into. Files are validated against `valid_types`, read one at a time, and
//! delivered through the props callbacks.
//!
//! # Features
//!
//! - Hover tracking across drag enter / leave / exit / drop
//! - Click and Enter / Space open the host's file picker
//! - MIME-fragment validation with a separate rejected list
//! - Sequential reads with cumulative batch progress
//! - Isolated failures: one bad file does not stop the batch
//! - Reactive `is_hovering`, `progress`, and `status` signals
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_dropzone::{FileIntakeWidget, IntakeProps, ReadMode};
//!
//! let widget = FileIntakeWidget::mount(host, IntakeProps::new(
//!     ReadMode::ArrayBuffer,
//!     Rc::new(|hovering| set_highlight(hovering)),
//!     Rc::new(|files| store(files)),
//!     Rc::new(|percent| update_bar(percent)),
//! ));
//!
//! // Host wiring
//! on_drop(move |mut event| spawn_local(widget.handle_drop(&mut event)));
//! ```
//!
//! Batch futures hold the widget internals alive; after [`unmount`]
//! (or dropping the widget) they finish silently without firing callbacks.
//!
//! [`unmount`]: FileIntakeWidget::unmount

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};
use spark_signals::{Signal, signal};
use tracing::{debug, info};

use super::types::{Cleanup, IntakeHost, IntakeProps, SurfaceAttributes};
use crate::error::ReadFailure;
use crate::pipeline::{
    BatchSinks, Partition, collect_drop, collect_picker, partition, read_batch,
};
use crate::state::interaction::{DropDecision, InteractionState};
use crate::state::keyboard::{KeyHandler, KeyboardEvent, is_activation_key};
use crate::types::{Batch, DragEvent, IntakeStatus};

// =============================================================================
// Widget internals
// =============================================================================

struct Inner<H: IntakeHost> {
    host: H,
    props: RefCell<IntakeProps<H::File>>,
    state: Cell<InteractionState>,
    mounted: Cell<bool>,
    key_cleanup: RefCell<Option<Cleanup>>,
    hovering: Signal<bool>,
    progress: Signal<f64>,
    status: Signal<IntakeStatus>,
}

impl<H: IntakeHost + 'static> Inner<H> {
    /// Attach or detach the keydown listener to match `allow_keyboard`.
    fn sync_keyboard(self: &Rc<Self>) {
        let wants = self.mounted.get() && self.props.borrow().allow_keyboard;
        let has = self.key_cleanup.borrow().is_some();

        if wants && !has {
            let weak = Rc::downgrade(self);
            let handler: KeyHandler = Box::new(move |event: &KeyboardEvent| {
                weak.upgrade().is_some_and(|inner| inner.key_down(event))
            });
            let cleanup = self.host.attach_keydown(handler);
            *self.key_cleanup.borrow_mut() = Some(cleanup);
            debug!("drop surface: keydown listener attached");
        } else if !wants && has {
            self.detach_keyboard();
        }
    }

    fn detach_keyboard(&self) {
        let cleanup = self.key_cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
            debug!("drop surface: keydown listener detached");
        }
    }

    fn set_hovering(&self, hovering: bool) {
        self.hovering.set(hovering);
        let sink = Rc::clone(&self.props.borrow().set_is_hovering);
        sink(hovering);
    }

    fn open_picker(&self) -> bool {
        if !self.mounted.get() || !self.state.get().can_activate() {
            return false;
        }
        debug!("drop surface: opening file picker");
        self.host.open_picker();
        true
    }

    fn click(&self) -> bool {
        if !self.props.borrow().allow_click {
            return false;
        }
        self.open_picker()
    }

    fn key_down(&self, event: &KeyboardEvent) -> bool {
        if !self.props.borrow().allow_keyboard || !is_activation_key(event) {
            return false;
        }
        self.open_picker()
    }

    /// Validate and read one batch, then deliver results.
    async fn intake(self: Rc<Self>, batch: Batch<H::File>) {
        // Props are snapshotted per batch; later updates apply to the next one
        let props = self.props.borrow().clone();
        let considered = batch.len();
        let Partition { accepted, rejected } = partition(batch, &props.valid_types);
        info!(
            considered,
            accepted = accepted.len(),
            rejected = rejected.len(),
            "drop surface: batch collected"
        );

        if self.mounted.get() {
            self.progress.set(0.0);
        }

        let on_progress = |percent: f64| {
            if self.mounted.get() {
                self.progress.set(percent);
                (props.handle_progress)(percent);
            }
        };
        let on_error = |failure: &ReadFailure| {
            if self.mounted.get() {
                if let Some(on_error) = &props.on_error {
                    on_error(failure);
                }
            }
        };
        let on_file_start = |done: usize, total: usize| {
            if self.mounted.get() {
                self.status.set(IntakeStatus::Reading { done, total });
            }
        };

        let report = read_batch(
            self.host.reader(),
            accepted,
            props.read_as,
            BatchSinks {
                on_progress: &on_progress,
                on_error: &on_error,
                on_file_start: &on_file_start,
            },
        )
        .await;

        if !self.mounted.get() {
            debug!("drop surface: unmounted mid-batch, results dropped");
            return;
        }
        self.status.set(IntakeStatus::Idle);

        (props.handle_accepted_files)(report.into_loaded());
        if let Some(handle_rejected) = &props.handle_rejected_files {
            handle_rejected(rejected.into_iter().map(|candidate| candidate.file).collect());
        }
    }
}

// =============================================================================
// Public widget
// =============================================================================

/// A mounted file intake surface.
///
/// Owns its state for the mounted lifetime. Dropping the widget unmounts it.
pub struct FileIntakeWidget<H: IntakeHost + 'static> {
    inner: Rc<Inner<H>>,
}

impl<H: IntakeHost + 'static> FileIntakeWidget<H> {
    /// Mount on `host`. Attaches the keydown listener when `allow_keyboard`.
    pub fn mount(host: H, props: IntakeProps<H::File>) -> Self {
        let state = InteractionState::new(props.disable);
        let inner = Rc::new(Inner {
            host,
            props: RefCell::new(props),
            state: Cell::new(state),
            mounted: Cell::new(true),
            key_cleanup: RefCell::new(None),
            hovering: signal(false),
            progress: signal(0.0),
            status: signal(IntakeStatus::Idle),
        });
        inner.sync_keyboard();
        debug!("drop surface: mounted");

        Self { inner }
    }

    /// Replace the props. Re-syncs the keyboard listener and disabled flag.
    pub fn update_props(&self, props: IntakeProps<H::File>) {
        let disable = props.disable;
        *self.inner.props.borrow_mut() = props;

        let mut state = self.inner.state.get();
        state.set_disabled(disable);
        self.inner.state.set(state);

        self.inner.sync_keyboard();
    }

    /// Detach listeners and silence all callbacks. Idempotent.
    pub fn unmount(&self) {
        if !self.inner.mounted.replace(false) {
            return;
        }
        self.inner.detach_keyboard();
        debug!("drop surface: unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// Container click. Returns true if the picker was opened.
    pub fn click(&self) -> bool {
        self.inner.click()
    }

    /// Keydown on the container, for hosts that route keys themselves.
    /// Returns true if the picker was opened.
    pub fn key_down(&self, event: &KeyboardEvent) -> bool {
        self.inner.key_down(event)
    }

    pub fn drag_enter(&self, event: &DragEvent<H::File>) {
        if !self.inner.mounted.get() {
            return;
        }
        let mut state = self.inner.state.get();
        if !state.drag_enter() {
            return;
        }
        self.inner.state.set(state);
        self.inner.set_hovering(true);

        let on_drag_enter = self.inner.props.borrow().on_drag_enter.clone();
        if let Some(on_drag_enter) = on_drag_enter {
            on_drag_enter(event);
        }
    }

    pub fn drag_leave(&self, event: &DragEvent<H::File>) {
        if !self.inner.mounted.get() {
            return;
        }
        let mut state = self.inner.state.get();
        if !state.drag_leave() {
            return;
        }
        self.inner.state.set(state);
        self.inner.set_hovering(false);

        let on_drag_leave = self.inner.props.borrow().on_drag_leave.clone();
        if let Some(on_drag_leave) = on_drag_leave {
            on_drag_leave(event);
        }
    }

    /// Same transition as [`drag_leave`](Self::drag_leave).
    pub fn drag_exit(&self, event: &DragEvent<H::File>) {
        self.drag_leave(event);
    }

    /// Keeps the host from navigating to the dragged file.
    pub fn drag_over(&self, event: &mut DragEvent<H::File>) {
        event.prevent_default();
    }

    /// Drop gesture. The returned future runs the intake pipeline and must
    /// be spawned (or awaited) by the host.
    pub fn handle_drop(&self, event: &mut DragEvent<H::File>) -> LocalBoxFuture<'static, ()> {
        event.prevent_default();
        if !self.inner.mounted.get() {
            return future::ready(()).boxed_local();
        }

        let mut state = self.inner.state.get();
        let decision = state.drop();
        self.inner.state.set(state);

        let was_hovering = match decision {
            DropDecision::Ignored => {
                debug!("drop surface: drop ignored while disabled");
                return future::ready(()).boxed_local();
            }
            DropDecision::Accepted { was_hovering } => was_hovering,
        };

        let on_drop = self.inner.props.borrow().on_drop.clone();
        if let Some(on_drop) = on_drop {
            on_drop();
        }
        if was_hovering {
            self.inner.set_hovering(false);
        }

        let allow_multiple = self.inner.props.borrow().allow_multiple;
        let batch = collect_drop(event.payload.take().unwrap_or_default(), allow_multiple);
        Rc::clone(&self.inner).intake(batch).boxed_local()
    }

    /// File-picker selection. Ignored while disabled.
    pub fn picker_change(&self, files: Vec<H::File>) -> LocalBoxFuture<'static, ()> {
        if !self.inner.mounted.get() || self.inner.state.get().is_disabled() {
            return future::ready(()).boxed_local();
        }

        let allow_multiple = self.inner.props.borrow().allow_multiple;
        let batch = collect_picker(files, allow_multiple);
        Rc::clone(&self.inner).intake(batch).boxed_local()
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn is_hovering(&self) -> bool {
        self.inner.state.get().is_hovering()
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.state.get().is_disabled()
    }

    /// Reactive hover state.
    pub fn hovering_signal(&self) -> Signal<bool> {
        self.inner.hovering.clone()
    }

    /// Last reported batch percentage.
    pub fn progress(&self) -> f64 {
        self.inner.progress.get()
    }

    /// Reactive batch percentage.
    pub fn progress_signal(&self) -> Signal<f64> {
        self.inner.progress.clone()
    }

    pub fn status(&self) -> IntakeStatus {
        self.inner.status.get()
    }

    pub fn status_signal(&self) -> Signal<IntakeStatus> {
        self.inner.status.clone()
    }

    pub fn surface_attributes(&self) -> SurfaceAttributes {
        self.inner.props.borrow().surface_attributes()
    }
}

impl<H: IntakeHost + 'static> Drop for FileIntakeWidget<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

// =============================================================================
// TESTS
// =============================================================================
