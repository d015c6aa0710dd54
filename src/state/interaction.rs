//! Interaction Module - Hover / enabled state machine for the drop surface
//!
//! Pure state transitions; no callbacks fire here. The widget asks the state
//! machine what changed and notifies the embedder accordingly.
//!
//! ```text
//!               drag-enter (enabled)
//!   ┌──────┐ ───────────────────────► ┌──────────┐
//!   │ idle │                          │ hovering │
//!   └──────┘ ◄─────────────────────── └──────────┘
//!            drag-leave / drag-exit / drop (enabled)
//! ```
//!
//! While `DISABLED` is set every transition is a no-op.

use tracing::debug;

bitflags::bitflags! {
    /// Interaction state as a bitfield.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InteractionFlags: u8 {
        const NONE = 0;
        /// A drag payload is over the surface.
        const HOVERING = 1 << 0;
        /// Externally disabled; gates all mutation.
        const DISABLED = 1 << 1;
    }
}

/// What a drop gesture should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropDecision {
    /// Widget is disabled; nothing else happens.
    Ignored,
    /// Run the intake pipeline. `was_hovering` says whether a hover-changed
    /// notification is owed.
    Accepted { was_hovering: bool },
}

/// Hover state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    flags: InteractionFlags,
}

impl InteractionState {
    pub fn new(disabled: bool) -> Self {
        let mut flags = InteractionFlags::NONE;
        flags.set(InteractionFlags::DISABLED, disabled);
        Self { flags }
    }

    pub fn flags(&self) -> InteractionFlags {
        self.flags
    }

    pub fn is_hovering(&self) -> bool {
        self.flags.contains(InteractionFlags::HOVERING)
    }

    pub fn is_disabled(&self) -> bool {
        self.flags.contains(InteractionFlags::DISABLED)
    }

    /// Apply the externally supplied enable flag. Hover state is kept.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.flags.set(InteractionFlags::DISABLED, disabled);
    }

    /// Returns true if the surface started hovering.
    pub fn drag_enter(&mut self) -> bool {
        if self.is_disabled() || self.is_hovering() {
            return false;
        }
        self.flags.insert(InteractionFlags::HOVERING);
        debug!("drop surface: hover start");
        true
    }

    /// Drag-leave and drag-exit. Returns true if hovering ended.
    pub fn drag_leave(&mut self) -> bool {
        if self.is_disabled() || !self.is_hovering() {
            return false;
        }
        self.flags.remove(InteractionFlags::HOVERING);
        debug!("drop surface: hover end");
        true
    }

    /// Drop always clears hover when enabled, even if it was already clear.
    pub fn drop(&mut self) -> DropDecision {
        if self.is_disabled() {
            return DropDecision::Ignored;
        }
        let was_hovering = self.is_hovering();
        self.flags.remove(InteractionFlags::HOVERING);
        DropDecision::Accepted { was_hovering }
    }

    /// Whether click / keyboard may open the picker.
    pub fn can_activate(&self) -> bool {
        !self.is_disabled()
    }
}

// =============================================================================
// TESTS
// =============================================================================
