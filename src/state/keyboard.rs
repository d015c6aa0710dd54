//! Keyboard Module - Key events and container-scoped listener registry
//!
//! The drop surface opens its file picker on Enter or Space. Hosts deliver
//! key events to whatever handler the widget attached to the container;
//! [`KeyListeners`] is a ready-made registry hosts can use for that.
//!
//! # API
//!
//! - `KeyboardEvent` - Key event delivered by the host
//! - `is_activation_key(event)` - Enter / Space press
//! - `KeyListeners::attach(handler)` - Register a handler, returns cleanup
//! - `KeyListeners::dispatch(event)` - Deliver an event to attached handlers
//!
//! # Example
//!
//! ```ignore
//! use spark_dropzone::state::keyboard::{KeyListeners, KeyboardEvent};
//!
//! let listeners = KeyListeners::new();
//! let cleanup = listeners.attach(|event| {
//!     println!("Key: {}", event.key);
//!     false // Don't consume
//! });
//!
//! listeners.dispatch(&KeyboardEvent::new("Enter"));
//! cleanup();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::primitives::Cleanup;

// =============================================================================
// TYPES
// =============================================================================

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key value (e.g., "a", "Enter", " ")
    pub key: String,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: KeyState::Press,
        }
    }

    /// Same key, different state
    pub fn with_state(mut self, state: KeyState) -> Self {
        self.state = state;
        self
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }
}

/// Enter or Space, on press.
pub fn is_activation_key(event: &KeyboardEvent) -> bool {
    event.is_press() && matches!(event.key.as_str(), "Enter" | " ")
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Box<dyn Fn(&KeyboardEvent) -> bool>;

// =============================================================================
// LISTENER REGISTRY
// =============================================================================

struct Registry {
    handlers: Vec<(usize, Rc<dyn Fn(&KeyboardEvent) -> bool>)>,
    next_id: usize,
}

impl Registry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Keydown listeners scoped to one container.
///
/// Cheap to clone; clones share the same registry. Tracks how many times a
/// handler was attached and detached so hosts can verify listener lifetime.
#[derive(Clone)]
pub struct KeyListeners {
    registry: Rc<RefCell<Registry>>,
    attached: Rc<Cell<usize>>,
    detached: Rc<Cell<usize>>,
}

impl Default for KeyListeners {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyListeners {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                handlers: Vec::new(),
                next_id: 0,
            })),
            attached: Rc::new(Cell::new(0)),
            detached: Rc::new(Cell::new(0)),
        }
    }

    /// Attach a handler. Returns cleanup function that detaches it.
    ///
    /// Calling the cleanup more than once is impossible (`FnOnce`); dropping
    /// it without calling leaves the handler attached.
    pub fn attach<F>(&self, handler: F) -> Cleanup
    where
        F: Fn(&KeyboardEvent) -> bool + 'static,
    {
        let handler: Rc<dyn Fn(&KeyboardEvent) -> bool> = Rc::new(handler);
        let id = {
            let mut reg = self.registry.borrow_mut();
            let id = reg.next_id();
            reg.handlers.push((id, handler));
            id
        };
        self.attached.set(self.attached.get() + 1);

        let registry = Rc::clone(&self.registry);
        let detached = Rc::clone(&self.detached);
        Box::new(move || {
            let mut reg = registry.borrow_mut();
            let before = reg.handlers.len();
            reg.handlers.retain(|(handler_id, _)| *handler_id != id);
            if reg.handlers.len() != before {
                detached.set(detached.get() + 1);
            }
        })
    }

    /// Dispatch an event to all attached handlers, in attach order.
    /// Returns true if any handler consumed the event.
    ///
    /// Handlers are snapshotted first so they may attach or detach listeners
    /// while running.
    pub fn dispatch(&self, event: &KeyboardEvent) -> bool {
        let handlers: Vec<_> = self
            .registry
            .borrow()
            .handlers
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        handlers.iter().any(|handler| handler(event))
    }

    /// Number of currently attached handlers.
    pub fn len(&self) -> usize {
        self.registry.borrow().handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total attach calls so far.
    pub fn attach_count(&self) -> usize {
        self.attached.get()
    }

    /// Total effective detaches so far.
    pub fn detach_count(&self) -> usize {
        self.detached.get()
    }
}

// =============================================================================
// TESTS
// =============================================================================
