//! State Module - Interaction state for the drop surface
//!
//! - **Interaction** - Hover / disabled state machine
//! - **Keyboard** - Key events, activation keys, container listener registry

pub mod interaction;
pub mod keyboard;

pub use interaction::*;
pub use keyboard::*;
