//! Primitive types - Props, callbacks, host trait, cleanup.
//!
//! These types define the interface between the drop zone and the embedder.

use std::fmt;
use std::rc::Rc;

use crate::error::ReadFailure;
use crate::pipeline::BlobReader;
use crate::state::keyboard::KeyHandler;
use crate::types::{Blob, DragEvent, LoadedFile, MimePrefix, ReadMode};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by listener registration.
///
/// Call this to detach the listener.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Hover state sink.
pub type HoverCallback = Rc<dyn Fn(bool)>;

/// Drop notification (fires before any file is read).
pub type DropCallback = Rc<dyn Fn()>;

/// Drag enter / leave notification.
pub type DragCallback<F> = Rc<dyn Fn(&DragEvent<F>)>;

/// Batch completion sink for successfully read files, in batch order.
pub type AcceptedCallback<F> = Rc<dyn Fn(Vec<LoadedFile<F>>)>;

/// Batch completion sink for files that failed type validation.
pub type RejectedCallback<F> = Rc<dyn Fn(Vec<F>)>;

/// Per-file read failure sink.
pub type ErrorCallback = Rc<dyn Fn(&ReadFailure)>;

/// Cumulative batch progress sink, in `[0, 100]`.
pub type ProgressCallback = Rc<dyn Fn(f64)>;

// =============================================================================
// Host
// =============================================================================

/// The rendering surface the widget is mounted on.
///
/// Provides the hidden file-picker control, the container's keyboard event
/// source, and the byte-read primitive.
pub trait IntakeHost {
    type File: Blob + Clone + 'static;
    type Reader: BlobReader<Self::File>;

    fn reader(&self) -> &Self::Reader;

    /// Programmatically open the native file picker.
    fn open_picker(&self);

    /// Attach a keydown handler to the container. Returns cleanup function.
    fn attach_keydown(&self, handler: KeyHandler) -> Cleanup;
}

// =============================================================================
// Intake Props
// =============================================================================

/// Properties for the drop zone.
///
/// Required sinks go through [`IntakeProps::new`]; everything else has a
/// documented default and can be set with struct update syntax.
///
/// # Example
///
/// ```ignore
/// use std::rc::Rc;
/// use spark_dropzone::{IntakeProps, MediaType, ReadMode};
///
/// let props = IntakeProps {
///     allow_multiple: false,
///     valid_types: vec![MediaType::Image.into()],
///     on_error: Some(Rc::new(|failure| eprintln!("{failure}"))),
///     ..IntakeProps::new(
///         ReadMode::DataUrl,
///         Rc::new(|hovering| println!("hovering: {hovering}")),
///         Rc::new(|files| println!("{} files", files.len())),
///         Rc::new(|percent| println!("{percent:.0}%")),
///     )
/// };
/// ```
pub struct IntakeProps<F> {
    /// Decoding applied to every accepted file.
    pub read_as: ReadMode,
    pub set_is_hovering: HoverCallback,
    pub handle_accepted_files: AcceptedCallback<F>,
    pub handle_progress: ProgressCallback,

    pub on_drop: Option<DropCallback>,
    pub on_drag_enter: Option<DragCallback<F>>,
    pub on_drag_leave: Option<DragCallback<F>>,
    pub handle_rejected_files: Option<RejectedCallback<F>>,
    pub on_error: Option<ErrorCallback>,

    /// Accept more than one file per gesture. Default: true.
    pub allow_multiple: bool,
    /// Disable every interaction. Default: false.
    pub disable: bool,
    /// Open the picker on Enter / Space. Default: true.
    pub allow_keyboard: bool,
    /// Open the picker on click. Default: true.
    pub allow_click: bool,
    /// MIME fragments a file must contain. Default: empty (accept all).
    pub valid_types: Vec<MimePrefix>,
}

impl<F> IntakeProps<F> {
    pub fn new(
        read_as: ReadMode,
        set_is_hovering: HoverCallback,
        handle_accepted_files: AcceptedCallback<F>,
        handle_progress: ProgressCallback,
    ) -> Self {
        Self {
            read_as,
            set_is_hovering,
            handle_accepted_files,
            handle_progress,
            on_drop: None,
            on_drag_enter: None,
            on_drag_leave: None,
            handle_rejected_files: None,
            on_error: None,
            allow_multiple: true,
            disable: false,
            allow_keyboard: true,
            allow_click: true,
            valid_types: Vec::new(),
        }
    }

    /// Attributes the host should render for these props.
    pub fn surface_attributes(&self) -> SurfaceAttributes {
        SurfaceAttributes {
            tab_index: if self.allow_keyboard && !self.disable { 0 } else { -1 },
            cursor: if self.allow_click && !self.disable {
                Cursor::Pointer
            } else {
                Cursor::Default
            },
            multiple: self.allow_multiple,
            picker_disabled: self.disable,
        }
    }
}

// Manual impl: a derive would require `F: Clone`.
impl<F> Clone for IntakeProps<F> {
    fn clone(&self) -> Self {
        Self {
            read_as: self.read_as,
            set_is_hovering: Rc::clone(&self.set_is_hovering),
            handle_accepted_files: Rc::clone(&self.handle_accepted_files),
            handle_progress: Rc::clone(&self.handle_progress),
            on_drop: self.on_drop.clone(),
            on_drag_enter: self.on_drag_enter.clone(),
            on_drag_leave: self.on_drag_leave.clone(),
            handle_rejected_files: self.handle_rejected_files.clone(),
            on_error: self.on_error.clone(),
            allow_multiple: self.allow_multiple,
            disable: self.disable,
            allow_keyboard: self.allow_keyboard,
            allow_click: self.allow_click,
            valid_types: self.valid_types.clone(),
        }
    }
}

impl<F> fmt::Debug for IntakeProps<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntakeProps")
            .field("read_as", &self.read_as)
            .field("on_drop", &self.on_drop.is_some())
            .field("on_drag_enter", &self.on_drag_enter.is_some())
            .field("on_drag_leave", &self.on_drag_leave.is_some())
            .field("handle_rejected_files", &self.handle_rejected_files.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("allow_multiple", &self.allow_multiple)
            .field("disable", &self.disable)
            .field("allow_keyboard", &self.allow_keyboard)
            .field("allow_click", &self.allow_click)
            .field("valid_types", &self.valid_types)
            .finish()
    }
}

// =============================================================================
// Surface Attributes
// =============================================================================

/// Pointer cursor over the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Render hints for the container and its hidden picker input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceAttributes {
    /// `0` when keyboard-focusable, `-1` otherwise.
    pub tab_index: i32,
    pub cursor: Cursor,
    /// Picker allows selecting several files.
    pub multiple: bool,
    /// Picker input is disabled.
    pub picker_disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> IntakeProps<()> {
        IntakeProps::new(
            ReadMode::Text,
            Rc::new(|_| {}),
            Rc::new(|_| {}),
            Rc::new(|_| {}),
        )
    }

    #[test]
    fn test_defaults() {
        let props = props();
        assert!(props.allow_multiple);
        assert!(!props.disable);
        assert!(props.allow_keyboard);
        assert!(props.allow_click);
        assert!(props.valid_types.is_empty());
        assert!(props.on_drop.is_none());
        assert!(props.handle_rejected_files.is_none());
    }

    #[test]
    fn test_surface_attributes() {
        let attrs = props().surface_attributes();
        assert_eq!(attrs.tab_index, 0);
        assert_eq!(attrs.cursor, Cursor::Pointer);
        assert!(attrs.multiple);
        assert!(!attrs.picker_disabled);

        let attrs = IntakeProps { disable: true, ..props() }.surface_attributes();
        assert_eq!(attrs.tab_index, -1);
        assert_eq!(attrs.cursor, Cursor::Default);
        assert!(attrs.picker_disabled);

        let attrs = IntakeProps {
            allow_keyboard: false,
            allow_click: false,
            allow_multiple: false,
            ..props()
        }
        .surface_attributes();
        assert_eq!(attrs.tab_index, -1);
        assert_eq!(attrs.cursor, Cursor::Default);
        assert!(!attrs.multiple);
    }
}
