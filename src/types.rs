//! Core types - Blobs, batches, drag payloads, read modes.
//!
//! These are the values that flow through the intake pipeline:
//!
//! ```text
//! DragEvent/DropPayload ─┐
//!                        ├─► Batch<F> ─► Partition<F> ─► ReadOutcome<F>
//! picker file list ──────┘
//! ```
//!
//! `F` is always the host's file handle type. The crate never looks inside it
//! except through the [`Blob`] trait.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::ReadFailure;

// =============================================================================
// Blob
// =============================================================================

/// A host file handle.
///
/// Implemented by whatever the embedding surface hands out for a dropped or
/// picked file (a browser `File`, a path on disk, an in-memory buffer).
pub trait Blob {
    /// File name as reported by the host (may be empty).
    fn name(&self) -> &str;

    /// Size in bytes.
    fn size(&self) -> u64;

    /// MIME type as reported by the host (may be empty).
    fn mime_type(&self) -> &str;
}

impl<T: Blob + ?Sized> Blob for std::rc::Rc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }

    fn mime_type(&self) -> &str {
        (**self).mime_type()
    }
}

// =============================================================================
// Read Mode / Payload
// =============================================================================

/// How the bytes of an accepted file are decoded.
///
/// Chosen once in the props, never inferred per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Raw byte buffer.
    #[default]
    ArrayBuffer,
    /// One `char` per byte (code points 0-255).
    BinaryString,
    /// `data:<mime>;base64,<payload>` URL.
    DataUrl,
    /// UTF-8 text, invalid sequences replaced with U+FFFD.
    Text,
}

impl ReadMode {
    /// Decode a fully loaded file into the payload for this mode.
    ///
    /// Backends call this once the last chunk has arrived.
    pub fn decode(self, bytes: Vec<u8>, mime_type: &str) -> ReadPayload {
        match self {
            ReadMode::ArrayBuffer => ReadPayload::Bytes(bytes),
            ReadMode::BinaryString => {
                ReadPayload::BinaryString(bytes.iter().map(|&b| char::from(b)).collect())
            }
            ReadMode::DataUrl => {
                let mime = if mime_type.is_empty() {
                    "application/octet-stream"
                } else {
                    mime_type
                };
                ReadPayload::DataUrl(format!("data:{};base64,{}", mime, BASE64.encode(&bytes)))
            }
            ReadMode::Text => ReadPayload::Text(match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
            }),
        }
    }
}

/// Decoded contents of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadPayload {
    Bytes(Vec<u8>),
    BinaryString(String),
    DataUrl(String),
    Text(String),
}

impl ReadPayload {
    /// The mode that produced this payload.
    pub fn mode(&self) -> ReadMode {
        match self {
            ReadPayload::Bytes(_) => ReadMode::ArrayBuffer,
            ReadPayload::BinaryString(_) => ReadMode::BinaryString,
            ReadPayload::DataUrl(_) => ReadMode::DataUrl,
            ReadPayload::Text(_) => ReadMode::Text,
        }
    }

    /// Borrow the payload as text, if it is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ReadPayload::Bytes(_) => None,
            ReadPayload::BinaryString(s) | ReadPayload::DataUrl(s) | ReadPayload::Text(s) => {
                Some(s)
            }
        }
    }

    /// Borrow the raw buffer, if this is an `ArrayBuffer` payload.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ReadPayload::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

// =============================================================================
// MIME prefixes
// =============================================================================

/// Top-level media types accepted as `valid_types` shorthands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Application,
    Audio,
    Font,
    Image,
    Model,
    Text,
    Video,
}

impl MediaType {
    pub const ALL: [MediaType; 7] = [
        MediaType::Application,
        MediaType::Audio,
        MediaType::Font,
        MediaType::Image,
        MediaType::Model,
        MediaType::Text,
        MediaType::Video,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Application => "application",
            MediaType::Audio => "audio",
            MediaType::Font => "font",
            MediaType::Image => "image",
            MediaType::Model => "model",
            MediaType::Text => "text",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A MIME-type fragment matched by substring (e.g. `"image/"`, `"pdf"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimePrefix(String);

impl MimePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring match against a reported MIME type.
    pub fn matches(&self, mime_type: &str) -> bool {
        mime_type.contains(self.0.as_str())
    }
}

impl From<&str> for MimePrefix {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MimePrefix {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<MediaType> for MimePrefix {
    fn from(value: MediaType) -> Self {
        Self::new(value.as_str())
    }
}

impl fmt::Display for MimePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Candidates and batches
// =============================================================================

/// A file under consideration, tagged with its position in the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<F> {
    /// Position in the collected batch. Used for error messages.
    pub source_index: usize,
    pub file: F,
}

impl<F: Blob> Candidate<F> {
    pub fn size(&self) -> u64 {
        self.file.size()
    }

    pub fn mime_type(&self) -> &str {
        self.file.mime_type()
    }
}

/// Ordered candidates produced by one drop or one picker selection.
pub type Batch<F> = Vec<Candidate<F>>;

// =============================================================================
// Drag payloads
// =============================================================================

/// Kind of a structured drag item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    String,
}

/// One entry of a structured drag item list.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTransferItem<F> {
    pub kind: ItemKind,
    /// MIME type of the item as announced by the drag source.
    pub mime_type: String,
    /// Resolved file. `None` for string items, or when the host could not
    /// materialize the file.
    pub file: Option<F>,
}

impl<F: Blob> DataTransferItem<F> {
    /// A file-kind item.
    pub fn file(file: F) -> Self {
        Self {
            kind: ItemKind::File,
            mime_type: file.mime_type().to_string(),
            file: Some(file),
        }
    }
}

impl<F> DataTransferItem<F> {
    /// A string-kind item (links, text selections).
    pub fn string(mime_type: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::String,
            mime_type: mime_type.into(),
            file: None,
        }
    }
}

/// Raw shape of what a drop delivered.
///
/// Hosts that expose a structured item list use `Items`; hosts that only
/// expose a plain file list use `Files`.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload<F> {
    Items(Vec<DataTransferItem<F>>),
    Files(Vec<F>),
}

impl<F> Default for DropPayload<F> {
    fn default() -> Self {
        DropPayload::Files(Vec::new())
    }
}

/// A drag gesture event (enter, leave, exit, over, drop).
#[derive(Debug, Clone, PartialEq)]
pub struct DragEvent<F> {
    /// Only populated on drop.
    pub payload: Option<DropPayload<F>>,
    default_prevented: bool,
}

impl<F> DragEvent<F> {
    /// An event without payload (enter/leave/exit/over).
    pub fn new() -> Self {
        Self {
            payload: None,
            default_prevented: false,
        }
    }

    /// A drop event carrying `payload`.
    pub fn with_payload(payload: DropPayload<F>) -> Self {
        Self {
            payload: Some(payload),
            default_prevented: false,
        }
    }

    /// Stop the host from running its default action (navigating to the file).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl<F> Default for DragEvent<F> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Read outcomes
// =============================================================================

/// A successfully read file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile<F> {
    pub source_index: usize,
    pub file: F,
    pub payload: ReadPayload,
}

/// Result of reading one accepted file.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<F> {
    Loaded(LoadedFile<F>),
    Failed(ReadFailure),
}

impl<F> ReadOutcome<F> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ReadOutcome::Loaded(_))
    }
}

/// What the widget is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakeStatus {
    #[default]
    Idle,
    /// Reading file `done + 1` of `total` accepted files.
    Reading { done: usize, total: usize },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_binary_string_maps_bytes_to_chars() {
        let payload = ReadMode::BinaryString.decode(vec![0x41, 0xff, 0x00], "");
        assert_eq!(payload, ReadPayload::BinaryString("A\u{ff}\u{0}".to_string()));
    }

    #[test]
    fn test_decode_data_url() {
        let payload = ReadMode::DataUrl.decode(b"hi".to_vec(), "text/plain");
        assert_eq!(payload.as_str(), Some("data:text/plain;base64,aGk="));

        // Missing MIME falls back to octet-stream
        let payload = ReadMode::DataUrl.decode(Vec::new(), "");
        assert_eq!(payload.as_str(), Some("data:application/octet-stream;base64,"));
    }

    #[test]
    fn test_decode_text_is_lossy() {
        let payload = ReadMode::Text.decode(vec![b'o', b'k', 0xff], "text/plain");
        assert_eq!(payload.as_str(), Some("ok\u{fffd}"));
        assert_eq!(payload.mode(), ReadMode::Text);
    }

    #[test]
    fn test_mime_prefix_substring_match() {
        let image = MimePrefix::from(MediaType::Image);
        assert!(image.matches("image/png"));
        assert!(!image.matches("application/pdf"));

        // Substring, not prefix
        assert!(MimePrefix::from("pdf").matches("application/pdf"));
        assert!(!MimePrefix::from("image/").matches(""));
    }

    #[test]
    fn test_drag_event_prevent_default() {
        let mut event: DragEvent<()> = DragEvent::new();
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
