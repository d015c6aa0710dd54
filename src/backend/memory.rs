//! In-memory backend - headless host, blob, and reader.
//!
//! Useful for embedding the drop zone where no real surface exists (tests,
//! scripted pipelines, server-side previews). The reader is chunked so it
//! produces progress ticks like a real host, and individual files can be
//! scripted to fail or abort.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::ReadError;
use crate::pipeline::BlobReader;
use crate::primitives::{Cleanup, IntakeHost};
use crate::state::keyboard::{KeyHandler, KeyListeners, KeyboardEvent};
use crate::types::{Blob, ReadMode, ReadPayload};

/// Default chunk size for [`MemoryReader`].
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

// =============================================================================
// MemoryFile
// =============================================================================

/// A file held in memory. Clones share the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFile {
    name: String,
    mime_type: String,
    bytes: Rc<[u8]>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: Rc::from(bytes),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Blob for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

// =============================================================================
// MemoryReader
// =============================================================================

/// Chunked reader over [`MemoryFile`]s.
///
/// Reports progress after every chunk. Files registered with [`fail`] end
/// with that error instead of a payload.
///
/// [`fail`]: MemoryReader::fail
#[derive(Debug)]
pub struct MemoryReader {
    chunk_size: usize,
    faults: RefCell<HashMap<String, ReadError>>,
    log: RefCell<Vec<String>>,
}

impl Default for MemoryReader {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl MemoryReader {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            faults: RefCell::new(HashMap::new()),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Make reads of the file called `name` end with `error`.
    pub fn fail(&self, name: impl Into<String>, error: ReadError) {
        self.faults.borrow_mut().insert(name.into(), error);
    }

    /// Names of files read so far, in read order.
    pub fn read_log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn read_count(&self) -> usize {
        self.log.borrow().len()
    }
}

impl BlobReader<MemoryFile> for MemoryReader {
    fn read<'a>(
        &'a self,
        file: &'a MemoryFile,
        mode: ReadMode,
        on_progress: &'a dyn Fn(u64),
    ) -> LocalBoxFuture<'a, Result<ReadPayload, ReadError>> {
        Box::pin(async move {
            self.log.borrow_mut().push(file.name.clone());

            let fault = self.faults.borrow().get(&file.name).cloned();
            if let Some(fault) = fault {
                return Err(fault);
            }

            let mut buffer = Vec::with_capacity(file.bytes.len());
            for chunk in file.bytes.chunks(self.chunk_size) {
                buffer.extend_from_slice(chunk);
                on_progress(buffer.len() as u64);
            }

            Ok(mode.decode(buffer, &file.mime_type))
        })
    }
}

// =============================================================================
// MemoryHost
// =============================================================================

/// Headless [`IntakeHost`].
///
/// Counts picker opens and routes key presses to whatever the widget
/// attached to the container.
#[derive(Default)]
pub struct MemoryHost {
    reader: MemoryReader,
    keys: KeyListeners,
    picker_opens: Cell<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reader(reader: MemoryReader) -> Self {
        Self {
            reader,
            ..Self::default()
        }
    }

    /// Deliver a keydown to the container. Returns true if consumed.
    pub fn press_key(&self, event: &KeyboardEvent) -> bool {
        self.keys.dispatch(event)
    }

    pub fn keys(&self) -> &KeyListeners {
        &self.keys
    }

    pub fn picker_opens(&self) -> usize {
        self.picker_opens.get()
    }
}

impl IntakeHost for MemoryHost {
    type File = MemoryFile;
    type Reader = MemoryReader;

    fn reader(&self) -> &MemoryReader {
        &self.reader
    }

    fn open_picker(&self) {
        self.picker_opens.set(self.picker_opens.get() + 1);
    }

    fn attach_keydown(&self, handler: KeyHandler) -> Cleanup {
        self.keys.attach(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_reader_reports_each_chunk() {
        let reader = MemoryReader::new(3);
        let file = MemoryFile::new("a.txt", "text/plain", b"abcdefg".to_vec());

        let ticks = RefCell::new(Vec::new());
        let on_progress = |loaded: u64| ticks.borrow_mut().push(loaded);
        let payload = block_on(reader.read(&file, ReadMode::Text, &on_progress));

        assert_eq!(payload, Ok(ReadPayload::Text("abcdefg".to_string())));
        assert_eq!(*ticks.borrow(), vec![3, 6, 7]);
        assert_eq!(reader.read_log(), vec!["a.txt"]);
    }

    #[test]
    fn test_reader_fault() {
        let reader = MemoryReader::default();
        reader.fail("bad.bin", ReadError::Aborted);

        let file = MemoryFile::new("bad.bin", "", vec![1, 2, 3]);
        let result = block_on(reader.read(&file, ReadMode::ArrayBuffer, &|_: u64| {}));
        assert_eq!(result, Err(ReadError::Aborted));
        assert_eq!(reader.read_count(), 1);
    }

    #[test]
    fn test_host_counts_picker_and_routes_keys() {
        let host = MemoryHost::new();
        host.open_picker();
        assert_eq!(host.picker_opens(), 1);

        let cleanup = host.attach_keydown(Box::new(|event: &KeyboardEvent| event.key == "Enter"));
        assert!(host.press_key(&KeyboardEvent::new("Enter")));
        assert!(!host.press_key(&KeyboardEvent::new("a")));

        cleanup();
        assert!(!host.press_key(&KeyboardEvent::new("Enter")));
    }
}
