//! Filesystem backend - files dropped as paths.
//!
//! Native shells (desktop webviews, winit windows) report drops as paths
//! rather than blob handles. [`PathFile`] turns a path into a [`Blob`] with a
//! MIME type guessed from the extension, and [`FsReader`] reads it in chunks
//! so progress works the same as in the browser.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::error::ReadError;
use crate::pipeline::BlobReader;
use crate::types::{Blob, ReadMode, ReadPayload};

/// A file on disk, described at the moment it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFile {
    path: PathBuf,
    name: String,
    mime_type: String,
    size: u64,
}

impl PathFile {
    /// Stat `path` and guess its MIME type.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Unknown extensions report an empty type, like browsers do
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name,
            mime_type,
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Blob for PathFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// Chunked reader for [`PathFile`]s.
///
/// Reads block the calling thread; drops deliver a handful of user-selected
/// files, so batches are read inline on the UI executor.
#[derive(Debug, Clone, Copy)]
pub struct FsReader {
    chunk_size: usize,
}

impl Default for FsReader {
    fn default() -> Self {
        Self::new(super::memory::DEFAULT_CHUNK_SIZE)
    }
}

impl FsReader {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Read `source` to the end in chunks, reporting the running byte count.
    ///
    /// `Interrupted` errors are retried; any other error ends the read.
    fn read_chunks(
        &self,
        mut source: impl Read,
        size_hint: u64,
        on_progress: &dyn Fn(u64),
    ) -> Result<Vec<u8>, ReadError> {
        // The stat size may be stale, so never preallocate more than a few chunks
        let capacity = usize::try_from(size_hint)
            .unwrap_or(usize::MAX)
            .min(self.chunk_size.saturating_mul(16));
        let mut buffer = Vec::with_capacity(capacity);
        let mut chunk = vec![0u8; self.chunk_size];

        loop {
            match source.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    buffer.extend_from_slice(&chunk[..n]);
                    on_progress(buffer.len() as u64);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(buffer)
    }
}

impl BlobReader<PathFile> for FsReader {
    fn read<'a>(
        &'a self,
        file: &'a PathFile,
        mode: ReadMode,
        on_progress: &'a dyn Fn(u64),
    ) -> LocalBoxFuture<'a, Result<ReadPayload, ReadError>> {
        Box::pin(async move {
            debug!(path = %file.path.display(), "reading dropped file");
            let handle = File::open(&file.path)?;
            let bytes = self.read_chunks(handle, file.size, on_progress)?;

            // The file changed between the drop and the read
            if bytes.len() as u64 != file.size {
                return Err(ReadError::Failed(format!(
                    "{} changed size while reading ({} -> {} bytes)",
                    file.path.display(),
                    file.size,
                    bytes.len()
                )));
            }
            Ok(mode.decode(bytes, &file.mime_type))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::io::Write;

    #[test]
    fn test_open_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("photo.png");
        std::fs::write(&png, [0x89, b'P', b'N', b'G']).unwrap();
        let odd = dir.path().join("notes.zzunknown");
        std::fs::write(&odd, b"x").unwrap();

        let file = PathFile::open(&png).unwrap();
        assert_eq!(file.name(), "photo.png");
        assert_eq!(file.mime_type(), "image/png");
        assert_eq!(file.size(), 4);

        assert_eq!(PathFile::open(&odd).unwrap().mime_type(), "");
    }

    #[test]
    fn test_open_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PathFile::open(dir.path()).is_err());
        assert!(PathFile::open(dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_chunked_read() {
        let mut tmp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        tmp.write_all(b"hello world").unwrap();
        tmp.flush().unwrap();

        let file = PathFile::open(tmp.path()).unwrap();
        let reader = FsReader::new(4);
        let ticks = RefCell::new(Vec::new());
        let on_progress = |loaded: u64| ticks.borrow_mut().push(loaded);

        let payload = block_on(reader.read(&file, ReadMode::Text, &on_progress)).unwrap();
        assert_eq!(payload, ReadPayload::Text("hello world".to_string()));
        assert_eq!(*ticks.borrow(), vec![4, 8, 11]);
    }

    /// Yields its data in small pieces, failing with `Interrupted` before each.
    struct Flaky {
        data: Vec<u8>,
        pos: usize,
        interrupt_next: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.interrupt_next = true;
            let n = buf.len().min(3).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let source = Flaky {
            data: b"abcdefgh".to_vec(),
            pos: 0,
            interrupt_next: true,
        };
        let ticks = RefCell::new(Vec::new());
        let on_progress = |loaded: u64| ticks.borrow_mut().push(loaded);

        let bytes = FsReader::new(64).read_chunks(source, 8, &on_progress).unwrap();
        assert_eq!(bytes, b"abcdefgh");
        assert_eq!(*ticks.borrow(), vec![3, 6, 8]);
    }

    #[test]
    fn test_other_io_errors_fail_the_read() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(ErrorKind::PermissionDenied, "denied"))
            }
        }

        let result = FsReader::default().read_chunks(Broken, 4, &|_: u64| {});
        assert_eq!(result, Err(ReadError::Failed("denied".to_string())));
    }

    #[test]
    fn test_huge_size_hint_does_not_preallocate() {
        let bytes = FsReader::new(4).read_chunks(&b"xy"[..], u64::MAX, &|_: u64| {}).unwrap();
        assert_eq!(bytes, b"xy");
    }

    #[test]
    fn test_size_change_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grow.bin");
        std::fs::write(&path, [1, 2]).unwrap();
        let file = PathFile::open(&path).unwrap();
        std::fs::write(&path, [1, 2, 3, 4]).unwrap();

        let result = block_on(FsReader::default().read(&file, ReadMode::ArrayBuffer, &|_: u64| {}));
        assert!(matches!(result, Err(ReadError::Failed(_))));
    }

    #[test]
    fn test_deleted_file_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.bin");
        std::fs::write(&path, [1]).unwrap();
        let file = PathFile::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let result = block_on(FsReader::default().read(&file, ReadMode::ArrayBuffer, &|_: u64| {}));
        assert!(matches!(result, Err(ReadError::Failed(_))));
    }
}
