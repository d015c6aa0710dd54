//! Read errors.
//!
//! Nothing here ever reaches the embedder as a `Result`: failures are turned
//! into `on_error` callback invocations by the read pipeline.

use thiserror::Error;

/// Why a single read did not produce a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("read failed: {0}")]
    Failed(String),
    #[error("read aborted")]
    Aborted,
}

/// Every I/O error is a failure. Readers retry `Interrupted` themselves, and
/// an abort only comes from the host cancelling the read.
impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        Self::Failed(err.to_string())
    }
}

/// A failed read, tagged with the file's position in its batch.
///
/// Errors and aborts render the same message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Something went wrong while uploading file number {index}.")]
pub struct ReadFailure {
    pub index: usize,
    #[source]
    pub source: ReadError,
}

impl ReadFailure {
    pub fn new(index: usize, source: ReadError) -> Self {
        Self { index, source }
    }

    pub fn is_abort(&self) -> bool {
        self.source == ReadError::Aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_failure_message_names_index() {
        let failure = ReadFailure::new(2, ReadError::Aborted);
        assert_eq!(
            failure.to_string(),
            "Something went wrong while uploading file number 2."
        );
        assert!(failure.is_abort());
        assert_eq!(failure.source().map(|s| s.to_string()).as_deref(), Some("read aborted"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: ReadError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err, ReadError::Failed("gone".to_string()));

        let err: ReadError = std::io::Error::new(std::io::ErrorKind::Interrupted, "eintr").into();
        assert_eq!(err, ReadError::Failed("eintr".to_string()));
    }
}
