//! Backends - Concrete blobs, readers, and hosts.
//!
//! - [`memory`] - Headless host over in-memory files
//! - [`fs`] - Files dropped as filesystem paths

pub mod fs;
pub mod memory;

pub use fs::{FsReader, PathFile};
pub use memory::{MemoryFile, MemoryHost, MemoryReader};
