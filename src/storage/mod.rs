//! Snapshot persistence backends.

pub mod file;
pub mod memory;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

use std::io;

/// Where the serialized snapshot lives.
///
/// Every write replaces the whole document.
pub trait SnapshotBackend {
    /// Read the stored snapshot, `None` if nothing has been stored yet.
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the stored snapshot.
    fn write(&mut self, contents: &str) -> io::Result<()>;

    /// Discard any stored snapshot.
    fn clear(&mut self) -> io::Result<()>;

    /// Short description for log messages.
    fn describe(&self) -> String;
}
