//! In-memory backend for tests and throwaway sessions.

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use super::SnapshotBackend;

/// Keeps the snapshot in memory.
///
/// Clones share the same contents, so a test can hold one handle while the
/// store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    contents: Rc<RefCell<Option<String>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-seeded with `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let backend = Self::default();
        *backend.contents.borrow_mut() = Some(contents.into());
        backend
    }

    /// Currently stored snapshot text.
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Make subsequent writes fail, to exercise persistence errors.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl SnapshotBackend for MemoryBackend {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        if self.fail_writes.get() {
            return Err(io::Error::other("memory backend write disabled"));
        }
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        *self.contents.borrow_mut() = None;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
