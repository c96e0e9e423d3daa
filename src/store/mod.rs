//! Durable key-value storage for the project document.

use crate::error::ToolkitResult;

pub mod fs;
pub mod memory;

pub use fs::FileStore;
pub use memory::MemoryStore;

/// Abstract interface for the persistence store.
///
/// A session keeps exactly one document under one fixed key. Writes are
/// last-writer-wins; there is no versioning.
pub trait PersistenceStore {
    /// Reads the value under `key`, or `None` if nothing is stored there.
    fn read(&self, key: &str) -> ToolkitResult<Option<String>>;

    /// Replaces the value under `key`.
    fn write(&mut self, key: &str, value: &str) -> ToolkitResult<()>;
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for Box<S> {
    fn read(&self, key: &str) -> ToolkitResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> ToolkitResult<()> {
        (**self).write(key, value)
    }
}
