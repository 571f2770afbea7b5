//! Persistence seam and list ownership.
//!
//! # Responsibility
//! - Define the opaque key-value byte store contract and its backends.
//! - Own the ordered in-memory record list (`list_store`).
//!
//! # Invariants
//! - Values are read and written whole; no partial updates.
//! - The list store is the sole writer of its key.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::text::sanitize::sanitize_attribute_token;

pub mod list_store;

pub type ByteStoreResult<T> = Result<T, ByteStoreError>;

/// Backend failure for byte-store operations.
#[derive(Debug)]
pub enum ByteStoreError {
    /// Underlying I/O failure.
    Io(io::Error),
    /// Key reduces to an empty or unusable storage name.
    InvalidKey(String),
}

impl Display for ByteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key: `{key}`"),
        }
    }
}

impl Error for ByteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<io::Error> for ByteStoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Opaque key-value persistence medium.
///
/// One key holds one whole value; `set` replaces it atomically from the
/// caller's perspective.
pub trait ByteStore {
    fn get(&self, key: &str) -> ByteStoreResult<Option<Vec<u8>>>;
    fn set(&mut self, key: &str, bytes: Vec<u8>) -> ByteStoreResult<()>;
    fn delete(&mut self, key: &str) -> ByteStoreResult<()>;
}

/// In-memory byte store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryByteStore {
    values: HashMap<String, Vec<u8>>,
}

impl MemoryByteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ByteStore for MemoryByteStore {
    fn get(&self, key: &str) -> ByteStoreResult<Option<Vec<u8>>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, bytes: Vec<u8>) -> ByteStoreResult<()> {
        self.values.insert(key.to_string(), bytes);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> ByteStoreResult<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// File-backed byte store: one file per key under a root directory.
///
/// Keys are reduced to `[A-Za-z0-9_-]` file names; writes go through a
/// temp file plus rename so readers never observe a partial value.
#[derive(Debug)]
pub struct FileByteStore {
    root: PathBuf,
}

impl FileByteStore {
    /// Opens (and creates if needed) the backing directory.
    ///
    /// # Errors
    /// Returns an I/O error when the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> ByteStoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn value_path(&self, key: &str) -> ByteStoreResult<PathBuf> {
        let token = sanitize_attribute_token(key);
        if token.is_empty() {
            return Err(ByteStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(token))
    }
}

impl ByteStore for FileByteStore {
    fn get(&self, key: &str) -> ByteStoreResult<Option<Vec<u8>>> {
        let path = self.value_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, bytes: Vec<u8>) -> ByteStoreResult<()> {
        let path = self.value_path(key)?;
        let staged = staging_path(&path);
        fs::write(&staged, &bytes)?;
        fs::rename(&staged, &path)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> ByteStoreResult<()> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryByteStore::new();
        assert_eq!(store.get("todos").unwrap(), None);

        store.set("todos", b"[]".to_vec()).unwrap();
        assert_eq!(store.get("todos").unwrap(), Some(b"[]".to_vec()));

        store.delete("todos").unwrap();
        assert_eq!(store.get("todos").unwrap(), None);
    }

    #[test]
    fn memory_store_delete_is_idempotent() {
        let mut store = MemoryByteStore::new();
        store.delete("missing").unwrap();
        store.delete("missing").unwrap();
    }
}
