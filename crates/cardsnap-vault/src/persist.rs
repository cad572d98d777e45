//! Opaque byte store for persisted blobs
//!
//! The vault persists exactly two encrypted blobs (`items-blob`,
//! `settings-blob`) plus the keystore's device-key record. The store
//! itself is a dumb key/value surface with no transactional guarantees;
//! the controller is its only writer.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;

/// Blob name for the encrypted item collection
pub const ITEMS_BLOB: &str = "items-blob";

/// Blob name for the encrypted settings
pub const SETTINGS_BLOB: &str = "settings-blob";

/// Byte store contract: `get`/`set`/`clear`, nothing more
pub trait BlobStore: Send {
    /// Read a blob; `None` when absent (absence is never an error)
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a blob, replacing any previous value wholesale
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Erase every blob. Irreversible.
    fn clear(&mut self) -> Result<()>;
}

/// In-memory store for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw snapshot of a blob, for byte-for-byte isolation assertions
    pub fn snapshot(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.get(key).cloned()
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.blobs.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.blobs.clear();
        Ok(())
    }
}

/// File-backed store: one file per blob under a base directory
pub struct FileBlobStore {
    base_path: PathBuf,
}

impl FileBlobStore {
    /// Create a store rooted at `base_path`, creating the directory
    pub fn new(base_path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.bin", key))
    }

    /// The base directory
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(&path)?))
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.blob_path(key);

        // Write to temp file first, then rename for atomicity. The temp
        // file is created 0600 before any bytes land, so the blob is never
        // world-readable, not even transiently (Unix only).
        let temp_path = path.with_extension("bin.tmp");
        // A stale temp file would keep its old mode; start fresh
        let _ = std::fs::remove_file(&temp_path);
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        {
            use std::io::Write;
            let mut file = options.open(&temp_path)?;
            file.write_all(value)?;
        }
        std::fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        for entry in std::fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}
