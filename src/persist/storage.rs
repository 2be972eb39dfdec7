//! Snapshot Storage Module
//!
//! Byte-oriented backing stores for persisted cache snapshots. The
//! persister only needs whole-blob read/write keyed by a fixed storage
//! identifier; everything else (format, filtering, freshness) lives in the
//! persister itself.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Result;

// == Snapshot Storage Trait ==
/// External byte store for snapshot blobs.
///
/// One writer per storage identifier is assumed; two independent caches
/// writing under the same identifier is undefined behavior.
pub trait SnapshotStorage: Send + Sync {
    /// Reads the blob stored under `id`, or None if nothing was saved yet.
    fn read(&self, id: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrites the blob stored under `id` wholesale.
    fn write(&self, id: &str, blob: &[u8]) -> Result<()>;
}

// == File Storage ==
/// Stores each snapshot blob as a file under a base directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a file storage rooted at `dir`.
    ///
    /// The directory is created on the first write, not up front.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn blob_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.blob_path(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, id: &str, blob: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.blob_path(id), blob)?;
        Ok(())
    }
}

// == Memory Storage ==
/// In-memory blob store, for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().expect("storage lock poisoned").get(id).cloned())
    }

    fn write(&self, id: &str, blob: &[u8]) -> Result<()> {
        self.blobs
            .lock()
            .expect("storage lock poisoned")
            .insert(id.to_string(), blob.to_vec());
        Ok(())
    }
}
