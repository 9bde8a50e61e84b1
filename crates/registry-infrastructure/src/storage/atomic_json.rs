//! Atomic JSON snapshot files.
//!
//! The in-memory store persists its committed state as one JSON document.
//! Writes go to a temporary sibling and are renamed into place, so a reader
//! only ever sees a complete snapshot.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

use registry_core::RegistryError;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<SnapshotError> for RegistryError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Io(e) => e.into(),
            SnapshotError::Json(e) => e.into(),
            SnapshotError::Lock(message) => RegistryError::data_access(message),
        }
    }
}

/// A handle to a JSON file replaced atomically on every save.
///
/// Provides:
/// - **Atomicity**: tmp file + rename
/// - **Isolation**: an exclusive `fs2` lock while writing
/// - **Durability**: fsync before rename
#[derive(Debug, Clone)]
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, SnapshotError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Takes the exclusive lock on this snapshot, blocking until it is free.
    ///
    /// The lock spans processes: every writer of the same path serializes on
    /// `<snapshot>.lock`.
    pub fn lock(&self) -> Result<SnapshotLock, SnapshotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        SnapshotLock::acquire(&self.path)
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), SnapshotError> {
        let lock = self.lock()?;
        self.save_locked(&lock, data)
    }

    /// Like [`save`](Self::save), for a caller already holding the lock.
    pub fn save_locked(&self, _lock: &SnapshotLock, data: &T) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, SnapshotError> {
        let file_name = self.path.file_name().ok_or_else(|| {
            SnapshotError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no file name",
            ))
        })?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive lock on `<snapshot>.lock`, released when dropped.
///
/// The lock file is never removed, so every writer locks the same inode.
pub struct SnapshotLock {
    _handle: File,
}

impl SnapshotLock {
    fn acquire(path: &Path) -> Result<Self, SnapshotError> {
        let lock_path = path.with_extension("lock");
        let handle = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        fs2::FileExt::lock_exclusive(&handle).map_err(|e| {
            SnapshotError::Lock(format!("cannot lock {:?}: {}", lock_path, e))
        })?;

        Ok(SnapshotLock { _handle: handle })
    }
}
