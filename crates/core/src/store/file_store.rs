//! File-backed key-value store.
//!
//! One JSON file per key under a data directory. Writes go through a
//! temp file and a rename so a crash mid-write never leaves a truncated
//! collection behind; `save_many` stages every temp file before renaming
//! any of them, which is what makes multi-key overwrites (backup import)
//! all-or-nothing in practice.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::StoreError;
use crate::{Error, Result};

use super::KeyValueStore;

/// Key-value store persisting each key as `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Store(StoreError::Io(format!("create {}: {}", dir.display(), e))))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn staging_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json.tmp", key))
    }

    fn stage(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let staging = self.staging_path_for(key);
        fs::write(&staging, bytes)
            .map_err(|e| Error::Store(StoreError::Io(format!("stage {}: {}", key, e))))?;
        Ok(staging)
    }

    fn commit(&self, key: &str, staging: &Path) -> Result<()> {
        fs::rename(staging, self.path_for(key))
            .map_err(|e| Error::Store(StoreError::Io(format!("commit {}: {}", key, e))))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Store(StoreError::Io(format!("load {}: {}", key, e)))),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let staging = self.stage(key, bytes)?;
        self.commit(key, &staging)?;
        debug!("saved {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    fn save_many(&self, entries: &[(&str, Vec<u8>)]) -> Result<()> {
        // Stage everything first; only start renaming once every write
        // has already succeeded.
        let mut staged = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            staged.push((*key, self.stage(key, bytes)?));
        }
        for (key, staging) in staged {
            self.commit(key, &staging)?;
        }
        Ok(())
    }
}
