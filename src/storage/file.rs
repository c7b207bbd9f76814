//! File-backed storage: one file per key inside a directory

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{KeyValueStorage, StorageError};

/// Durable key-value storage under a directory
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    quota: Option<usize>,
    /// Serializes writers so quota checks see a stable directory
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open storage in `dir`, creating it if needed
    pub fn open(dir: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            quota,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }

    /// Bytes used by every stored key except `skip`
    fn used_bytes_except(&self, skip: &Path) -> Result<usize, StorageError> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path == skip || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            total += entry.metadata()?.len() as usize;
        }
        Ok(total)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let path = self.path_for(key);

        if let Some(limit) = self.quota {
            let needed = self.used_bytes_except(&path)? + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        // write-then-rename so a crash never leaves a half-written blob
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
