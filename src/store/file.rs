// SPDX-License-Identifier: MIT

//! File-backed state store.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{AppError, Result};
use crate::store::StateStore;

/// State store persisted as a single JSON document on disk.
///
/// Every mutation rewrites the file via a temp-file rename, so a crash
/// mid-write leaves the previous document intact.
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (or create) the state file inside `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::Storage(format!("create {}: {}", dir.display(), e)))?;
        Ok(Self {
            path: dir.join("state.json"),
            lock: Mutex::new(()),
        })
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                AppError::Storage(format!("corrupt state file {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Storage(format!(
                "read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(map)
            .map_err(|e| AppError::Storage(format!("serialize state: {}", e)))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .map_err(|e| AppError::Storage(format!("write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| AppError::Storage(format!("rename {}: {}", tmp.display(), e)))?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut map = self.load()?;
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}
