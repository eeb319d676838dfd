//! Filesystem-backed log store

use super::{LogStore, StorageKey};
use std::fs;
use std::path::{Path, PathBuf};

/// Default store root, `~/.tremor_engine/sessions`
pub fn default_root() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".tremor_engine").join("sessions"))
        .unwrap_or_else(|| PathBuf::from("sessions"))
}

/// Log store rooted at a local directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of `key`
    pub fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.root.join(key.relative_path())
    }
}

impl LogStore for DirectoryStore {
    fn put(&self, key: &StorageKey, text: &str) -> crate::Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write then rename so readers never see a half-written log
        let tmp = path.with_extension("txt.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, key: &StorageKey) -> crate::Result<String> {
        let path = self.path_for(key);
        fs::read_to_string(&path).map_err(|e| {
            crate::Error::Storage(format!("failed to read {}: {}", path.display(), e))
        })
    }

    fn list(&self) -> crate::Result<Vec<StorageKey>> {
        let mut keys = Vec::new();
        if !self.root.exists() {
            return Ok(keys);
        }

        // patient / game / session / file
        for patient in read_dirs(&self.root)? {
            for game in read_dirs(&patient)? {
                for session in read_dirs(&game)? {
                    for entry in fs::read_dir(&session)? {
                        let path = entry?.path();
                        if !path.is_file() {
                            continue;
                        }
                        let relative = match path.strip_prefix(&self.root) {
                            Ok(relative) => relative,
                            Err(_) => continue,
                        };
                        match StorageKey::from_relative_path(relative) {
                            Some(key) => keys.push(key),
                            None => tracing::debug!(path = %path.display(), "Skipping non-log file"),
                        }
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

fn read_dirs(path: &Path) -> crate::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(path)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    Ok(dirs)
}
