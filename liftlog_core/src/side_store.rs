//! Best-effort key-value side store for client conveniences.
//!
//! Drafts and routine templates are nice to keep across runs but never worth
//! failing a command over, so this interface has no error path: failures are
//! logged and swallowed.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

pub trait SideStore {
    /// The stored value, or `None` if missing or unreadable
    fn load(&self, key: &str) -> Option<String>;

    fn save(&self, key: &str, value: &str);

    fn clear(&self, key: &str);
}

/// One file per key under a directory
#[derive(Clone, Debug)]
pub struct FileSideStore {
    dir: PathBuf,
}

impl FileSideStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`; characters outside `[A-Za-z0-9._-]` become `_`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    fn write_atomic(path: &Path, value: &str) -> std::io::Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(value.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SideStore for FileSideStore {
    fn load(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable side store entry {:?}: {}", path, e);
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) {
        let path = self.path_for(key);
        if let Err(e) = Self::write_atomic(&path, value) {
            tracing::warn!("Failed to save side store entry {:?}: {}", path, e);
        }
    }

    fn clear(&self, key: &str) {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to clear side store entry {:?}: {}", path, e),
        }
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemorySideStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySideStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SideStore for MemorySideStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn clear(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}
