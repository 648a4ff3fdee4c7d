//! Per-owner exercise catalog persistence with file locking.
//!
//! The catalog is a small JSON document keyed by owner, then by normalized
//! exercise name. Writes replace the whole file atomically. Updates hold an
//! exclusive lock on a sibling `.lock` file for the whole read-modify-write,
//! so concurrent upserts of different exercises are never lost; upserts of
//! the same exercise are last-write-wins. Callers may supply a recovery for a
//! corrupted file, such as a rebuild from the workout log.

use crate::{Error, ExerciseCatalogEntry, Result, WorkoutEntry};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// All owners' catalog entries
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCatalog {
    #[serde(default)]
    pub owners: BTreeMap<String, BTreeMap<String, ExerciseCatalogEntry>>,
}

impl ExerciseCatalog {
    /// Insert or overwrite the entry for `entry.exercise_norm`
    pub fn upsert(&mut self, owner_id: &str, entry: ExerciseCatalogEntry) {
        self.owners
            .entry(owner_id.to_string())
            .or_default()
            .insert(entry.exercise_norm.clone(), entry);
    }

    /// One owner's entries, most recently updated first
    pub fn entries(&self, owner_id: &str) -> Vec<ExerciseCatalogEntry> {
        let mut entries: Vec<_> = self
            .owners
            .get(owner_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        entries
    }

    /// Latest entry per exercise, as recorded in a workout log
    pub fn from_workouts(workouts: &[WorkoutEntry]) -> Self {
        let mut catalog = Self::default();
        for workout in workouts {
            let entry = ExerciseCatalogEntry::from(workout);
            let newer = catalog
                .owners
                .get(&workout.owner_id)
                .and_then(|m| m.get(&entry.exercise_norm))
                .map_or(true, |existing| entry.updated_at >= existing.updated_at);
            if newer {
                catalog.upsert(&workout.owner_id, entry);
            }
        }
        catalog
    }

    /// Load the catalog from a file with shared locking
    ///
    /// Returns an empty catalog if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_or_else(path, || Ok(Self::default()))
    }

    /// Like [`ExerciseCatalog::load`], but a file that exists and cannot be
    /// read or parsed is replaced by `recover()`
    pub fn load_or_else<F>(path: &Path, recover: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Self>,
    {
        if !path.exists() {
            tracing::debug!("No exercise catalog at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        match Self::read(path) {
            Ok(catalog) => Ok(catalog),
            Err(reason) => {
                tracing::warn!("Unusable catalog {:?}: {}. Recovering.", path, reason);
                recover()
            }
        }
    }

    fn read(path: &Path) -> std::result::Result<Self, String> {
        let file = File::open(path).map_err(|e| format!("open failed: {}", e))?;
        file.lock_shared()
            .map_err(|e| format!("lock failed: {}", e))?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();
        read.map_err(|e| format!("read failed: {}", e))?;

        serde_json::from_str(&contents).map_err(|e| format!("parse failed: {}", e))
    }

    /// Save the catalog atomically: temp file, sync, rename
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Store(format!("catalog path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved exercise catalog to {:?}", path);
        Ok(())
    }

    /// Load, modify and save back under the update lock
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut ExerciseCatalog),
    {
        Self::update_or_else(path, || Ok(Self::default()), f)
    }

    /// [`ExerciseCatalog::update`] with `recover` standing in for an
    /// unusable file, see [`ExerciseCatalog::load_or_else`]
    pub fn update_or_else<R, F>(path: &Path, recover: R, f: F) -> Result<Self>
    where
        R: FnOnce() -> Result<Self>,
        F: FnOnce(&mut ExerciseCatalog),
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path.with_extension("lock"))?;
        lock.lock_exclusive()?;

        let saved = Self::load_or_else(path, recover).and_then(|mut catalog| {
            f(&mut catalog);
            catalog.save(path).map(|_| catalog)
        });

        lock.unlock()?;
        saved
    }
}
