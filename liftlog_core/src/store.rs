//! Persistence contract and the file-backed implementation.
//!
//! The contract is a tiny key-value store: put-by-key, plus a range query by
//! partition key returning items in descending sort-key order.

use crate::exercise_catalog::ExerciseCatalog;
use crate::workout_log::JsonlWorkoutLog;
use crate::{ExerciseCatalogEntry, Result, WorkoutEntry};
use std::path::{Path, PathBuf};

pub const WORKOUT_LOG_FILE: &str = "workouts.jsonl";
pub const EXERCISE_CATALOG_FILE: &str = "exercises.json";

/// Storage operations needed by the workout service
pub trait WorkoutStore {
    /// Store a workout under its (partition key, sort key)
    fn put_workout(&self, entry: &WorkoutEntry) -> Result<()>;

    /// Workouts in `partition_key`, newest sort key first, at most `limit`
    fn query_workouts(&self, partition_key: &str, limit: usize) -> Result<Vec<WorkoutEntry>>;

    /// Insert or overwrite the owner's catalog entry for an exercise
    fn put_exercise(&self, owner_id: &str, entry: &ExerciseCatalogEntry) -> Result<()>;

    /// All of the owner's catalog entries, in no particular order
    fn list_exercises(&self, owner_id: &str) -> Result<Vec<ExerciseCatalogEntry>>;
}

/// Workout log plus catalog file in one data directory
#[derive(Clone, Debug)]
pub struct FileStore {
    workouts: JsonlWorkoutLog,
    catalog_path: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            workouts: JsonlWorkoutLog::new(data_dir.join(WORKOUT_LOG_FILE)),
            catalog_path: data_dir.join(EXERCISE_CATALOG_FILE),
        }
    }

    pub fn workout_log_path(&self) -> &Path {
        self.workouts.path()
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// Catalog rebuilt from the workout log, for when the catalog file is
    /// unusable
    fn rebuild_catalog(&self) -> Result<ExerciseCatalog> {
        let workouts = self.workouts.read_all()?;
        tracing::warn!(
            "Rebuilding exercise catalog from {} logged workouts",
            workouts.len()
        );
        Ok(ExerciseCatalog::from_workouts(&workouts))
    }
}

impl WorkoutStore for FileStore {
    fn put_workout(&self, entry: &WorkoutEntry) -> Result<()> {
        self.workouts.append(entry)
    }

    fn query_workouts(&self, partition_key: &str, limit: usize) -> Result<Vec<WorkoutEntry>> {
        let mut matching: Vec<(String, WorkoutEntry)> = self
            .workouts
            .read_all()?
            .into_iter()
            .rev()
            .filter(|e| e.partition_key() == partition_key)
            .map(|e| (e.sort_key(), e))
            .collect();

        // Stable sort: among equal keys the later append stays first
        matching.sort_by(|a, b| b.0.cmp(&a.0));
        matching.truncate(limit);

        tracing::debug!(
            "Query {} returned {} workouts (limit {})",
            partition_key,
            matching.len(),
            limit
        );
        Ok(matching.into_iter().map(|(_, e)| e).collect())
    }

    fn put_exercise(&self, owner_id: &str, entry: &ExerciseCatalogEntry) -> Result<()> {
        ExerciseCatalog::update_or_else(
            &self.catalog_path,
            || self.rebuild_catalog(),
            |catalog| catalog.upsert(owner_id, entry.clone()),
        )?;
        Ok(())
    }

    fn list_exercises(&self, owner_id: &str) -> Result<Vec<ExerciseCatalogEntry>> {
        let catalog = ExerciseCatalog::load_or_else(&self.catalog_path, || self.rebuild_catalog())?;
        Ok(catalog.entries(owner_id))
    }
}
