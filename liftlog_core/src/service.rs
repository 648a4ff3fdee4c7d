//! Workout service: the operations behind every front end.
//!
//! Each call is independent. The only state is the store and a few settings
//! fixed at construction.

use crate::history::parse_history_limit;
use crate::store::WorkoutStore;
use crate::validate::{normalize_exercise_name, require_exercise_name};
use crate::workout::workout_partition_key;
use crate::{Config, ExerciseCatalogEntry, Result, WorkoutEntry, WorkoutRequest};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Settings a service instance runs with
#[derive(Clone, Debug)]
pub struct ServiceSettings {
    pub owner_id: String,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            owner_id: config.owner.id.clone(),
            default_limit: config.history.default_limit,
            max_limit: config.history.max_limit,
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

pub struct WorkoutService<S> {
    store: S,
    settings: ServiceSettings,
}

impl<S: WorkoutStore> WorkoutService<S> {
    pub fn new(store: S, settings: ServiceSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and record a workout, then bump the exercise in the catalog.
    ///
    /// Not idempotent: resubmitting creates another timestamped entry.
    pub fn log_workout(&self, request: &WorkoutRequest, now: DateTime<Utc>) -> Result<WorkoutEntry> {
        let entry = WorkoutEntry::create(&self.settings.owner_id, request, now)?;

        self.store.put_workout(&entry)?;
        self.store
            .put_exercise(&self.settings.owner_id, &ExerciseCatalogEntry::from(&entry))?;

        tracing::info!(
            "Logged {} on {}: {} sets, est1rm {}",
            entry.exercise_norm,
            entry.workout_date,
            entry.sets.len(),
            entry.derived.est1rm
        );
        Ok(entry)
    }

    /// The owner's exercises, most recently used first
    pub fn list_exercises(&self) -> Result<Vec<ExerciseCatalogEntry>> {
        let mut items = self.store.list_exercises(&self.settings.owner_id)?;
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(items)
    }

    /// The most recent workout for an exercise, if any
    pub fn latest_workout(&self, exercise: Option<&str>) -> Result<Option<WorkoutEntry>> {
        let partition_key = self.partition_for(exercise)?;
        Ok(self
            .store
            .query_workouts(&partition_key, 1)?
            .into_iter()
            .next())
    }

    /// Workouts for an exercise, newest first
    ///
    /// `limit` is parsed leniently, defaulted and clamped; see
    /// [`parse_history_limit`].
    pub fn workout_history(
        &self,
        exercise: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Vec<WorkoutEntry>> {
        let partition_key = self.partition_for(exercise)?;
        let limit = parse_history_limit(
            limit,
            self.settings.default_limit,
            self.settings.max_limit,
        );
        self.store.query_workouts(&partition_key, limit)
    }

    fn partition_for(&self, exercise: Option<&str>) -> Result<String> {
        let value = exercise.map(Value::from);
        let name = require_exercise_name(value.as_ref(), "exercise query parameter is required")?;
        Ok(workout_partition_key(
            &self.settings.owner_id,
            &normalize_exercise_name(&name),
        ))
    }
}
