//! Building workout entries from raw submissions.

use crate::error::ValidationError;
use crate::metrics::derive_metrics;
use crate::types::{WorkoutEntry, WorkoutRequest};
use crate::validate::{
    normalize_exercise_name, normalize_set_value, normalize_workout_date, require_exercise_name,
};
use crate::Result;
use chrono::{DateTime, Utc};

/// Partition key for one owner's workouts of one exercise.
pub fn workout_partition_key(owner_id: &str, exercise_norm: &str) -> String {
    format!("OWNER#{}#EX#{}", owner_id, exercise_norm)
}

impl WorkoutEntry {
    /// Validate a submission and build the immutable entry.
    ///
    /// A missing workout date defaults to `now`'s UTC date; `created_at` is
    /// `now`.
    pub fn create(owner_id: &str, request: &WorkoutRequest, now: DateTime<Utc>) -> Result<Self> {
        let exercise_name =
            require_exercise_name(request.exercise_name.as_ref(), "exerciseName is required")?;
        let exercise_norm = normalize_exercise_name(&exercise_name);
        let workout_date = normalize_workout_date(request.workout_date.as_ref(), now.date_naive())?;
        let sets = normalize_set_value(request.sets.as_ref())?;

        let derived = derive_metrics(&sets).ok_or_else(|| {
            ValidationError::new("sets must contain between 1 and 20 entries")
        })?;

        tracing::debug!(
            "Validated workout for {:?} on {} ({} sets, est1rm {})",
            exercise_norm,
            workout_date,
            sets.len(),
            derived.est1rm
        );

        Ok(WorkoutEntry {
            owner_id: owner_id.to_string(),
            exercise_name,
            exercise_norm,
            workout_date,
            created_at: now,
            sets,
            derived,
        })
    }

    /// `OWNER#<owner>#EX#<norm>`
    pub fn partition_key(&self) -> String {
        workout_partition_key(&self.owner_id, &self.exercise_norm)
    }

    /// `DATE#<date>#TS#<millis>`, zero-padded so that lexical order is
    /// chronological.
    pub fn sort_key(&self) -> String {
        format!(
            "DATE#{}#TS#{:013}",
            self.workout_date,
            self.created_at.timestamp_millis()
        )
    }
}
