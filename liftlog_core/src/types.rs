//! Core domain types for liftlog.
//!
//! This module defines the records that flow between the validation engine,
//! the metrics calculator, the store and the front ends:
//! - Validated sets and their derived metrics
//! - Workout entries and exercise catalog entries
//! - Raw (unvalidated) workout submissions
//!
//! All wire shapes serialize with camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Sets and Metrics
// ============================================================================

/// A validated set. `set_number` is its 1-based position in the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
}

/// Metrics computed once when a workout is created
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub top_set_weight: f64,
    pub top_set_reps: u32,
    pub est1rm: f64,
}

// ============================================================================
// Workout and Catalog Records
// ============================================================================

/// A logged workout for one exercise on one date.
///
/// Never mutated after creation. Identified by
/// (owner, exercise_norm, workout_date, created_at).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub owner_id: String,
    pub exercise_name: String,
    pub exercise_norm: String,
    /// `YYYY-MM-DD`
    pub workout_date: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub sets: Vec<Set>,
    pub derived: DerivedMetrics,
}

/// One row per distinct normalized exercise per owner ("recently used").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCatalogEntry {
    pub exercise_name: String,
    pub exercise_norm: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl From<&WorkoutEntry> for ExerciseCatalogEntry {
    fn from(entry: &WorkoutEntry) -> Self {
        ExerciseCatalogEntry {
            exercise_name: entry.exercise_name.clone(),
            exercise_norm: entry.exercise_norm.clone(),
            updated_at: entry.created_at,
        }
    }
}

// ============================================================================
// Raw Submissions
// ============================================================================

/// A set as submitted, before validation.
///
/// Fields accept JSON numbers or numeric strings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSet {
    #[serde(default)]
    pub reps: Option<Value>,
    #[serde(default)]
    pub weight: Option<Value>,
}

impl RawSet {
    pub fn new(reps: impl Into<Value>, weight: impl Into<Value>) -> Self {
        Self {
            reps: Some(reps.into()),
            weight: Some(weight.into()),
        }
    }
}

impl From<&Set> for RawSet {
    fn from(set: &Set) -> Self {
        RawSet::new(set.reps, set.weight)
    }
}

/// Body of a "log workout" submission, as received.
///
/// Every field is kept as a loose JSON value so that wrong types produce the
/// same validation messages as wrong values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRequest {
    #[serde(default)]
    pub exercise_name: Option<Value>,
    #[serde(default)]
    pub workout_date: Option<Value>,
    #[serde(default)]
    pub sets: Option<Value>,
}

impl WorkoutRequest {
    pub fn new(exercise_name: &str, workout_date: Option<&str>, sets: &[RawSet]) -> Self {
        Self {
            exercise_name: Some(Value::from(exercise_name)),
            workout_date: workout_date.map(Value::from),
            sets: Some(Value::Array(
                sets.iter()
                    .map(|s| serde_json::to_value(s).unwrap_or(Value::Null))
                    .collect(),
            )),
        }
    }
}
