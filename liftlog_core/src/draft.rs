//! Unsent workout draft, kept in the side store across runs.

use crate::side_store::SideStore;
use crate::validate::{is_date_shaped, DATE_FORMAT};
use crate::{RawSet, WorkoutRequest};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DRAFT_STORAGE_KEY: &str = "gym-tracker-draft-v1";

/// One form row; values are kept as typed, not yet validated
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSet {
    pub reps: String,
    pub weight: String,
}

impl DraftSet {
    pub fn new(reps: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            reps: reps.into().trim().to_string(),
            weight: weight.into().trim().to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.reps.is_empty() && self.weight.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub exercise_name: String,
    pub workout_date: String,
    pub sets: Vec<DraftSet>,
}

impl Draft {
    /// An empty form for `today`: no exercise, one blank row
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            exercise_name: String::new(),
            workout_date: today.format(DATE_FORMAT).to_string(),
            sets: vec![DraftSet::default()],
        }
    }

    pub fn has_set_input(&self) -> bool {
        self.sets.iter().any(|s| !s.is_blank())
    }

    /// Append a row copying the last one (or a blank row if there is none)
    pub fn copy_last_set(&mut self) {
        let row = self.sets.last().cloned().unwrap_or_default();
        self.sets.push(row);
    }

    /// Replace all rows; an empty list leaves one blank row
    pub fn reset_sets(&mut self, sets: Vec<DraftSet>) {
        self.sets = if sets.is_empty() {
            vec![DraftSet::default()]
        } else {
            sets
        };
    }

    /// Turn the draft into a submission for validation
    pub fn to_request(&self) -> WorkoutRequest {
        let sets: Vec<RawSet> = self
            .sets
            .iter()
            .map(|s| RawSet::new(s.reps.as_str(), s.weight.as_str()))
            .collect();
        let date = Some(self.workout_date.as_str()).filter(|d| !d.is_empty());
        WorkoutRequest::new(&self.exercise_name, date, &sets)
    }
}

/// Persist the draft; failures are ignored
pub fn save_draft(store: &dyn SideStore, draft: &Draft) {
    match serde_json::to_string(draft) {
        Ok(json) => store.save(DRAFT_STORAGE_KEY, &json),
        Err(e) => tracing::warn!("Failed to serialize draft: {}", e),
    }
}

/// Restore the saved draft on top of a blank form for `today`.
///
/// Malformed drafts are ignored. A saved date is only kept if it has the
/// `YYYY-MM-DD` shape.
pub fn restore_draft(store: &dyn SideStore, today: NaiveDate) -> Draft {
    let mut draft = Draft::blank(today);

    let Some(raw) = store.load(DRAFT_STORAGE_KEY) else {
        return draft;
    };
    let saved: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Ignoring malformed draft: {}", e);
            return draft;
        }
    };

    let workout_date = sanitize_draft_field(saved.get("workoutDate"));
    if is_date_shaped(&workout_date) {
        draft.workout_date = workout_date;
    }

    let exercise_name = sanitize_draft_field(saved.get("exerciseName"));
    if !exercise_name.is_empty() {
        draft.exercise_name = exercise_name;
    }

    if let Some(Value::Array(rows)) = saved.get("sets") {
        if !rows.is_empty() {
            draft.reset_sets(
                rows.iter()
                    .map(|row| {
                        DraftSet::new(
                            sanitize_draft_field(row.get("reps")),
                            sanitize_draft_field(row.get("weight")),
                        )
                    })
                    .collect(),
            );
        }
    }

    draft
}

pub fn clear_draft(store: &dyn SideStore) {
    store.clear(DRAFT_STORAGE_KEY);
}

fn sanitize_draft_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}
