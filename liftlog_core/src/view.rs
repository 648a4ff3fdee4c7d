//! Client view state and display formatting.
//!
//! `ViewState` is an immutable value: every update consumes the old state and
//! returns a new one, so a front end holds exactly one current state instead
//! of a handful of shared globals.

use crate::draft::DraftSet;
use crate::history::HistoryStats;
use crate::validate::{normalize_exercise_name, sanitize_exercise_name};
use crate::{DerivedMetrics, ExerciseCatalogEntry, Set, WorkoutEntry};

/// How many recent exercises to offer as quick picks
pub const QUICK_PICK_COUNT: usize = 6;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    exercises: Vec<ExerciseCatalogEntry>,
    current_exercise: String,
    latest: Option<WorkoutEntry>,
    history: Vec<WorkoutEntry>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_exercises(self, exercises: Vec<ExerciseCatalogEntry>) -> Self {
        Self { exercises, ..self }
    }

    /// Switch exercise. Data loaded for a different exercise is dropped.
    #[must_use]
    pub fn select_exercise(self, name: &str) -> Self {
        let name = sanitize_exercise_name(name);
        if name.is_empty() {
            return Self {
                current_exercise: name,
                ..self.cleared_exercise_data()
            };
        }

        let same = normalize_exercise_name(&name) == normalize_exercise_name(&self.current_exercise);
        let base = if same { self } else { self.cleared_exercise_data() };
        Self {
            current_exercise: name,
            ..base
        }
    }

    #[must_use]
    pub fn with_exercise_data(self, latest: Option<WorkoutEntry>, history: Vec<WorkoutEntry>) -> Self {
        Self {
            latest,
            history,
            ..self
        }
    }

    #[must_use]
    pub fn cleared_exercise_data(self) -> Self {
        Self {
            latest: None,
            history: Vec::new(),
            ..self
        }
    }

    pub fn exercises(&self) -> &[ExerciseCatalogEntry] {
        &self.exercises
    }

    pub fn current_exercise(&self) -> &str {
        &self.current_exercise
    }

    pub fn latest(&self) -> Option<&WorkoutEntry> {
        self.latest.as_ref()
    }

    pub fn history(&self) -> &[WorkoutEntry] {
        &self.history
    }

    /// The `n` most recently used exercises
    pub fn quick_picks(&self, n: usize) -> Vec<&ExerciseCatalogEntry> {
        let mut recent: Vec<_> = self.exercises.iter().collect();
        recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        recent.truncate(n);
        recent
    }

    pub fn stats(&self) -> Option<HistoryStats> {
        HistoryStats::from_history(&self.history)
    }

    pub fn can_reuse_last(&self) -> bool {
        self.latest.as_ref().is_some_and(|l| !l.sets.is_empty())
    }

    /// The latest session's sets as form rows
    pub fn reuse_last_sets(&self) -> Vec<DraftSet> {
        self.latest
            .iter()
            .flat_map(|l| l.sets.iter())
            .map(|s| DraftSet::new(s.reps.to_string(), s.weight.to_string()))
            .collect()
    }
}

/// Two decimals, with a trailing `.00` dropped: `100`, `102.50`, `0.25`
pub fn format_weight(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    match formatted.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

/// `"5 reps @ 100 kg, 3 reps @ 102.50 kg"`, or `"No sets"`
pub fn set_summary(sets: &[Set]) -> String {
    if sets.is_empty() {
        return "No sets".to_string();
    }
    sets.iter()
        .map(|s| format!("{} reps @ {} kg", s.reps, format_weight(s.weight)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn top_set_summary(derived: &DerivedMetrics) -> String {
    format!(
        "{} reps @ {} kg",
        derived.top_set_reps,
        format_weight(derived.top_set_weight)
    )
}
