//! CSV export of workout history.
//!
//! One row per set, with the session's derived metrics repeated on each row
//! so the file can be pivoted in a spreadsheet without joins.

use crate::{Result, WorkoutEntry};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    workout_date: &'a str,
    exercise_name: &'a str,
    set_number: u32,
    reps: u32,
    weight: f64,
    top_set_weight: f64,
    top_set_reps: u32,
    est1rm: f64,
    created_at: String,
}

/// Append the sets of `entries` to a CSV file, creating it with headers if
/// needed. The file is synced before returning.
///
/// Returns the number of rows written.
pub fn export_history_csv(entries: &[WorkoutEntry], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut rows = 0;
    for entry in entries {
        for set in &entry.sets {
            writer.serialize(CsvRow {
                workout_date: &entry.workout_date,
                exercise_name: &entry.exercise_name,
                set_number: set.set_number,
                reps: set.reps,
                weight: set.weight,
                top_set_weight: entry.derived.top_set_weight,
                top_set_reps: entry.derived.top_set_reps,
                est1rm: entry.derived.est1rm,
                created_at: entry.created_at.to_rfc3339(),
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} rows to {:?}", rows, csv_path);
    Ok(rows)
}
