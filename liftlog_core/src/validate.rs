//! Validation and normalization of workout submissions.
//!
//! Everything here is pure: no clock, no IO. Callers pass "today" in when a
//! missing workout date has to be defaulted.

use crate::error::ValidationError;
use crate::metrics::round2;
use crate::types::{RawSet, Set};
use chrono::NaiveDate;
use serde_json::Value;

pub const MIN_SETS: usize = 1;
pub const MAX_SETS: usize = 20;
pub const MIN_REPS: u32 = 1;
pub const MAX_REPS: u32 = 200;
pub const MIN_WEIGHT: f64 = 0.0;
pub const MAX_WEIGHT: f64 = 2000.0;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

type Validated<T> = std::result::Result<T, ValidationError>;

/// Trim and collapse internal whitespace runs to a single space.
pub fn sanitize_exercise_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sanitize a loosely-typed name; anything but a string becomes empty.
pub fn sanitize_exercise_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => sanitize_exercise_name(s),
        _ => String::new(),
    }
}

/// Canonical lookup key for an exercise name.
pub fn normalize_exercise_name(name: &str) -> String {
    sanitize_exercise_name(name).to_lowercase()
}

/// Sanitize a required exercise name, failing when nothing is left.
pub fn require_exercise_name(value: Option<&Value>, message: &str) -> Validated<String> {
    let name = sanitize_exercise_value(value);
    if name.is_empty() {
        return Err(ValidationError::new(message));
    }
    Ok(name)
}

/// True when `value` has the `YYYY-MM-DD` shape (ASCII digits only).
pub fn is_date_shaped(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Normalize the workout date.
///
/// Absent, null or empty defaults to `today`. Otherwise the value must be a
/// `YYYY-MM-DD` string naming a real calendar date.
pub fn normalize_workout_date(value: Option<&Value>, today: NaiveDate) -> Validated<String> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(today.format(DATE_FORMAT).to_string()),
        Some(Value::String(s)) if s.is_empty() => {
            return Ok(today.format(DATE_FORMAT).to_string())
        }
        Some(Value::String(s)) => s.as_str(),
        Some(_) => {
            return Err(ValidationError::new(
                "workoutDate must be in YYYY-MM-DD format",
            ))
        }
    };

    if !is_date_shaped(raw) {
        return Err(ValidationError::new(
            "workoutDate must be in YYYY-MM-DD format",
        ));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::new("workoutDate is invalid"))?;

    Ok(raw.to_string())
}

/// Interpret a JSON number or numeric string.
fn numeric_like(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

fn validate_reps(raw: &RawSet, set_number: usize) -> Validated<u32> {
    let valid = numeric_like(raw.reps.as_ref()).filter(|v| {
        v.fract() == 0.0 && *v >= f64::from(MIN_REPS) && *v <= f64::from(MAX_REPS)
    });
    match valid {
        Some(v) => Ok(v as u32),
        None => Err(ValidationError::new(format!(
            "set {}: reps must be an integer between {} and {}",
            set_number, MIN_REPS, MAX_REPS
        ))),
    }
}

fn validate_weight(raw: &RawSet, set_number: usize) -> Validated<f64> {
    let valid = numeric_like(raw.weight.as_ref())
        .filter(|v| v.is_finite() && *v >= MIN_WEIGHT && *v <= MAX_WEIGHT);
    match valid {
        // `+ 0.0` folds a negative zero into zero
        Some(v) => Ok(round2(v) + 0.0),
        None => Err(ValidationError::new(format!(
            "set {}: weight must be a number between {} and {}",
            set_number, MIN_WEIGHT, MAX_WEIGHT
        ))),
    }
}

/// Validate a list of raw sets, numbering them from 1.
///
/// Fails on the first bad entry with a message naming its position.
pub fn normalize_sets(sets: &[RawSet]) -> Validated<Vec<Set>> {
    if sets.len() < MIN_SETS || sets.len() > MAX_SETS {
        return Err(ValidationError::new(format!(
            "sets must contain between {} and {} entries",
            MIN_SETS, MAX_SETS
        )));
    }

    sets.iter()
        .enumerate()
        .map(|(index, raw)| {
            let set_number = index + 1;
            let reps = validate_reps(raw, set_number)?;
            let weight = validate_weight(raw, set_number)?;
            Ok(Set {
                set_number: set_number as u32,
                reps,
                weight,
            })
        })
        .collect()
}

/// Validate a loosely-typed set list (the `sets` field of a request body).
pub fn normalize_set_value(value: Option<&Value>) -> Validated<Vec<Set>> {
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(ValidationError::new(format!(
                "sets must contain between {} and {} entries",
                MIN_SETS, MAX_SETS
            )))
        }
    };

    let raw: Vec<RawSet> = items
        .iter()
        .map(|item| RawSet {
            reps: item.get("reps").cloned(),
            weight: item.get("weight").cloned(),
        })
        .collect();

    normalize_sets(&raw)
}
