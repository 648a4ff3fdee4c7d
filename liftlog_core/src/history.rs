//! History queries and summary statistics.
//!
//! History lists are always newest first. The summary mirrors what the
//! client shows next to a history list: the best top set across the list and
//! the latest session's numbers.

use crate::WorkoutEntry;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 200;

/// Parse a `limit` query value the way the browser client does: a leading
/// integer (after optional whitespace and sign) is taken, anything else falls
/// back to `default`. The result is clamped to `[1, max]`.
pub fn parse_history_limit(raw: Option<&str>, default: usize, max: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };

    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1i64, &trimmed[1..]),
        Some(b'+') => (1i64, &trimmed[1..]),
        _ => (1i64, trimmed),
    };
    let prefix_len = digits.bytes().take_while(|b| b.is_ascii_digit()).count();
    if prefix_len == 0 {
        return default;
    }

    let value = digits[..prefix_len]
        .parse::<i64>()
        .map(|v| v * sign)
        .unwrap_or(if sign < 0 { i64::MIN } else { i64::MAX });

    value.clamp(1, max as i64) as usize
}

/// Summary of a newest-first history list
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub best_top_set_weight: f64,
    pub latest_top_set_weight: f64,
    pub latest_est1rm: f64,
    pub sessions: usize,
}

impl HistoryStats {
    /// `None` for an empty history
    pub fn from_history(entries: &[WorkoutEntry]) -> Option<Self> {
        let latest = entries.first()?;
        let best = entries
            .iter()
            .map(|e| e.derived.top_set_weight)
            .fold(f64::MIN, f64::max);

        Some(HistoryStats {
            best_top_set_weight: best,
            latest_top_set_weight: latest.derived.top_set_weight,
            latest_est1rm: latest.derived.est1rm,
            sessions: entries.len(),
        })
    }
}
