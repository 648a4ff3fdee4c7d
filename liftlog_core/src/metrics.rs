//! Derived metrics: top set and estimated one-rep max.
//!
//! - Top set: heaviest set, ties broken by more reps, first one wins a full tie
//! - Est1RM: Epley formula, `weight * (1 + reps / 30)`
//!
//! Both weights and the estimate are rounded half-away-from-zero to two
//! decimals.

use crate::types::{DerivedMetrics, Set};

/// Round half-away-from-zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Select the top set: max weight, then max reps, earliest on a full tie.
pub fn top_set(sets: &[Set]) -> Option<&Set> {
    let mut iter = sets.iter();
    let first = iter.next()?;
    Some(iter.fold(first, |best, current| {
        if current.weight > best.weight
            || (current.weight == best.weight && current.reps > best.reps)
        {
            current
        } else {
            best
        }
    }))
}

/// Epley estimate of the one-repetition maximum.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    round2(weight * (1.0 + f64::from(reps) / 30.0))
}

/// Compute the metrics attached to a workout at creation time.
///
/// Returns `None` for an empty set list.
pub fn derive_metrics(sets: &[Set]) -> Option<DerivedMetrics> {
    let top = top_set(sets)?;
    Some(DerivedMetrics {
        top_set_weight: top.weight,
        top_set_reps: top.reps,
        est1rm: estimate_one_rep_max(top.weight, top.reps),
    })
}
