#![forbid(unsafe_code)]

//! Core domain model and business logic for liftlog.
//!
//! This crate provides:
//! - Domain types (sets, workout entries, exercise catalog entries)
//! - Validation and normalization of submissions
//! - Derived metrics (top set, estimated one-rep max)
//! - Persistence (JSONL workout log, exercise catalog file)
//! - The workout service used by the API and the CLI
//! - Client conveniences (drafts, routines, view state, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod validate;
pub mod metrics;
pub mod workout;
pub mod workout_log;
pub mod exercise_catalog;
pub mod store;
pub mod history;
pub mod service;
pub mod side_store;
pub mod draft;
pub mod routine;
pub mod view;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use config::Config;
pub use metrics::{derive_metrics, estimate_one_rep_max, round2, top_set};
pub use validate::{normalize_exercise_name, sanitize_exercise_name};
pub use store::{FileStore, WorkoutStore};
pub use history::HistoryStats;
pub use service::{ServiceSettings, WorkoutService};
pub use side_store::{FileSideStore, MemorySideStore, SideStore};
pub use draft::{Draft, DraftSet};
pub use routine::{Routine, RoutineBook};
pub use view::ViewState;
