//! Append-only workout log.
//!
//! Workouts are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Entries are never rewritten.

use crate::{Result, WorkoutEntry};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// JSONL-based workout log with file locking
#[derive(Clone, Debug)]
pub struct JsonlWorkoutLog {
    path: PathBuf,
}

impl JsonlWorkoutLog {
    /// Create a new log handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append one entry as a single JSON line under an exclusive lock
    pub fn append(&self, entry: &WorkoutEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        // Terminate a torn line left by an interrupted write
        let torn = ends_mid_line(&mut file)?;

        let mut writer = std::io::BufWriter::new(&file);
        if torn {
            tracing::warn!("Workout log {:?} ends mid-line, starting a new line", self.path);
            writer.write_all(b"\n")?;
        }
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Appended workout {} {} to log",
            entry.partition_key(),
            entry.sort_key()
        );
        Ok(())
    }

    /// Read every entry in the log, in append order
    pub fn read_all(&self) -> Result<Vec<WorkoutEntry>> {
        read_workouts(&self.path)
    }
}

fn ends_mid_line(file: &mut File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read all workouts from a log file
///
/// Lines that fail to parse are logged and skipped.
pub fn read_workouts(path: &Path) -> Result<Vec<WorkoutEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse workout at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} workouts from {:?}", entries.len(), path);
    Ok(entries)
}
