//! Snapshot files
//!
//! Best-effort JSON dumps of recent datasets, written next to a configured
//! output base: `{base}_backup.json` periodically, `{base}_final.json` on
//! shutdown and `{base}_snapshot.json` in single snapshot mode. Files are
//! overwritten on every write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::readings::{Dataset, TickStats};
use crate::simulation::{SimulationError, SimulationResult};

/// Periodic backup of the running session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    /// Timestamp of the latest tick
    pub last_update: DateTime<Utc>,
    /// Wall-clock seconds since the scheduler started
    pub runtime_seconds: f64,
    /// Ticks completed so far
    pub total_iterations: u64,
    /// Most recent datasets, oldest first
    pub recent_datasets: Vec<Dataset>,
}

/// Session summary of the final dump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Identifier of the run
    pub session_id: String,
    /// When the scheduler started
    pub start_time: DateTime<Utc>,
    /// When the scheduler stopped
    pub end_time: DateTime<Utc>,
    /// Ticks completed
    pub total_iterations: u64,
    /// Statistics of the last tick
    pub final_stats: TickStats,
}

/// Dump written when the session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSnapshot {
    /// Session summary
    pub session_info: SessionInfo,
    /// Most recent datasets, oldest first
    pub recent_data: Vec<Dataset>,
}

/// Writes snapshot files under an output base path
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    base: String,
}

impl SnapshotWriter {
    /// Create a writer for the output base `base`, e.g. `data/run1`
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Output base the file names derive from
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Path of the periodic backup file
    pub fn backup_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_backup.json", self.base))
    }

    /// Path of the final dump
    pub fn final_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_final.json", self.base))
    }

    /// Path of the single snapshot file
    pub fn snapshot_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_snapshot.json", self.base))
    }

    /// Overwrite the backup file
    pub fn write_backup(&self, backup: &BackupSnapshot) -> SimulationResult<PathBuf> {
        let path = self.backup_path();
        write_json(&path, backup)?;
        Ok(path)
    }

    /// Overwrite the final dump
    pub fn write_final(&self, dump: &FinalSnapshot) -> SimulationResult<PathBuf> {
        let path = self.final_path();
        write_json(&path, dump)?;
        Ok(path)
    }

    /// Overwrite the single snapshot file with one dataset
    pub fn write_snapshot(&self, dataset: &Dataset) -> SimulationResult<PathBuf> {
        let path = self.snapshot_path();
        write_json(&path, dataset)?;
        Ok(path)
    }
}

fn write_failure(path: &Path, error: impl fmt::Display) -> SimulationError {
    SimulationError::snapshot_error(format!("{}: {}", path.display(), error))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> SimulationResult<()> {
    let file = File::create(path).map_err(|e| write_failure(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| write_failure(path, e))?;
    writer.flush().map_err(|e| write_failure(path, e))?;

    debug!(path = %path.display(), "snapshot written");
    Ok(())
}
