//! Run statistics
//!
//! Counters for one scheduler run, reported when the run ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::readings::TickStats;

/// Statistics of one scheduler run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Unique identifier of the run
    pub session_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run stopped, if it has
    pub ended_at: Option<DateTime<Utc>>,
    /// Ticks completed
    pub iterations: u64,
    /// Datasets a sink failed to accept
    pub sink_failures: u64,
    /// Backup snapshots written
    pub snapshots_written: u64,
    /// Snapshot writes that failed
    pub snapshot_failures: u64,
    /// Statistics of the last tick
    pub last_stats: Option<TickStats>,
    /// Whether the run was stopped by an interrupt
    pub interrupted: bool,
    /// Wall-clock runtime
    pub runtime: Duration,
}

impl RunStatistics {
    /// Fresh statistics for a run starting at `started_at`
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at,
            ended_at: None,
            iterations: 0,
            sink_failures: 0,
            snapshots_written: 0,
            snapshot_failures: 0,
            last_stats: None,
            interrupted: false,
            runtime: Duration::ZERO,
        }
    }

    /// Record a completed tick
    pub fn record_tick(&mut self, stats: TickStats) {
        self.iterations += 1;
        self.last_stats = Some(stats);
    }

    /// Record a dataset a sink failed to accept
    pub fn record_sink_failure(&mut self) {
        self.sink_failures += 1;
    }

    /// Record the outcome of a snapshot write
    pub fn record_snapshot(&mut self, written: bool) {
        if written {
            self.snapshots_written += 1;
        } else {
            self.snapshot_failures += 1;
        }
    }

    /// Mark the run as finished
    pub fn finish(&mut self, ended_at: DateTime<Utc>, runtime: Duration, interrupted: bool) {
        self.ended_at = Some(ended_at);
        self.runtime = runtime;
        self.interrupted = interrupted;
    }

    /// Average wall-clock time per tick, in seconds
    pub fn average_tick_seconds(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.runtime.as_secs_f64() / self.iterations as f64
        }
    }

    /// Multi-line report printed when the run ends
    pub fn summary(&self) -> String {
        let mut report = String::new();
        if self.interrupted {
            report.push_str("Real-time simulation stopped by user\n");
        } else {
            report.push_str("Simulation finished\n");
        }
        report.push_str(&format!("   Session: {}\n", self.session_id));
        report.push_str(&format!("   Total runtime: {:.1}s\n", self.runtime.as_secs_f64()));
        report.push_str(&format!("   Total iterations: {}\n", self.iterations));
        if self.iterations > 0 {
            report.push_str(&format!(
                "   Average per tick: {:.1}s\n",
                self.average_tick_seconds()
            ));
        }

        if self.snapshots_written > 0 || self.snapshot_failures > 0 {
            report.push_str(&format!(
                "   Snapshots: {} written, {} failed\n",
                self.snapshots_written, self.snapshot_failures
            ));
        }
        if self.sink_failures > 0 {
            report.push_str(&format!("   Sink failures: {}\n", self.sink_failures));
        }
        if let Some(stats) = &self.last_stats {
            report.push_str(&format!(
                "   Last tick: {} visitors, {:.1}W, tree movement {:.3}\n",
                stats.total_visitors_detected,
                stats.total_power_consumption,
                stats.average_tree_movement
            ));
        }
        report
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
