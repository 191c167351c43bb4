//! Tick scheduling
//!
//! The scheduler drives the engine on a fixed cadence. Each iteration runs one
//! tick to completion, hands the dataset to the sink, records it in the
//! bounded history and writes a backup snapshot when one is due. It then
//! sleeps for whatever is left of the interval, never less than
//! [`MIN_TICK_SLEEP`].
//!
//! The only suspension point is that sleep, so a shutdown request is observed
//! between ticks and never interrupts one. On shutdown the final dump is
//! written before the run statistics are returned.

use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, instrument};

use crate::readings::Dataset;
use crate::simulation::{
    BackupSnapshot, DatasetHistory, DatasetSink, ErrorHandler, FinalSnapshot, InstallationEngine,
    RunStatistics, SessionInfo, SimulationClock, SimulationResult, SnapshotWriter,
};
use crate::types::SimulationConfig;
use crate::{perf_span, sim_event};

/// Shortest pause between two ticks
pub const MIN_TICK_SLEEP: Duration = Duration::from_millis(100);

/// Pause after a tick that took `elapsed` to process
///
/// Keeps ticks `interval` apart while processing is faster than the interval,
/// and never drops below [`MIN_TICK_SLEEP`] when it is not.
pub fn compute_sleep(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed).max(MIN_TICK_SLEEP)
}

/// Cadence and retention settings of a scheduler
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Target distance between tick starts
    pub interval: Duration,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
    /// Write a backup snapshot every this many ticks
    pub snapshot_every: u64,
    /// Datasets retained in memory
    pub history_capacity: usize,
    /// Datasets included in each snapshot file
    pub recent_in_snapshot: usize,
}

impl SchedulerConfig {
    /// Scheduler settings of a simulation configuration
    pub fn from_simulation_config(config: &SimulationConfig) -> Self {
        Self {
            interval: config.interval(),
            max_ticks: config.max_ticks,
            snapshot_every: config.snapshot_every.max(1),
            history_capacity: config.history_capacity,
            recent_in_snapshot: config.recent_in_snapshot,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from_simulation_config(&SimulationConfig::default())
    }
}

/// Drives an [`InstallationEngine`] on a wall-clock cadence
#[derive(Debug)]
pub struct Scheduler<S: DatasetSink> {
    engine: InstallationEngine,
    clock: SimulationClock,
    sink: S,
    config: SchedulerConfig,
    history: DatasetHistory,
    snapshots: Option<SnapshotWriter>,
    error_handler: ErrorHandler,
    stats: RunStatistics,
    started: Instant,
}

impl<S: DatasetSink> Scheduler<S> {
    /// Create a scheduler from explicit parts
    pub fn new(
        engine: InstallationEngine,
        clock: SimulationClock,
        sink: S,
        config: SchedulerConfig,
        snapshots: Option<SnapshotWriter>,
    ) -> Self {
        Self {
            engine,
            clock,
            sink,
            history: DatasetHistory::new(config.history_capacity),
            config,
            snapshots,
            error_handler: ErrorHandler::new(),
            stats: RunStatistics::new(Utc::now()),
            started: Instant::now(),
        }
    }

    /// Create a scheduler, engine and clock from a simulation configuration
    #[instrument(skip_all)]
    pub fn from_config(config: &SimulationConfig, sink: S) -> SimulationResult<Self> {
        config.validate()?;
        let clock = SimulationClock::from_config(config)?;
        let engine = InstallationEngine::new(config, clock.current_time())?;
        let snapshots = config.output.as_deref().map(SnapshotWriter::new);

        let scheduler_config = SchedulerConfig::from_simulation_config(config);
        Ok(Self::new(engine, clock, sink, scheduler_config, snapshots))
    }

    /// The engine being driven
    pub fn engine(&self) -> &InstallationEngine {
        &self.engine
    }

    /// Recent datasets
    pub fn history(&self) -> &DatasetHistory {
        &self.history
    }

    /// Statistics of the run so far
    pub fn statistics(&self) -> &RunStatistics {
        &self.stats
    }

    /// The dataset sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Whether the configured tick limit has been reached
    pub fn limit_reached(&self) -> bool {
        self.config.max_ticks.is_some_and(|max| self.stats.iterations >= max)
    }

    fn snapshot_due(&self) -> bool {
        self.snapshots.is_some() && self.stats.iterations % self.config.snapshot_every == 0
    }

    /// Run one tick: assemble, deliver, record and snapshot if due
    pub fn tick_once(&mut self) -> SimulationResult<()> {
        let span = perf_span!("tick", iteration = self.stats.iterations + 1);
        let _enter = span.enter();

        let now = self.clock.next_tick_time();
        let dataset = self.engine.tick(now);
        self.stats.record_tick(*dataset.stats());

        let sink = &mut self.sink;
        let delivered = self
            .error_handler
            .execute_with_recovery(|| sink.accept(&dataset), "delivering dataset to sink")?;
        if delivered.is_none() {
            self.stats.record_sink_failure();
        }

        self.history.push(dataset);

        if self.snapshot_due() {
            self.write_backup()?;
        }
        Ok(())
    }

    fn write_backup(&mut self) -> SimulationResult<()> {
        let Some(writer) = &self.snapshots else {
            return Ok(());
        };
        let Some(latest) = self.history.latest() else {
            return Ok(());
        };

        let backup = BackupSnapshot {
            last_update: latest.timestamp(),
            runtime_seconds: self.started.elapsed().as_secs_f64(),
            total_iterations: self.stats.iterations,
            recent_datasets: self.history.recent(self.config.recent_in_snapshot),
        };

        let written = self
            .error_handler
            .execute_with_recovery(|| writer.write_backup(&backup), "backup snapshot")?;
        if let Some(path) = &written {
            sim_event!(
                info,
                path = %path.display(),
                iterations = self.stats.iterations,
                "backup snapshot written"
            );
        }
        self.stats.record_snapshot(written.is_some());
        Ok(())
    }

    fn write_final(&mut self) -> SimulationResult<()> {
        let Some(writer) = &self.snapshots else {
            return Ok(());
        };
        if self.history.is_empty() {
            return Ok(());
        }

        let dump = FinalSnapshot {
            session_info: SessionInfo {
                session_id: self.stats.session_id.to_string(),
                start_time: self.stats.started_at,
                end_time: Utc::now(),
                total_iterations: self.stats.iterations,
                final_stats: self.engine.state().stats,
            },
            recent_data: self.history.recent(self.config.recent_in_snapshot),
        };

        let written = self
            .error_handler
            .execute_with_recovery(|| writer.write_final(&dump), "final snapshot")?;
        if let Some(path) = written {
            eprintln!("Session data saved to: {}", path.display());
        }
        Ok(())
    }

    /// Run until `shutdown` resolves or the tick limit is reached
    ///
    /// Returns the statistics of the run. Only non-recoverable errors end the
    /// run early.
    pub async fn run_until<F>(&mut self, shutdown: F) -> SimulationResult<RunStatistics>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.started = Instant::now();
        self.stats = RunStatistics::new(Utc::now());
        let mut interrupted = false;

        info!(
            session = %self.stats.session_id,
            interval_secs = self.config.interval.as_secs_f64(),
            max_ticks = ?self.config.max_ticks,
            "scheduler started"
        );

        loop {
            let tick_started = Instant::now();
            self.tick_once()?;

            if self.limit_reached() {
                break;
            }

            let sleep = compute_sleep(self.config.interval, tick_started.elapsed());
            sim_event!(debug, sleep_ms = sleep.as_millis() as u64, "sleeping until next tick");

            tokio::select! {
                _ = tokio::time::sleep(sleep) => {}
                _ = &mut shutdown => {
                    interrupted = true;
                    break;
                }
            }
        }

        self.finish(interrupted)
    }

    fn finish(&mut self, interrupted: bool) -> SimulationResult<RunStatistics> {
        if let Err(error) = self.sink.flush() {
            self.error_handler.handle_error(&error, "flushing sink");
            self.stats.record_sink_failure();
        }
        self.write_final()?;

        self.stats.finish(Utc::now(), self.started.elapsed(), interrupted);
        info!(
            iterations = self.stats.iterations,
            interrupted,
            runtime_secs = self.stats.runtime.as_secs_f64(),
            "scheduler stopped"
        );
        Ok(self.stats.clone())
    }

    /// Produce a single dataset and write it to the snapshot file, if configured
    ///
    /// The dataset bypasses the sink and the history.
    pub fn single_snapshot(&mut self) -> SimulationResult<Dataset> {
        let now = self.clock.next_tick_time();
        let dataset = self.engine.tick(now);
        self.stats.record_tick(*dataset.stats());

        if let Some(writer) = &self.snapshots {
            let written = self
                .error_handler
                .execute_with_recovery(|| writer.write_snapshot(&dataset), "single snapshot")?;
            if let Some(path) = &written {
                eprintln!("Snapshot saved to {}", path.display());
            }
            self.stats.record_snapshot(written.is_some());
        }
        Ok(dataset)
    }
}
