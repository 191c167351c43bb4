//! Tests for the tick scheduler
//!
//! Cadence tests run on tokio's paused clock, so a 30 second interval costs no
//! real time and tick spacing is exact.

use chrono::{DateTime, TimeZone, Utc};
use forest_installation_simulator::readings::Dataset;
use forest_installation_simulator::simulation::{
    BackupSnapshot, DatasetSink, FinalSnapshot, JsonLinesSink, NullSink, Scheduler,
    SimulationError, SimulationResult,
};
use forest_installation_simulator::types::SimulationConfig;
use std::time::Duration;
use tempfile::TempDir;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn stepped_config(interval_seconds: u64, max_ticks: Option<u64>) -> SimulationConfig {
    SimulationConfig {
        interval_seconds,
        max_ticks,
        seed: Some(42),
        start_time: Some(start()),
        live_display: false,
        ..Default::default()
    }
}

/// Records when each dataset arrived, on tokio's clock
#[derive(Debug, Default)]
struct RecordingSink {
    arrivals: Vec<tokio::time::Instant>,
    timestamps: Vec<DateTime<Utc>>,
}

impl DatasetSink for RecordingSink {
    fn accept(&mut self, dataset: &Dataset) -> SimulationResult<()> {
        self.arrivals.push(tokio::time::Instant::now());
        self.timestamps.push(dataset.timestamp());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FailingSink {
    attempts: u64,
}

impl DatasetSink for FailingSink {
    fn accept(&mut self, _dataset: &Dataset) -> SimulationResult<()> {
        self.attempts += 1;
        Err(SimulationError::sink_error("downstream unavailable"))
    }
}

#[tokio::test(start_paused = true)]
async fn test_ticks_follow_the_interval() {
    let config = stepped_config(30, Some(4));
    let mut scheduler = Scheduler::from_config(&config, RecordingSink::default()).unwrap();

    let stats = scheduler.run_until(std::future::pending()).await.unwrap();

    assert_eq!(stats.iterations, 4);
    assert!(!stats.interrupted);

    let sink = scheduler.into_sink();
    assert_eq!(sink.arrivals.len(), 4);
    for pair in sink.arrivals.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= Duration::from_secs(30), "gap {:?} shorter than the interval", gap);
        assert!(gap < Duration::from_millis(30_010), "gap {:?} drifted", gap);
    }

    // the stepped clock stamps ticks one interval apart
    let expected: Vec<DateTime<Utc>> =
        (0..4).map(|i| start() + chrono::Duration::seconds(30 * i)).collect();
    assert_eq!(sink.timestamps, expected);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_is_observed_between_ticks() {
    let config = stepped_config(30, None);
    let mut scheduler = Scheduler::from_config(&config, RecordingSink::default()).unwrap();

    // ticks run at 0, 30, 60 and 90 seconds; the interrupt lands at 95
    let shutdown = tokio::time::sleep(Duration::from_secs(95));
    let stats = scheduler.run_until(shutdown).await.unwrap();

    assert!(stats.interrupted);
    assert_eq!(stats.iterations, 4);
    assert_eq!(scheduler.history().len(), 4);
    assert!(stats.ended_at.is_some());
    assert!(stats.summary().starts_with("Real-time simulation stopped by user"));
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_writes_final_dump() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("interrupted");
    let config = SimulationConfig {
        output: Some(base.to_string_lossy().into_owned()),
        ..stepped_config(30, None)
    };
    let mut scheduler = Scheduler::from_config(&config, NullSink).unwrap();

    // lands in the sleep after the fourth tick
    let shutdown = tokio::time::sleep(Duration::from_secs(100));
    let stats = scheduler.run_until(shutdown).await.unwrap();

    assert!(stats.interrupted);
    assert_eq!(stats.iterations, 4);
    // the backup cadence of 10 ticks was never reached
    assert_eq!(stats.snapshots_written, 0);
    assert!(!dir.path().join("interrupted_backup.json").exists());

    let final_json = std::fs::read_to_string(dir.path().join("interrupted_final.json")).unwrap();
    let dump: FinalSnapshot = serde_json::from_str(&final_json).unwrap();
    assert_eq!(dump.session_info.session_id, stats.session_id.to_string());
    assert_eq!(dump.session_info.total_iterations, 4);
    assert_eq!(dump.recent_data.len(), 4);
    assert_eq!(dump.recent_data[3].timestamp(), start() + chrono::Duration::seconds(90));
    assert_eq!(Some(dump.session_info.final_stats), stats.last_stats);
}

#[tokio::test(start_paused = true)]
async fn test_tick_limit_stops_the_run() {
    let config = stepped_config(5, Some(3));
    let mut scheduler = Scheduler::from_config(&config, NullSink).unwrap();

    let stats = scheduler.run_until(std::future::pending()).await.unwrap();

    assert_eq!(stats.iterations, 3);
    assert!(!stats.interrupted);
    assert!(scheduler.limit_reached());
    assert_eq!(stats.last_stats, Some(*scheduler.history().latest().unwrap().stats()));
    // two 5 s sleeps, none after the last tick
    assert!(stats.runtime >= Duration::from_secs(10));
    assert!(stats.runtime < Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn test_history_keeps_the_latest_datasets() {
    let config = stepped_config(1, Some(12));
    let mut scheduler = Scheduler::from_config(&config, NullSink).unwrap();

    scheduler.run_until(std::future::pending()).await.unwrap();

    let history = scheduler.history();
    assert_eq!(history.len(), 10);
    let recent = history.recent(5);
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].timestamp(), start() + chrono::Duration::seconds(7));
    assert_eq!(recent[4].timestamp(), start() + chrono::Duration::seconds(11));
}

#[tokio::test(start_paused = true)]
async fn test_backup_and_final_snapshots() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("session");
    let config = SimulationConfig {
        output: Some(base.to_string_lossy().into_owned()),
        ..stepped_config(30, Some(10))
    };
    let mut scheduler = Scheduler::from_config(&config, NullSink).unwrap();

    let stats = scheduler.run_until(std::future::pending()).await.unwrap();
    assert_eq!(stats.snapshots_written, 1);
    assert_eq!(stats.snapshot_failures, 0);

    let backup_json = std::fs::read_to_string(dir.path().join("session_backup.json")).unwrap();
    let backup: BackupSnapshot = serde_json::from_str(&backup_json).unwrap();
    assert_eq!(backup.total_iterations, 10);
    assert_eq!(backup.recent_datasets.len(), 5);
    assert_eq!(backup.last_update, start() + chrono::Duration::seconds(270));
    assert_eq!(backup.recent_datasets[4].timestamp(), backup.last_update);

    let final_json = std::fs::read_to_string(dir.path().join("session_final.json")).unwrap();
    let dump: FinalSnapshot = serde_json::from_str(&final_json).unwrap();
    assert_eq!(dump.session_info.session_id, stats.session_id.to_string());
    assert_eq!(dump.session_info.total_iterations, 10);
    assert_eq!(dump.recent_data.len(), 5);
    assert_eq!(
        dump.session_info.final_stats.total_visitors_detected,
        stats.last_stats.unwrap().total_visitors_detected
    );
}

#[tokio::test(start_paused = true)]
async fn test_backups_follow_custom_cadence() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("cadence");
    let config = SimulationConfig {
        output: Some(base.to_string_lossy().into_owned()),
        snapshot_every: 2,
        ..stepped_config(1, Some(5))
    };
    let mut scheduler = Scheduler::from_config(&config, NullSink).unwrap();

    let stats = scheduler.run_until(std::future::pending()).await.unwrap();

    // iterations 2 and 4
    assert_eq!(stats.snapshots_written, 2);
    let backup_json = std::fs::read_to_string(dir.path().join("cadence_backup.json")).unwrap();
    let backup: BackupSnapshot = serde_json::from_str(&backup_json).unwrap();
    assert_eq!(backup.total_iterations, 4);
    assert_eq!(backup.recent_datasets.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_failures_do_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("missing").join("session");
    let config = SimulationConfig {
        output: Some(base.to_string_lossy().into_owned()),
        snapshot_every: 1,
        ..stepped_config(1, Some(3))
    };
    let mut scheduler = Scheduler::from_config(&config, RecordingSink::default()).unwrap();

    let stats = scheduler.run_until(std::future::pending()).await.unwrap();

    assert_eq!(stats.iterations, 3);
    assert_eq!(stats.snapshots_written, 0);
    assert_eq!(stats.snapshot_failures, 3);
    assert_eq!(scheduler.history().len(), 3);
    assert_eq!(scheduler.sink().arrivals.len(), 3);
    assert!(!dir.path().join("missing").exists());
}

#[tokio::test(start_paused = true)]
async fn test_sink_failures_do_not_stop_the_run() {
    let config = stepped_config(1, Some(3));
    let mut scheduler = Scheduler::from_config(&config, FailingSink::default()).unwrap();

    let stats = scheduler.run_until(std::future::pending()).await.unwrap();

    assert_eq!(stats.iterations, 3);
    assert_eq!(stats.sink_failures, 3);
    assert_eq!(scheduler.sink().attempts, 3);
    assert_eq!(scheduler.history().len(), 3);
    assert!(stats.summary().contains("Sink failures: 3"));
}

#[tokio::test(start_paused = true)]
async fn test_fan_out_keeps_healthy_sinks_fed() {
    let config = stepped_config(1, Some(2));
    let sinks: Vec<Box<dyn DatasetSink>> = vec![
        Box::new(FailingSink::default()),
        Box::new(JsonLinesSink::new(Vec::<u8>::new())),
    ];
    let mut scheduler = Scheduler::from_config(&config, sinks).unwrap();

    let stats = scheduler.run_until(std::future::pending()).await.unwrap();

    assert_eq!(stats.sink_failures, 2);
    assert_eq!(stats.iterations, 2);
}

#[tokio::test(start_paused = true)]
async fn test_json_lines_output_per_tick() {
    let config = stepped_config(1, Some(3));
    let mut scheduler =
        Scheduler::from_config(&config, JsonLinesSink::new(Vec::<u8>::new())).unwrap();

    scheduler.run_until(std::future::pending()).await.unwrap();

    let sink = scheduler.into_sink();
    assert_eq!(sink.lines_written(), 3);
    let output = String::from_utf8(sink.into_inner()).unwrap();
    let datasets: Vec<Dataset> =
        output.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(datasets.len(), 3);
    assert_eq!(datasets[2].timestamp(), start() + chrono::Duration::seconds(2));
    assert!(datasets.iter().all(|d| d.data_point_count() == 33));
}

/// Sleeps in `accept` to simulate a tick slower than the interval
#[derive(Debug, Default)]
struct SlowSink {
    arrivals: Vec<std::time::Instant>,
}

impl DatasetSink for SlowSink {
    fn accept(&mut self, _dataset: &Dataset) -> SimulationResult<()> {
        self.arrivals.push(std::time::Instant::now());
        std::thread::sleep(Duration::from_millis(1_200));
        Ok(())
    }
}

#[tokio::test]
async fn test_slow_ticks_still_sleep_the_minimum() {
    let config = stepped_config(1, Some(2));
    let mut scheduler = Scheduler::from_config(&config, SlowSink::default()).unwrap();

    scheduler.run_until(std::future::pending()).await.unwrap();

    let arrivals = &scheduler.sink().arrivals;
    assert_eq!(arrivals.len(), 2);
    // 1.2 s of processing plus the 100 ms floor, never back-to-back
    assert!(arrivals[1] - arrivals[0] >= Duration::from_millis(1_300));
}
