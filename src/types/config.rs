//! Configuration structures for the installation simulator
//!
//! This module contains the simulation configuration structure, command line
//! arguments, configuration file loading and validation logic.

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Limits applied by [`SimulationConfig::validate`]
pub mod limits {
    /// Smallest accepted tick interval in seconds
    pub const MIN_INTERVAL_SECONDS: u64 = 1;

    /// Largest accepted tick interval in seconds, one day
    pub const MAX_INTERVAL_SECONDS: u64 = 86_400;

    /// Largest accepted visitor flow multiplier
    pub const MAX_FLOW_MULTIPLIER: f64 = 2.0;
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "forest-installation-simulator",
    version = "0.1.0",
    about = "Forest Interactive Installation - Data Simulator",
    long_about = "Generates synthetic, temporally-coherent telemetry for an interactive forest installation: environmental readings, tree strain, visitor detections, engagement metrics, and the audio/lighting response of each zone.

EXAMPLES:
    # Standard real-time mode (data every 30s)
    forest-installation-simulator

    # Fast real-time mode (data every 10s)
    forest-installation-simulator --interval 10

    # Real-time mode with periodic snapshot files
    forest-installation-simulator --output forest_logs --interval 20

    # A single snapshot for testing
    forest-installation-simulator --snapshot --output test_data

    # Reproducible run of 100 ticks starting at a fixed instant
    forest-installation-simulator --seed 42 --start-time 2024-06-01T12:00:00Z --ticks 100 --interval 1

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Use --print-config to generate a template configuration file."
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Interval between measurements in seconds
    #[arg(long, help = "Interval between measurements in seconds (default: 30)")]
    pub interval: Option<u64>,

    /// Base name for snapshot files
    #[arg(
        long,
        help = "Base name for snapshot files",
        long_help = "Base name for snapshot files. Periodic backups go to <output>_backup.json, the shutdown dump to <output>_final.json and single snapshots to <output>_snapshot.json."
    )]
    pub output: Option<String>,

    /// Disable the live statistics display
    #[arg(long, help = "Disable real-time display")]
    pub no_display: bool,

    /// Generate a single snapshot instead of running in real time
    #[arg(long, help = "Generate single snapshot instead of real-time mode")]
    pub snapshot: bool,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long, help = "Stop after this many ticks")]
    pub ticks: Option<u64>,

    /// Multiplier applied to every visitor detection probability
    #[arg(long, help = "Visitor flow multiplier (0.0-2.0)")]
    pub flow_multiplier: Option<f64>,

    /// Ticks between periodic backup snapshots
    #[arg(long, help = "Ticks between periodic backup snapshots")]
    pub snapshot_every: Option<u64>,

    /// Stream every dataset as a JSON line to this path
    #[arg(long, help = "Stream every dataset as JSON lines to this path")]
    pub jsonl: Option<String>,

    /// Run on a stepped clock starting at this instant
    #[arg(
        long,
        help = "Run on a stepped clock starting at this RFC 3339 instant",
        long_help = "Instead of reading the wall clock every tick, start simulated time at this RFC 3339 instant and advance it by the interval on every tick."
    )]
    pub start_time: Option<DateTime<Utc>>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Interval between ticks in seconds
    pub interval_seconds: Option<u64>,

    /// Base name for snapshot files
    pub output: Option<String>,

    /// Whether the live statistics panel is printed every tick
    pub live_display: Option<bool>,

    /// Generate a single snapshot and exit
    pub single_snapshot: Option<bool>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Stop after this many ticks
    pub max_ticks: Option<u64>,

    /// Multiplier applied to every visitor detection probability
    pub visitor_flow_multiplier: Option<f64>,

    /// Ticks between periodic backup snapshots
    pub snapshot_every: Option<u64>,

    /// Number of datasets kept in memory
    pub history_capacity: Option<usize>,

    /// Number of datasets written into each snapshot file
    pub recent_in_snapshot: Option<usize>,

    /// JSON lines output path
    pub jsonl_output: Option<String>,

    /// Start of a stepped clock
    pub start_time: Option<DateTime<Utc>>,
}

/// Configuration for the installation simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Interval between ticks in seconds
    pub interval_seconds: u64,

    /// Base name for snapshot files; no files are written when unset
    pub output: Option<String>,

    /// Whether the live statistics panel is printed every tick
    pub live_display: bool,

    /// Generate a single snapshot and exit
    pub single_snapshot: bool,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Stop after this many ticks; run until interrupted when unset
    pub max_ticks: Option<u64>,

    /// Multiplier applied to every visitor detection probability
    pub visitor_flow_multiplier: f64,

    /// Ticks between periodic backup snapshots
    pub snapshot_every: u64,

    /// Number of datasets kept in memory
    pub history_capacity: usize,

    /// Number of datasets written into each snapshot file
    pub recent_in_snapshot: usize,

    /// JSON lines output path
    pub jsonl_output: Option<String>,

    /// Start of a stepped clock; the wall clock is used when unset
    pub start_time: Option<DateTime<Utc>>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Tick interval is out of range
    #[error(
        "Interval must be between {min} and {max} seconds, got {0}",
        min = limits::MIN_INTERVAL_SECONDS,
        max = limits::MAX_INTERVAL_SECONDS
    )]
    InvalidInterval(u64),

    /// Visitor flow multiplier is out of range
    #[error("Visitor flow multiplier must be between 0.0 and {max}, got {0}", max = limits::MAX_FLOW_MULTIPLIER)]
    InvalidFlowMultiplier(f64),

    /// Snapshot cadence is invalid
    #[error("Snapshot cadence must be greater than 0, got {0}")]
    InvalidSnapshotCadence(u64),

    /// History capacity is invalid
    #[error("History capacity must be greater than 0, got {0}")]
    InvalidHistoryCapacity(usize),

    /// Snapshot window does not fit in the history
    #[error("Datasets per snapshot must be between 1 and the history capacity ({capacity}), got {value}")]
    InvalidSnapshotWindow {
        /// Requested number of datasets per snapshot
        value: usize,
        /// Configured history capacity
        capacity: usize,
    },

    /// A tick limit of zero would never produce data
    #[error("Tick limit must be greater than 0 when set")]
    InvalidTickLimit,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 30,
            output: None,
            live_display: true,
            single_snapshot: false,
            seed: None,
            max_ticks: None,
            visitor_flow_multiplier: 1.0,
            snapshot_every: 10,
            history_capacity: 10,
            recent_in_snapshot: 5,
            jsonl_output: None,
            start_time: None,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            interval_seconds: config_file.interval_seconds.unwrap_or(defaults.interval_seconds),
            output: config_file.output.or(defaults.output),
            live_display: config_file.live_display.unwrap_or(defaults.live_display),
            single_snapshot: config_file.single_snapshot.unwrap_or(defaults.single_snapshot),
            seed: config_file.seed.or(defaults.seed),
            max_ticks: config_file.max_ticks.or(defaults.max_ticks),
            visitor_flow_multiplier: config_file
                .visitor_flow_multiplier
                .unwrap_or(defaults.visitor_flow_multiplier),
            snapshot_every: config_file.snapshot_every.unwrap_or(defaults.snapshot_every),
            history_capacity: config_file.history_capacity.unwrap_or(defaults.history_capacity),
            recent_in_snapshot: config_file
                .recent_in_snapshot
                .unwrap_or(defaults.recent_in_snapshot),
            jsonl_output: config_file.jsonl_output.or(defaults.jsonl_output),
            start_time: config_file.start_time.or(defaults.start_time),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.interval {
            config.interval_seconds = value;
        }
        if let Some(value) = args.output {
            config.output = Some(value);
        }
        if args.no_display {
            config.live_display = false;
        }
        if args.snapshot {
            config.single_snapshot = true;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.ticks {
            config.max_ticks = Some(value);
        }
        if let Some(value) = args.flow_multiplier {
            config.visitor_flow_multiplier = value;
        }
        if let Some(value) = args.snapshot_every {
            config.snapshot_every = value;
        }
        if let Some(value) = args.jsonl {
            config.jsonl_output = Some(value);
        }
        if let Some(value) = args.start_time {
            config.start_time = Some(value);
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(limits::MIN_INTERVAL_SECONDS..=limits::MAX_INTERVAL_SECONDS)
            .contains(&self.interval_seconds)
        {
            return Err(ConfigValidationError::InvalidInterval(self.interval_seconds));
        }

        if !self.visitor_flow_multiplier.is_finite()
            || !(0.0..=limits::MAX_FLOW_MULTIPLIER).contains(&self.visitor_flow_multiplier)
        {
            return Err(ConfigValidationError::InvalidFlowMultiplier(self.visitor_flow_multiplier));
        }

        if self.snapshot_every == 0 {
            return Err(ConfigValidationError::InvalidSnapshotCadence(self.snapshot_every));
        }

        if self.history_capacity == 0 {
            return Err(ConfigValidationError::InvalidHistoryCapacity(self.history_capacity));
        }

        if self.recent_in_snapshot == 0 || self.recent_in_snapshot > self.history_capacity {
            return Err(ConfigValidationError::InvalidSnapshotWindow {
                value: self.recent_in_snapshot,
                capacity: self.history_capacity,
            });
        }

        if self.max_ticks == Some(0) {
            return Err(ConfigValidationError::InvalidTickLimit);
        }

        Ok(())
    }

    /// Tick interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}
