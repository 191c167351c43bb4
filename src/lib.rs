//! Forest Installation Simulator
//!
//! Synthetic, temporally-coherent telemetry for an interactive forest
//! installation, used to exercise telemetry pipelines without real hardware.
//!
//! # Overview
//!
//! Every tick produces one [`Dataset`] covering all zones of the installation:
//! climate, tree strain, LiDAR visitor detections, derived engagement and the
//! reactive state of each zone's speaker and LED fixture. Readings are
//! correlated across domains: visitors and tree movement drive the audio and
//! lighting response, and climate and volume carry inertia from tick to tick.
//!
//! ## Key Features
//!
//! - **Stateful models**: exponential smoothing of temperature, humidity and volume
//! - **Correlation cascade**: visitor activity and tree movement feed the actuators
//! - **Injectable randomness**: seeded or deterministic noise for reproducible runs
//! - **Cadenced scheduling**: wall-clock ticks with best-effort snapshot files
//! - **Typed output**: fixed-shape records serialized to a stable JSON schema
//!
//! ## Quick Start
//!
//! ```rust
//! use forest_installation_simulator::*;
//! use chrono::{TimeZone, Utc};
//!
//! let config = SimulationConfig { seed: Some(42), ..Default::default() };
//! let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
//!
//! let mut engine = InstallationEngine::new(&config, start)?;
//! let dataset = engine.tick(start);
//! println!("{} visitors detected", dataset.stats().total_visitors_detected);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Zone and device identifiers, configuration
//! - [`zones`]: Zone population, microclimates and lighting palettes
//! - [`readings`]: Reading records and the per-tick dataset
//! - [`models`]: One model per domain, plus the noise source
//! - [`simulation`]: Engine, scheduler, sinks, snapshots and error handling
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │   Zones     │    │  Readings   │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Registry    │    │ Records     │
//! │ Config      │    │ Palettes    │    │ Dataset     │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                   ▲                   ▲
//!        │                   │                   │
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Models    │    │   Engine    │    │  Scheduler  │
//! │             │    │             │    │             │
//! │ Environment │◄───┤ State       │◄───┤ Clock       │
//! │ Visitors    │    │ Assembly    │    │ Sinks       │
//! │ Actuators   │    │             │    │ Snapshots   │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod models;
pub mod readings;
pub mod simulation;
pub mod types;
pub mod zones;

// Core types and identifiers
pub use types::{
    // Configuration
    CliArgs,
    ConfigError,
    ConfigValidationError,
    // Enums
    DayPeriod,
    // Identifiers
    DeviceId,
    DeviceKind,
    SimulationConfig,
    ZoneId,
};

// Zones
pub use zones::{Zone, ZoneRegistry};

// Readings
pub use readings::{
    AudioSystem, Dataset, DatasetMetadata, EnvironmentalReading, LightingSystem, TickStats,
    TreeBiometrics, UserEngagement, VisitorDetection,
};

// Models
pub use models::{CenteredNoise, NoiseSource, SeededNoise, Stimuli};

// Simulation types and functionality
pub use simulation::{
    DatasetSink, InstallationEngine, RunStatistics, Scheduler, SchedulerConfig, SimulationClock,
    SimulationError, SimulationResult, SimulationState,
};
