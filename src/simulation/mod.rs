//! Simulation engine and control
//!
//! This module contains the engine that assembles one dataset per tick, the
//! state it owns, and everything that drives it over time: the clock, the
//! scheduler, the bounded history, snapshot files and dataset sinks.
//!
//! # Overview
//!
//! - **InstallationEngine**: runs every model in a fixed order and packages a [`Dataset`](crate::readings::Dataset)
//! - **SimulationState**: smoothing caches, engagement history and last-tick stats
//! - **Scheduler**: ticks the engine on a cadence until shutdown or a tick limit
//! - **SimulationClock**: wall-clock or stepped tick timestamps
//! - **DatasetSink**: live stats panel, JSON Lines output and fan-out
//! - **SimulationError**: error types and recovery handling
//!
//! # Usage Example
//!
//! ```rust
//! use forest_installation_simulator::simulation::*;
//! use forest_installation_simulator::types::*;
//! use chrono::{TimeZone, Utc};
//!
//! let config = SimulationConfig {
//!     seed: Some(7),
//!     start_time: Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()),
//!     ..Default::default()
//! };
//!
//! let mut scheduler = Scheduler::from_config(&config, NullSink).unwrap();
//! scheduler.tick_once().unwrap();
//! assert_eq!(scheduler.history().len(), 1);
//! assert_eq!(scheduler.history().latest().unwrap().data_point_count(), 33);
//! ```

pub mod clock;
pub mod engine;
pub mod error;
pub mod history;
pub mod logging;
pub mod scheduler;
pub mod sink;
pub mod snapshot;
pub mod state;
pub mod statistics;

// Re-export all public types for convenience
pub use clock::*;
pub use engine::*;
pub use error::*;
pub use history::*;
pub use logging::*;
pub use scheduler::*;
pub use sink::*;
pub use snapshot::*;
pub use state::*;
pub use statistics::*;
