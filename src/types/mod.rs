//! Core types and identifiers for the installation simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: flat string identifiers for every sensor and actuator
//! - **Enums**: zone identifiers and periods of the day
//! - **Configuration**: Simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use forest_installation_simulator::types::*;
//!
//! let tree = DeviceId::tree(ZoneId::Riverside, 1);
//! assert_eq!(tree.to_string(), "riverside_tree_01");
//!
//! let config = SimulationConfig {
//!     interval_seconds: 10,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
