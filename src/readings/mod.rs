//! Reading records and the per-tick dataset
//!
//! Each reading kind is a fixed-shape record; the [`Dataset`] is the typed
//! aggregate handed to sinks once per tick.

pub mod dataset;
pub mod records;

pub use dataset::{Dataset, DatasetMetadata, DatasetSummary, TickStats};
pub use records::{
    AudioSystem, EnvironmentalReading, LightingSystem, TreeBiometrics, UserEngagement,
    VisitorDetection,
};
