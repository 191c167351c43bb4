//! Sensor and actuator models
//!
//! Each model produces one tick of readings for its domain and, where other
//! models depend on it, a derived stimulus. The engine threads those stimuli
//! explicitly between model calls:
//!
//! - [`EnvironmentalModel`]: diurnal temperature and humidity, smoothed
//! - [`TreeBiometricsModel`]: tree strain, yields the tree movement intensity
//! - [`VisitorDetectionModel`]: LiDAR presence, yields per-zone visitor activity
//! - [`EngagementModel`]: engagement analytics derived from active detections
//! - [`AudioModel`]: speaker volume reacting to [`Stimuli`], smoothed
//! - [`LightingModel`]: LED color reacting to [`Stimuli`], instantaneous
//!
//! Every random draw goes through a [`NoiseSource`].

pub mod audio;
pub mod engagement;
pub mod environmental;
pub mod lighting;
pub mod noise;
pub mod trees;
pub mod visitors;

pub use audio::{AudioModel, AUDIO_SMOOTHING};
pub use engagement::EngagementModel;
pub use environmental::{diurnal_base_temperature, EnvironmentalModel, ENVIRONMENT_SMOOTHING};
pub use lighting::LightingModel;
pub use noise::{CenteredNoise, NoiseSource, SeededNoise};
pub use trees::{TreeBiometricsModel, TreeTick};
pub use visitors::{VisitorDetectionModel, VisitorTick};

use std::collections::BTreeMap;

use crate::types::ZoneId;

/// Stimuli consumed by the actuator models
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stimuli {
    /// Tree movement intensity of the current tick
    pub tree_movement_intensity: f64,
    /// Visitor activity per zone of the current tick
    pub zone_visitor_activity: BTreeMap<ZoneId, u32>,
}

impl Stimuli {
    /// Visitor activity of `zone`, zero when the zone reported nothing
    pub fn visitor_activity(&self, zone: ZoneId) -> u32 {
        self.zone_visitor_activity.get(&zone).copied().unwrap_or(0)
    }
}

/// First-order exponential moving average step
///
/// Closes `alpha` of the gap between `prior` and `target`. A missing prior is a
/// cold start and yields the target itself.
pub fn smooth_toward(prior: Option<f64>, target: f64, alpha: f64) -> f64 {
    match prior {
        Some(prior) => prior + alpha * (target - prior),
        None => target,
    }
}

/// Round to a fixed number of decimals for emitted readings
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
