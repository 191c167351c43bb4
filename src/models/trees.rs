//! Tree biometrics model
//!
//! Strain gauges on every tree follow a slow shared oscillation, phase-shifted
//! by the tree's index, plus per-axis jitter. The model also reduces the
//! readings to a single movement intensity that drives the actuators.

use chrono::{DateTime, Utc};

use crate::models::{round_to, NoiseSource};
use crate::readings::TreeBiometrics;
use crate::types::DeviceId;
use crate::zones::ZoneRegistry;

/// Amplitude of the shared sway, in millimetres
const SWAY_AMPLITUDE: f64 = 0.1;

/// Angular frequency of the sway, in radians per second
const SWAY_FREQUENCY: f64 = 0.1;

/// Ratio of Y-axis to X-axis sway
const Y_AXIS_RATIO: f64 = 0.6;

const X_JITTER: f64 = 0.05;
const Y_JITTER: f64 = 0.03;

/// Movement intensity reported when no tree produced a reading
pub const BASELINE_MOVEMENT_INTENSITY: f64 = 0.1;

/// Output of one tree biometrics tick
#[derive(Debug, Clone)]
pub struct TreeTick {
    /// One reading per instrumented tree
    pub readings: Vec<TreeBiometrics>,
    /// Mean of `|strain_x| + |strain_y|` over every tree
    pub movement_intensity: f64,
}

/// Strain readings for every instrumented tree
#[derive(Debug, Clone, Default)]
pub struct TreeBiometricsModel;

impl TreeBiometricsModel {
    /// Create the model
    pub fn new() -> Self {
        Self
    }

    /// Shared sway of tree `index` at `unix_time` seconds
    pub fn natural_sway(unix_time: f64, index: usize) -> f64 {
        SWAY_AMPLITUDE * (SWAY_FREQUENCY * unix_time + index as f64).sin()
    }

    /// Produce one reading per tree and the aggregate movement intensity
    pub fn tick(
        &self,
        now: DateTime<Utc>,
        registry: &ZoneRegistry,
        noise: &mut dyn NoiseSource,
    ) -> TreeTick {
        let unix_time = now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) * 1e-9;
        let mut readings = Vec::with_capacity(registry.total_tree_count());
        let mut total_movement = 0.0;

        for zone in registry.iter() {
            for index in 0..zone.tree_count {
                let sway = Self::natural_sway(unix_time, index);
                let strain_x = sway + noise.uniform(-X_JITTER, X_JITTER);
                let strain_y = sway * Y_AXIS_RATIO + noise.uniform(-Y_JITTER, Y_JITTER);
                total_movement += strain_x.abs() + strain_y.abs();

                readings.push(TreeBiometrics {
                    timestamp: now,
                    tree_id: DeviceId::tree(zone.id, index),
                    strain_x_mm: round_to(strain_x, 4),
                    strain_y_mm: round_to(strain_y, 4),
                });
            }
        }

        let movement_intensity = if readings.is_empty() {
            BASELINE_MOVEMENT_INTENSITY
        } else {
            total_movement / readings.len() as f64
        };

        TreeTick { readings, movement_intensity }
    }
}
