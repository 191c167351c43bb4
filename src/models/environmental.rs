//! Environmental model
//!
//! Diurnal temperature and humidity per zone, smoothed with a first-order
//! exponential moving average so that consecutive readings carry thermal and
//! hygric inertia.

use chrono::{DateTime, Timelike, Utc};
use std::f64::consts::PI;
use tracing::trace;

use crate::models::{round_to, smooth_toward, NoiseSource};
use crate::readings::EnvironmentalReading;
use crate::simulation::EnvironmentState;
use crate::zones::ZoneRegistry;

/// Fraction of the gap to the target closed per tick
pub const ENVIRONMENT_SMOOTHING: f64 = 0.1;

/// Humidity before zone offsets, in percent
pub const BASE_HUMIDITY: f64 = 60.0;

/// Bounds of every humidity value
pub const HUMIDITY_RANGE: (f64, f64) = (20.0, 95.0);

/// Half-width of the tick-wide temperature variation
const TEMPERATURE_VARIATION: f64 = 0.5;

/// Diurnal base temperature for an hour of the day
///
/// Peaks at 23 °C at noon and bottoms out at 7 °C at midnight.
pub fn diurnal_base_temperature(hour: u32) -> f64 {
    15.0 + 8.0 * ((hour as f64 - 6.0) * PI / 12.0).sin()
}

/// Temperature and humidity per zone
#[derive(Debug, Clone)]
pub struct EnvironmentalModel {
    smoothing: f64,
}

impl EnvironmentalModel {
    /// Create the model with the standard smoothing factor
    pub fn new() -> Self {
        Self { smoothing: ENVIRONMENT_SMOOTHING }
    }

    /// Produce one reading per zone and update the smoothing caches
    pub fn tick(
        &self,
        now: DateTime<Utc>,
        registry: &ZoneRegistry,
        state: &mut EnvironmentState,
        noise: &mut dyn NoiseSource,
    ) -> Vec<EnvironmentalReading> {
        let base_temp = diurnal_base_temperature(now.hour());
        // Shared by every zone this tick
        let variation = noise.uniform(-TEMPERATURE_VARIATION, TEMPERATURE_VARIATION);

        registry
            .iter()
            .map(|zone| {
                let climate = zone.id.microclimate();
                let target_temp = base_temp + variation + climate.temperature_c;
                let target_humidity = (BASE_HUMIDITY + climate.humidity_percent)
                    .clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1);

                let temperature =
                    smooth_toward(state.temperature(zone.id), target_temp, self.smoothing);
                let humidity = smooth_toward(state.humidity(zone.id), target_humidity, self.smoothing)
                    .clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1);

                state.record(zone.id, temperature, humidity);
                trace!(zone = %zone.id, temperature, humidity, "environment updated");

                EnvironmentalReading {
                    timestamp: now,
                    zone: zone.id,
                    temperature_c: round_to(temperature, 1),
                    humidity_percent: round_to(humidity, 1),
                }
            })
            .collect()
    }
}

impl Default for EnvironmentalModel {
    fn default() -> Self {
        Self::new()
    }
}
