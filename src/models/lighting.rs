//! Lighting model
//!
//! Each zone's LED fixture reacts instantly to the time of day, the tree
//! movement intensity and the zone's visitors. Unlike audio and climate there
//! is no smoothing cache: visual feedback follows the stimuli tick for tick.

use chrono::{DateTime, Timelike, Utc};

use crate::models::Stimuli;
use crate::readings::LightingSystem;
use crate::types::{DayPeriod, DeviceId};
use crate::zones::{LightingPalette, ZoneRegistry};

const TREE_INTENSITY_WEIGHT: f64 = 0.2;
const VISITOR_INTENSITY_WEIGHT: f64 = 0.2;
const MAX_VISITOR_INTENSITY: f64 = 0.6;

/// LED color per zone
#[derive(Debug, Clone, Default)]
pub struct LightingModel;

impl LightingModel {
    /// Create the model
    pub fn new() -> Self {
        Self
    }

    /// Base brightness for an hour of the day
    pub fn time_base(hour: u32) -> f64 {
        match DayPeriod::lighting(hour) {
            DayPeriod::Day => 0.2,
            DayPeriod::Evening => 0.6,
            DayPeriod::Night => 0.3,
        }
    }

    /// Overall brightness factor, capped at 1.0
    pub fn total_intensity(hour: u32, tree_intensity: f64, visitor_activity: u32) -> f64 {
        let visitor_share =
            (VISITOR_INTENSITY_WEIGHT * f64::from(visitor_activity)).min(MAX_VISITOR_INTENSITY);
        (Self::time_base(hour) + TREE_INTENSITY_WEIGHT * tree_intensity + visitor_share).min(1.0)
    }

    /// Produce one reading per zone LED fixture
    pub fn tick(
        &self,
        now: DateTime<Utc>,
        registry: &ZoneRegistry,
        stimuli: &Stimuli,
    ) -> Vec<LightingSystem> {
        let hour = now.hour();
        let tree = stimuli.tree_movement_intensity;

        registry
            .iter()
            .map(|zone| {
                let visitors = stimuli.visitor_activity(zone.id);
                let intensity = Self::total_intensity(hour, tree, visitors);
                let (red, green, blue) = mix(&zone.id.palette(), tree, visitors, intensity);

                LightingSystem {
                    timestamp: now,
                    led_id: DeviceId::led(zone.id),
                    zone: zone.id,
                    red_intensity: red,
                    green_intensity: green,
                    blue_intensity: blue,
                }
            })
            .collect()
    }
}

fn mix(palette: &LightingPalette, tree: f64, visitors: u32, intensity: f64) -> (u8, u8, u8) {
    let visitors = f64::from(visitors);
    let channel = |base: f64, visitor_boost: f64, tree_boost: f64| {
        let value = (base + visitor_boost * visitors + tree_boost * tree) * intensity;
        value.trunc().clamp(0.0, 255.0) as u8
    };

    (
        channel(palette.base.red, palette.visitor_boost.red, palette.tree_boost.red),
        channel(palette.base.green, palette.visitor_boost.green, palette.tree_boost.green),
        channel(palette.base.blue, palette.visitor_boost.blue, palette.tree_boost.blue),
    )
}
