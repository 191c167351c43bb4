//! Visitor detection model
//!
//! Every LiDAR sensor runs an independent Bernoulli trial per tick. The hit
//! probability depends on the hour of the day, the configured visitor flow and
//! how busy the zone typically is. Hits carry a strong, confident return and a
//! visitor estimate of 1-3; misses carry background noise and no visitors.
//!
//! The model also reduces its readings to the per-zone visitor activity that
//! drives the zone's audio and lighting response.

use chrono::{DateTime, Timelike, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{round_to, NoiseSource};
use crate::readings::VisitorDetection;
use crate::types::{DayPeriod, DeviceId, ZoneId};
use crate::zones::{Zone, ZoneRegistry};

/// Visitor estimates a positive detection can report
const VISITOR_ESTIMATES: [u32; 3] = [1, 2, 3];

/// Relative odds of each entry of [`VISITOR_ESTIMATES`]
const VISITOR_ESTIMATE_WEIGHTS: [u32; 3] = [3, 2, 1];

const HIT_SIGNAL: (f64, f64) = (75.0, 90.0);
const HIT_CONFIDENCE_JITTER: f64 = 3.0;
const MAX_CONFIDENCE: f64 = 95.0;
const MISS_SIGNAL: (f64, f64) = (15.0, 40.0);
const MISS_CONFIDENCE: (f64, f64) = (10.0, 30.0);

/// Output of one visitor detection tick
#[derive(Debug, Clone)]
pub struct VisitorTick {
    /// One reading per sensor
    pub readings: Vec<VisitorDetection>,
    /// Sum of visitor estimates per zone, recomputed every tick
    pub zone_activity: BTreeMap<ZoneId, u32>,
    /// Sum of visitor estimates over every sensor
    pub total_visitors: u32,
}

/// Presence detection for every LiDAR sensor
#[derive(Debug, Clone)]
pub struct VisitorDetectionModel {
    flow_multiplier: f64,
}

impl VisitorDetectionModel {
    /// Create the model with a visitor flow multiplier
    pub fn new(flow_multiplier: f64) -> Self {
        Self { flow_multiplier }
    }

    /// Configured visitor flow multiplier
    pub fn flow_multiplier(&self) -> f64 {
        self.flow_multiplier
    }

    /// Base detection probability for an hour of the day
    pub fn time_base(hour: u32) -> f64 {
        match DayPeriod::visiting(hour) {
            DayPeriod::Day => 0.30,
            DayPeriod::Evening => 0.15,
            DayPeriod::Night => 0.02,
        }
    }

    /// Detection probability of each sensor of `zone` at `hour`
    pub fn detection_probability(&self, hour: u32, zone: &Zone) -> f64 {
        Self::time_base(hour) * self.flow_multiplier * zone.visitor_factor()
    }

    /// Produce one reading per sensor and the per-zone visitor activity
    pub fn tick(
        &self,
        now: DateTime<Utc>,
        registry: &ZoneRegistry,
        noise: &mut dyn NoiseSource,
    ) -> VisitorTick {
        let hour = now.hour();
        let mut readings = Vec::with_capacity(registry.total_visitor_sensor_count());
        let mut zone_activity = BTreeMap::new();
        let mut total_visitors = 0;

        for zone in registry.iter() {
            let probability = self.detection_probability(hour, zone);
            let mut zone_visitors = 0;

            for index in 0..zone.visitor_sensor_count {
                let reading = Self::sense(now, DeviceId::lidar(zone.id, index), probability, noise);
                zone_visitors += reading.visitor_count_estimate;
                readings.push(reading);
            }

            debug!(zone = %zone.id, probability, visitors = zone_visitors, "zone visitor activity");
            zone_activity.insert(zone.id, zone_visitors);
            total_visitors += zone_visitors;
        }

        VisitorTick { readings, zone_activity, total_visitors }
    }

    fn sense(
        now: DateTime<Utc>,
        sensor_id: DeviceId,
        probability: f64,
        noise: &mut dyn NoiseSource,
    ) -> VisitorDetection {
        let detected = noise.chance(probability);

        let (signal_strength, confidence_level, visitor_count_estimate) = if detected {
            let signal = noise.uniform(HIT_SIGNAL.0, HIT_SIGNAL.1);
            let confidence = (signal + noise.uniform(-HIT_CONFIDENCE_JITTER, HIT_CONFIDENCE_JITTER))
                .min(MAX_CONFIDENCE);
            let estimate = VISITOR_ESTIMATES[noise.weighted_index(&VISITOR_ESTIMATE_WEIGHTS)];
            (signal, confidence, estimate)
        } else {
            let signal = noise.uniform(MISS_SIGNAL.0, MISS_SIGNAL.1);
            let confidence = noise.uniform(MISS_CONFIDENCE.0, MISS_CONFIDENCE.1);
            (signal, confidence, 0)
        };

        VisitorDetection {
            timestamp: now,
            sensor_id,
            zone: sensor_id.zone,
            signal_strength: round_to(signal_strength, 1),
            confidence_level: round_to(confidence_level, 1),
            detection_active: detected,
            visitor_count_estimate,
        }
    }
}

impl Default for VisitorDetectionModel {
    fn default() -> Self {
        Self::new(1.0)
    }
}
