//! Per-device reading records
//!
//! One record is produced per sensor or actuator per tick. Field names are the
//! interface boundary with the telemetry consumers and must not drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DeviceId, ZoneId};

/// Air temperature and humidity of a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    /// Tick timestamp
    pub timestamp: DateTime<Utc>,
    /// Zone the reading belongs to
    pub zone: ZoneId,
    /// Temperature in degrees Celsius
    pub temperature_c: f64,
    /// Relative humidity in percent, always within [20, 95]
    pub humidity_percent: f64,
}

/// Strain gauge readings of one tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeBiometrics {
    /// Tick timestamp
    pub timestamp: DateTime<Utc>,
    /// Tree identifier
    pub tree_id: DeviceId,
    /// Strain along the X axis, in millimetres
    pub strain_x_mm: f64,
    /// Strain along the Y axis, in millimetres
    pub strain_y_mm: f64,
}

/// Output of one LiDAR presence sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorDetection {
    /// Tick timestamp
    pub timestamp: DateTime<Utc>,
    /// Sensor identifier
    pub sensor_id: DeviceId,
    /// Zone the sensor belongs to
    pub zone: ZoneId,
    /// Return signal strength
    pub signal_strength: f64,
    /// Detection confidence
    pub confidence_level: f64,
    /// Whether a presence was detected
    pub detection_active: bool,
    /// Estimated visitors in front of the sensor: 0 when inactive, 1-3 otherwise
    pub visitor_count_estimate: u32,
}

/// State of a zone's speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSystem {
    /// Tick timestamp
    pub timestamp: DateTime<Utc>,
    /// Speaker identifier
    pub speaker_id: DeviceId,
    /// Zone the speaker belongs to
    pub zone: ZoneId,
    /// Output volume, never negative
    pub volume_db: f64,
}

/// State of a zone's RGB LED fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingSystem {
    /// Tick timestamp
    pub timestamp: DateTime<Utc>,
    /// LED fixture identifier
    pub led_id: DeviceId,
    /// Zone the fixture belongs to
    pub zone: ZoneId,
    /// Red channel, 0-255
    pub red_intensity: u8,
    /// Green channel, 0-255
    pub green_intensity: u8,
    /// Blue channel, 0-255
    pub blue_intensity: u8,
}

impl LightingSystem {
    /// Mean of the three channels
    pub fn mean_intensity(&self) -> f64 {
        (self.red_intensity as f64 + self.green_intensity as f64 + self.blue_intensity as f64) / 3.0
    }
}

/// Derived visitor engagement of a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEngagement {
    /// Tick timestamp
    pub timestamp: DateTime<Utc>,
    /// Zone the metric belongs to
    pub zone: ZoneId,
    /// Estimated dwell time of engaged visitors, in seconds
    pub average_engagement_duration_sec: f64,
    /// Engagement score in [0, 1]
    pub engagement_score: f64,
}
