//! Zone configuration and per-zone physical profiles
//!
//! A [`Zone`] carries the device population of one spatial partition. The
//! microclimate and lighting palette of each zone are fixed properties of the
//! [`ZoneId`] itself.

use serde::{Deserialize, Serialize};

use crate::types::ZoneId;

/// Immutable configuration of a single zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identifier
    pub id: ZoneId,
    /// Number of trees fitted with strain gauges
    pub tree_count: usize,
    /// Number of LiDAR presence sensors
    pub visitor_sensor_count: usize,
    /// Number of speakers
    pub speaker_count: usize,
    /// Number of RGB LED fixtures
    pub led_count: usize,
    /// Typical number of visitors present, scales detection probability
    pub typical_visitor_level: u32,
    /// Human readable description
    pub description: String,
}

impl Zone {
    /// Create a zone with the installation's standard device population
    pub fn standard(id: ZoneId) -> Self {
        let (typical_visitor_level, description) = match id {
            ZoneId::EntranceClearing => (5, "Open welcome area"),
            ZoneId::DeepForest => (2, "Dense forest, more mystical"),
            ZoneId::Riverside => (3, "Near the river, water sounds"),
        };

        Self {
            id,
            tree_count: 3,
            visitor_sensor_count: 5,
            speaker_count: 1,
            led_count: 1,
            typical_visitor_level,
            description: description.to_string(),
        }
    }

    /// Scale factor applied to the detection probability of this zone's sensors
    pub fn visitor_factor(&self) -> f64 {
        self.typical_visitor_level as f64 / 3.0
    }
}

/// Additive microclimate offsets of a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Microclimate {
    /// Offset applied to the diurnal temperature, in degrees Celsius
    pub temperature_c: f64,
    /// Offset applied to the base humidity, in percentage points
    pub humidity_percent: f64,
}

/// An RGB triple in floating point, before intensity scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red channel
    pub red: f64,
    /// Green channel
    pub green: f64,
    /// Blue channel
    pub blue: f64,
}

impl Rgb {
    /// Create a new RGB triple
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }
}

/// Color behavior of a zone's LED fixture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingPalette {
    /// Resting color
    pub base: Rgb,
    /// Per-channel boost per detected visitor
    pub visitor_boost: Rgb,
    /// Per-channel boost per unit of tree movement intensity
    pub tree_boost: Rgb,
}

const TREE_BOOST: Rgb = Rgb::new(50.0, 40.0, 35.0);

impl ZoneId {
    /// Microclimate offsets of the zone
    pub fn microclimate(&self) -> Microclimate {
        match self {
            // Exposed to the sun, drier
            ZoneId::EntranceClearing => Microclimate { temperature_c: 1.0, humidity_percent: -5.0 },
            // Tree shade retains humidity
            ZoneId::DeepForest => Microclimate { temperature_c: -1.0, humidity_percent: 10.0 },
            // Cooler and more humid near water
            ZoneId::Riverside => Microclimate { temperature_c: -2.0, humidity_percent: 15.0 },
        }
    }

    /// Lighting palette of the zone
    pub fn palette(&self) -> LightingPalette {
        match self {
            // Warm whites
            ZoneId::EntranceClearing => LightingPalette {
                base: Rgb::new(200.0, 180.0, 120.0),
                visitor_boost: Rgb::new(15.0, 15.0, 25.0),
                tree_boost: TREE_BOOST,
            },
            // Mystic greens
            ZoneId::DeepForest => LightingPalette {
                base: Rgb::new(80.0, 180.0, 30.0),
                visitor_boost: Rgb::new(20.0, 25.0, 35.0),
                tree_boost: TREE_BOOST,
            },
            // Blue-greens
            ZoneId::Riverside => LightingPalette {
                base: Rgb::new(50.0, 150.0, 200.0),
                visitor_boost: Rgb::new(30.0, 25.0, 15.0),
                tree_boost: TREE_BOOST,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_zone_population() {
        let zone = Zone::standard(ZoneId::EntranceClearing);
        assert_eq!(zone.tree_count, 3);
        assert_eq!(zone.visitor_sensor_count, 5);
        assert_eq!(zone.speaker_count, 1);
        assert_eq!(zone.led_count, 1);
        assert_eq!(zone.typical_visitor_level, 5);
    }

    #[test]
    fn test_visitor_factor() {
        let forest = Zone::standard(ZoneId::DeepForest);
        assert!((forest.visitor_factor() - 2.0 / 3.0).abs() < 1e-12);
        let riverside = Zone::standard(ZoneId::Riverside);
        assert_eq!(riverside.visitor_factor(), 1.0);
    }

    #[test]
    fn test_microclimates() {
        assert_eq!(ZoneId::Riverside.microclimate().temperature_c, -2.0);
        assert_eq!(ZoneId::Riverside.microclimate().humidity_percent, 15.0);
        assert_eq!(ZoneId::DeepForest.microclimate().temperature_c, -1.0);
        assert_eq!(ZoneId::EntranceClearing.microclimate().humidity_percent, -5.0);
    }
}
