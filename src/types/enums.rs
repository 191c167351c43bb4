//! Enumeration types for the installation simulator
//!
//! This module contains the zone identifiers of the installation and the
//! coarse periods of the day that drive visitor and lighting behavior.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spatial partitions of the installation
///
/// The declaration order is the iteration order of every per-zone output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneId {
    /// Open welcome area at the installation entrance
    EntranceClearing,
    /// Dense tree cover in the middle of the walk
    DeepForest,
    /// Path along the river bank
    Riverside,
}

impl ZoneId {
    /// Every zone, in output order
    pub const ALL: [ZoneId; 3] = [ZoneId::EntranceClearing, ZoneId::DeepForest, ZoneId::Riverside];

    /// Wire name of the zone, as used in device ids and dataset records
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneId::EntranceClearing => "entrance_clearing",
            ZoneId::DeepForest => "deep_forest",
            ZoneId::Riverside => "riverside",
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entrance_clearing" | "entrance" => Ok(ZoneId::EntranceClearing),
            "deep_forest" | "forest" => Ok(ZoneId::DeepForest),
            "riverside" | "river" => Ok(ZoneId::Riverside),
            _ => Err(format!("Unknown zone: {}", s)),
        }
    }
}

/// Coarse period of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPeriod {
    /// Daytime
    Day,
    /// Evening, after the main visiting window
    Evening,
    /// Night
    Night,
}

impl DayPeriod {
    /// Classify an hour against the installation's visiting window
    ///
    /// Opening hours run 09:00-18:59, the evening window 19:00-22:59.
    pub fn visiting(hour: u32) -> Self {
        match hour {
            9..=18 => DayPeriod::Day,
            19..=22 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }

    /// Classify an hour against the lighting schedule
    ///
    /// Daylight runs 06:00-18:59, the evening show 19:00-22:59.
    pub fn lighting(hour: u32) -> Self {
        match hour {
            6..=18 => DayPeriod::Day,
            19..=22 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayPeriod::Day => write!(f, "Day"),
            DayPeriod::Evening => write!(f, "Evening"),
            DayPeriod::Night => write!(f, "Night"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_round_trip_through_str() {
        for zone in ZoneId::ALL {
            assert_eq!(zone.as_str().parse::<ZoneId>().unwrap(), zone);
            assert_eq!(zone.to_string(), zone.as_str());
        }
        assert!("swamp".parse::<ZoneId>().is_err());
    }

    #[test]
    fn test_zone_serializes_as_snake_case() {
        let json = serde_json::to_string(&ZoneId::DeepForest).unwrap();
        assert_eq!(json, "\"deep_forest\"");
    }

    #[test]
    fn test_zone_order_matches_output_order() {
        let mut zones = ZoneId::ALL.to_vec();
        zones.sort();
        assert_eq!(zones, ZoneId::ALL.to_vec());
    }

    #[test]
    fn test_visiting_periods() {
        assert_eq!(DayPeriod::visiting(8), DayPeriod::Night);
        assert_eq!(DayPeriod::visiting(9), DayPeriod::Day);
        assert_eq!(DayPeriod::visiting(18), DayPeriod::Day);
        assert_eq!(DayPeriod::visiting(19), DayPeriod::Evening);
        assert_eq!(DayPeriod::visiting(22), DayPeriod::Evening);
        assert_eq!(DayPeriod::visiting(23), DayPeriod::Night);
    }

    #[test]
    fn test_lighting_periods() {
        assert_eq!(DayPeriod::lighting(5), DayPeriod::Night);
        assert_eq!(DayPeriod::lighting(6), DayPeriod::Day);
        assert_eq!(DayPeriod::lighting(18), DayPeriod::Day);
        assert_eq!(DayPeriod::lighting(20), DayPeriod::Evening);
        assert_eq!(DayPeriod::lighting(0), DayPeriod::Night);
    }
}
