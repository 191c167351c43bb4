//! Device identifiers for the installation simulator
//!
//! Every sensor and actuator is addressed by its zone, its kind and (for
//! multi-instance devices) its index within the zone. Identifiers serialize
//! to the flat string form the telemetry consumers expect, e.g.
//! `riverside_tree_02` or `deep_forest_speaker_main`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::ZoneId;

/// Kind of device attached to a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Strain gauge pair mounted on a tree
    Tree,
    /// LiDAR presence sensor
    Lidar,
    /// The zone's main speaker
    Speaker,
    /// The zone's main RGB LED fixture
    Led,
}

impl DeviceKind {
    fn label(&self) -> &'static str {
        match self {
            DeviceKind::Tree => "tree",
            DeviceKind::Lidar => "lidar",
            DeviceKind::Speaker => "speaker",
            DeviceKind::Led => "led",
        }
    }

    fn is_indexed(&self) -> bool {
        matches!(self, DeviceKind::Tree | DeviceKind::Lidar)
    }
}

/// Unique identifier for a sensor or actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId {
    /// Zone the device belongs to
    pub zone: ZoneId,
    /// Device kind
    pub kind: DeviceKind,
    /// Index within the zone (trees and LiDAR sensors only)
    pub index: Option<usize>,
}

impl DeviceId {
    /// Strain-gauge tree `index` in `zone`
    pub fn tree(zone: ZoneId, index: usize) -> Self {
        Self { zone, kind: DeviceKind::Tree, index: Some(index) }
    }

    /// LiDAR sensor `index` in `zone`
    pub fn lidar(zone: ZoneId, index: usize) -> Self {
        Self { zone, kind: DeviceKind::Lidar, index: Some(index) }
    }

    /// Main speaker of `zone`
    pub fn speaker(zone: ZoneId) -> Self {
        Self { zone, kind: DeviceKind::Speaker, index: None }
    }

    /// Main LED fixture of `zone`
    pub fn led(zone: ZoneId) -> Self {
        Self { zone, kind: DeviceKind::Led, index: None }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}_{}_{:02}", self.zone, self.kind.label(), index),
            None => write!(f, "{}_{}_main", self.zone, self.kind.label()),
        }
    }
}

impl FromStr for DeviceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (zone, rest) = ZoneId::ALL
            .iter()
            .find_map(|zone| {
                s.strip_prefix(zone.as_str())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| (*zone, rest))
            })
            .ok_or_else(|| format!("Unknown zone in device id: {}", s))?;

        let (label, suffix) =
            rest.split_once('_').ok_or_else(|| format!("Malformed device id: {}", s))?;

        let kind = [DeviceKind::Tree, DeviceKind::Lidar, DeviceKind::Speaker, DeviceKind::Led]
            .into_iter()
            .find(|kind| kind.label() == label)
            .ok_or_else(|| format!("Unknown device kind in device id: {}", s))?;

        let index = if kind.is_indexed() {
            Some(suffix.parse::<usize>().map_err(|e| format!("Bad device index in {}: {}", s, e))?)
        } else if suffix == "main" {
            None
        } else {
            return Err(format!("Malformed device id: {}", s));
        };

        Ok(Self { zone, kind, index })
    }
}

impl Serialize for DeviceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_formatting() {
        assert_eq!(DeviceId::tree(ZoneId::Riverside, 2).to_string(), "riverside_tree_02");
        assert_eq!(
            DeviceId::lidar(ZoneId::EntranceClearing, 4).to_string(),
            "entrance_clearing_lidar_04"
        );
        assert_eq!(DeviceId::speaker(ZoneId::DeepForest).to_string(), "deep_forest_speaker_main");
        assert_eq!(DeviceId::led(ZoneId::Riverside).to_string(), "riverside_led_main");
    }

    #[test]
    fn test_device_id_parsing() {
        let id: DeviceId = "deep_forest_lidar_03".parse().unwrap();
        assert_eq!(id, DeviceId::lidar(ZoneId::DeepForest, 3));

        let id: DeviceId = "entrance_clearing_led_main".parse().unwrap();
        assert_eq!(id, DeviceId::led(ZoneId::EntranceClearing));

        assert!("meadow_tree_01".parse::<DeviceId>().is_err());
        assert!("riverside_drone_01".parse::<DeviceId>().is_err());
        assert!("riverside_speaker_02".parse::<DeviceId>().is_err());
        assert!("riverside_tree_xx".parse::<DeviceId>().is_err());
    }

    #[test]
    fn test_device_id_json_is_flat_string() {
        let id = DeviceId::tree(ZoneId::EntranceClearing, 0);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"entrance_clearing_tree_00\"");
        let back: DeviceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
