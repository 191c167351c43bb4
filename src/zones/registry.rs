//! Zone registry and lookup
//!
//! The registry is built once, validated, and then only read: it hands out
//! zones in output order and answers id lookups.

use serde::Serialize;
use std::collections::HashMap;

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::ZoneId;
use crate::zones::Zone;

/// The fixed set of zones of the installation
#[derive(Debug, Clone, Serialize)]
pub struct ZoneRegistry {
    /// All zones, in output order
    zones: Vec<Zone>,
    /// Quick lookup map from zone ID to index
    #[serde(skip)]
    zone_index: HashMap<ZoneId, usize>,
}

impl ZoneRegistry {
    /// Registry with the installation's standard three zones
    pub fn standard() -> Self {
        let zones = ZoneId::ALL.iter().map(|id| Zone::standard(*id)).collect::<Vec<_>>();
        let zone_index = zones.iter().enumerate().map(|(idx, zone)| (zone.id, idx)).collect();
        Self { zones, zone_index }
    }

    /// Build a registry from custom zone configurations
    ///
    /// Every zone id must appear exactly once, and every zone needs at least
    /// one tree, one visitor sensor and a non-zero typical visitor level. Each
    /// zone drives exactly one main speaker and one main LED fixture.
    pub fn from_zones(mut zones: Vec<Zone>) -> SimulationResult<Self> {
        if zones.len() != ZoneId::ALL.len() {
            return Err(SimulationError::zone_registry_error(format!(
                "expected {} zones, got {}",
                ZoneId::ALL.len(),
                zones.len()
            )));
        }

        zones.sort_by_key(|zone| zone.id);

        let mut zone_index = HashMap::with_capacity(zones.len());
        for (idx, zone) in zones.iter().enumerate() {
            if zone_index.insert(zone.id, idx).is_some() {
                return Err(SimulationError::zone_registry_error(format!(
                    "zone {} is configured more than once",
                    zone.id
                )));
            }
            if zone.tree_count == 0 {
                return Err(SimulationError::zone_registry_error(format!(
                    "zone {} has no trees",
                    zone.id
                )));
            }
            if zone.visitor_sensor_count == 0 {
                return Err(SimulationError::zone_registry_error(format!(
                    "zone {} has no visitor sensors",
                    zone.id
                )));
            }
            if zone.speaker_count != 1 {
                return Err(SimulationError::zone_registry_error(format!(
                    "zone {} must have exactly one speaker, got {}",
                    zone.id, zone.speaker_count
                )));
            }
            if zone.led_count != 1 {
                return Err(SimulationError::zone_registry_error(format!(
                    "zone {} must have exactly one LED fixture, got {}",
                    zone.id, zone.led_count
                )));
            }
            if zone.typical_visitor_level == 0 {
                return Err(SimulationError::zone_registry_error(format!(
                    "zone {} has a typical visitor level of 0",
                    zone.id
                )));
            }
        }

        Ok(Self { zones, zone_index })
    }

    /// Get a zone by ID
    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zone_index.get(&id).and_then(|&idx| self.zones.get(idx))
    }

    /// Iterate over all zones in output order
    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Total number of instrumented trees
    pub fn total_tree_count(&self) -> usize {
        self.zones.iter().map(|zone| zone.tree_count).sum()
    }

    /// Total number of visitor sensors
    pub fn total_visitor_sensor_count(&self) -> usize {
        self.zones.iter().map(|zone| zone.visitor_sensor_count).sum()
    }

    /// Total number of speakers
    pub fn total_speaker_count(&self) -> usize {
        self.zones.iter().map(|zone| zone.speaker_count).sum()
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
