//! The per-tick dataset
//!
//! A [`Dataset`] is the complete, schema-fixed output of one tick: metadata
//! plus one reading list per domain. It is built once by the engine and never
//! mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    AudioSystem, EnvironmentalReading, LightingSystem, TreeBiometrics, UserEngagement,
    VisitorDetection,
};

/// Installation-wide statistics of a single tick
///
/// Overwritten every tick, never accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickStats {
    /// Sum of visitor estimates over every sensor
    pub total_visitors_detected: u32,
    /// Estimated power draw of the installation, in watts
    pub total_power_consumption: f64,
    /// Mean tree strain magnitude
    pub average_tree_movement: f64,
}

/// Metadata block of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Tick timestamp
    pub timestamp: DateTime<Utc>,
    /// Human readable simulation time, e.g. `2024-06-01 12:00:00+00:00`
    pub simulation_time: String,
    /// Statistics snapshot of this tick
    pub stats: TickStats,
    /// Per-zone engagement metrics
    pub user_engagement: Vec<UserEngagement>,
}

/// Complete output of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Metadata and derived metrics
    pub metadata: DatasetMetadata,
    /// One reading per zone
    pub environmental: Vec<EnvironmentalReading>,
    /// One reading per instrumented tree
    pub tree_biometrics: Vec<TreeBiometrics>,
    /// One reading per LiDAR sensor
    pub visitor_detection: Vec<VisitorDetection>,
    /// One reading per zone speaker
    pub audio_system: Vec<AudioSystem>,
    /// One reading per zone LED fixture
    pub lighting_system: Vec<LightingSystem>,
}

impl Dataset {
    /// Tick timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.metadata.timestamp
    }

    /// Statistics of the tick
    pub fn stats(&self) -> &TickStats {
        &self.metadata.stats
    }

    /// Number of device readings, excluding the metadata block
    pub fn data_point_count(&self) -> usize {
        self.environmental.len()
            + self.tree_biometrics.len()
            + self.visitor_detection.len()
            + self.audio_system.len()
            + self.lighting_system.len()
    }

    /// Per-domain reading counts, in schema order
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            environmental: self.environmental.len(),
            tree_biometrics: self.tree_biometrics.len(),
            visitor_detection: self.visitor_detection.len(),
            audio_system: self.audio_system.len(),
            lighting_system: self.lighting_system.len(),
            user_engagement: self.metadata.user_engagement.len(),
        }
    }
}

/// Reading counts of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    /// Environmental readings
    pub environmental: usize,
    /// Tree biometric readings
    pub tree_biometrics: usize,
    /// Visitor detection readings
    pub visitor_detection: usize,
    /// Audio system readings
    pub audio_system: usize,
    /// Lighting system readings
    pub lighting_system: usize,
    /// Engagement analytics carried in the metadata
    pub user_engagement: usize,
}

impl DatasetSummary {
    /// Render the summary as printed after a single snapshot
    pub fn render(&self) -> String {
        let total = self.environmental
            + self.tree_biometrics
            + self.visitor_detection
            + self.audio_system
            + self.lighting_system;

        let mut output = String::from("Data Summary:\n");
        output.push_str(&format!("   Environmental: {} readings\n", self.environmental));
        output.push_str(&format!("   Tree Biometrics: {} readings\n", self.tree_biometrics));
        output.push_str(&format!("   Visitor Detection: {} readings\n", self.visitor_detection));
        output.push_str(&format!("   Audio System: {} readings\n", self.audio_system));
        output.push_str(&format!("   Lighting System: {} readings\n", self.lighting_system));
        output.push_str(&format!(
            "   User Engagement: {} analytics (in metadata)\n",
            self.user_engagement
        ));
        output.push_str(&format!("   Total data points: {}", total));
        output
    }
}
