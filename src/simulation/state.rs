//! Simulation state
//!
//! The mutable state of one engine instance. Each slot is owned by exactly one
//! model and mutated only through that model's tick.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use crate::readings::TickStats;
use crate::types::ZoneId;

/// Default number of engagement scores retained per zone
pub const ENGAGEMENT_HISTORY_LEN: usize = 10;

/// Last emitted climate per zone, at full precision
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnvironmentState {
    temperature: BTreeMap<ZoneId, f64>,
    humidity: BTreeMap<ZoneId, f64>,
}

impl EnvironmentState {
    /// Last temperature of `zone`, if it has been ticked
    pub fn temperature(&self, zone: ZoneId) -> Option<f64> {
        self.temperature.get(&zone).copied()
    }

    /// Last humidity of `zone`, if it has been ticked
    pub fn humidity(&self, zone: ZoneId) -> Option<f64> {
        self.humidity.get(&zone).copied()
    }

    /// Store the new climate of `zone`
    pub fn record(&mut self, zone: ZoneId, temperature: f64, humidity: f64) {
        self.temperature.insert(zone, temperature);
        self.humidity.insert(zone, humidity);
    }
}

/// Last emitted speaker volume per zone
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioState {
    volume: BTreeMap<ZoneId, f64>,
}

impl AudioState {
    /// Last volume of `zone`, if it has been ticked
    pub fn volume(&self, zone: ZoneId) -> Option<f64> {
        self.volume.get(&zone).copied()
    }

    /// Store the new volume of `zone`
    pub fn record(&mut self, zone: ZoneId, volume: f64) {
        self.volume.insert(zone, volume);
    }
}

/// Rolling engagement scores per zone, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementHistory {
    capacity: usize,
    scores: BTreeMap<ZoneId, VecDeque<f64>>,
}

impl EngagementHistory {
    /// Create a history retaining at most `capacity` scores per zone
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), scores: BTreeMap::new() }
    }

    /// Append a score, evicting the oldest once the zone is full
    pub fn push(&mut self, zone: ZoneId, score: f64) {
        let capacity = self.capacity;
        let scores = self.scores.entry(zone).or_insert_with(|| VecDeque::with_capacity(capacity));
        scores.push_back(score);
        while scores.len() > capacity {
            scores.pop_front();
        }
    }

    /// Scores of `zone`, oldest first
    pub fn scores(&self, zone: ZoneId) -> Vec<f64> {
        self.scores.get(&zone).map(|s| s.iter().copied().collect()).unwrap_or_default()
    }

    /// Number of scores retained for `zone`
    pub fn len(&self, zone: ZoneId) -> usize {
        self.scores.get(&zone).map_or(0, VecDeque::len)
    }

    /// Maximum number of scores retained per zone
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EngagementHistory {
    fn default() -> Self {
        Self::new(ENGAGEMENT_HISTORY_LEN)
    }
}

/// Complete mutable state of one engine instance
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    /// Session start the state was seeded from
    pub session_start: DateTime<Utc>,
    /// Climate smoothing caches
    pub environment: EnvironmentState,
    /// Volume smoothing caches
    pub audio: AudioState,
    /// Engagement score history
    pub engagement: EngagementHistory,
    /// Visitor activity per zone, recomputed every tick
    pub visitor_activity: BTreeMap<ZoneId, u32>,
    /// Tree movement intensity of the last tick
    pub tree_movement_intensity: f64,
    /// Statistics of the last tick
    pub stats: TickStats,
}

impl SimulationState {
    /// Fresh state for a session starting at `session_start`
    pub fn new(session_start: DateTime<Utc>) -> Self {
        Self {
            session_start,
            environment: EnvironmentState::default(),
            audio: AudioState::default(),
            engagement: EngagementHistory::default(),
            visitor_activity: ZoneId::ALL.iter().map(|zone| (*zone, 0)).collect(),
            tree_movement_intensity: 0.0,
            stats: TickStats::default(),
        }
    }
}
