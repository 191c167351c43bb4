//! Audio model
//!
//! Each zone's main speaker follows the tree and visitor stimuli with a
//! perceptual lag, then picks up a little jitter.

use chrono::{DateTime, Utc};

use crate::models::{round_to, smooth_toward, NoiseSource, Stimuli};
use crate::readings::AudioSystem;
use crate::simulation::AudioState;
use crate::types::DeviceId;
use crate::zones::ZoneRegistry;

/// Fraction of the gap to the target volume closed per tick
pub const AUDIO_SMOOTHING: f64 = 0.3;

/// Full-scale volume, in dB
const REFERENCE_VOLUME_DB: f64 = 75.0;
const TREE_WEIGHT: f64 = 0.3;
const VISITOR_WEIGHT: f64 = 0.15;
const MAX_VISITOR_SHARE: f64 = 0.7;
const VOLUME_JITTER_DB: f64 = 2.0;

/// Speaker volume per zone
#[derive(Debug, Clone)]
pub struct AudioModel {
    smoothing: f64,
}

impl AudioModel {
    /// Create the model with the standard smoothing factor
    pub fn new() -> Self {
        Self { smoothing: AUDIO_SMOOTHING }
    }

    /// Unsmoothed volume the zone is driven toward
    pub fn target_volume(tree_intensity: f64, visitor_activity: u32) -> f64 {
        let visitor_share = (VISITOR_WEIGHT * f64::from(visitor_activity)).min(MAX_VISITOR_SHARE);
        REFERENCE_VOLUME_DB * (TREE_WEIGHT * tree_intensity + visitor_share)
    }

    /// Produce one reading per zone speaker and update the volume cache
    pub fn tick(
        &self,
        now: DateTime<Utc>,
        registry: &ZoneRegistry,
        stimuli: &Stimuli,
        state: &mut AudioState,
        noise: &mut dyn NoiseSource,
    ) -> Vec<AudioSystem> {
        registry
            .iter()
            .map(|zone| {
                let target = Self::target_volume(
                    stimuli.tree_movement_intensity,
                    stimuli.visitor_activity(zone.id),
                );
                let smoothed = smooth_toward(state.volume(zone.id), target, self.smoothing);
                let volume =
                    (smoothed + noise.uniform(-VOLUME_JITTER_DB, VOLUME_JITTER_DB)).max(0.0);
                state.record(zone.id, volume);

                AudioSystem {
                    timestamp: now,
                    speaker_id: DeviceId::speaker(zone.id),
                    zone: zone.id,
                    volume_db: round_to(volume, 1),
                }
            })
            .collect()
    }
}

impl Default for AudioModel {
    fn default() -> Self {
        Self::new()
    }
}
