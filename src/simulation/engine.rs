//! Dataset assembly
//!
//! [`InstallationEngine`] owns the zone registry, the random source and the
//! simulation state. One call to [`InstallationEngine::tick`] runs every model
//! in a fixed order and packages the result into a [`Dataset`]:
//!
//! 1. environmental, tree biometrics and visitor detection (independent)
//! 2. engagement, from the visitor readings
//! 3. audio and lighting, from the tree and visitor stimuli
//!
//! A tick performs no I/O.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::models::{
    round_to, AudioModel, EngagementModel, EnvironmentalModel, LightingModel, NoiseSource,
    SeededNoise, Stimuli, TreeBiometricsModel, VisitorDetectionModel,
};
use crate::readings::{AudioSystem, Dataset, DatasetMetadata, LightingSystem, TickStats};
use crate::simulation::{SimulationResult, SimulationState};
use crate::types::SimulationConfig;
use crate::zones::ZoneRegistry;

/// Draw of one speaker, in watts
pub const SPEAKER_POWER_W: f64 = 30.0;

/// Draw per unit of mean LED channel intensity, in watts
pub const LED_POWER_PER_UNIT_W: f64 = 0.2;

/// Installation baseline draw, in watts
pub const BASELINE_POWER_W: f64 = 100.0;

/// Estimated power draw of the actuators that reported this tick
pub fn power_consumption(audio: &[AudioSystem], lighting: &[LightingSystem]) -> f64 {
    let speakers = audio.len() as f64 * SPEAKER_POWER_W;
    let leds: f64 = lighting.iter().map(|led| led.mean_intensity() * LED_POWER_PER_UNIT_W).sum();
    speakers + leds + BASELINE_POWER_W
}

/// The simulation engine
#[derive(Debug)]
pub struct InstallationEngine {
    registry: ZoneRegistry,
    noise: Box<dyn NoiseSource>,
    state: SimulationState,
    environmental: EnvironmentalModel,
    trees: TreeBiometricsModel,
    visitors: VisitorDetectionModel,
    engagement: EngagementModel,
    audio: AudioModel,
    lighting: LightingModel,
}

impl InstallationEngine {
    /// Create an engine from a validated configuration
    #[instrument(skip(config), fields(seed = ?config.seed))]
    pub fn new(config: &SimulationConfig, session_start: DateTime<Utc>) -> SimulationResult<Self> {
        config.validate()?;

        let engine = Self::with_parts(
            ZoneRegistry::standard(),
            Box::new(SeededNoise::new(config.seed)),
            config.visitor_flow_multiplier,
            session_start,
        );

        info!(
            zones = engine.registry.len(),
            trees = engine.registry.total_tree_count(),
            sensors = engine.registry.total_visitor_sensor_count(),
            speakers = engine.registry.total_speaker_count(),
            flow_multiplier = config.visitor_flow_multiplier,
            "installation engine created"
        );
        Ok(engine)
    }

    /// Create an engine from explicit parts
    pub fn with_parts(
        registry: ZoneRegistry,
        noise: Box<dyn NoiseSource>,
        flow_multiplier: f64,
        session_start: DateTime<Utc>,
    ) -> Self {
        Self {
            registry,
            noise,
            state: SimulationState::new(session_start),
            environmental: EnvironmentalModel::new(),
            trees: TreeBiometricsModel::new(),
            visitors: VisitorDetectionModel::new(flow_multiplier),
            engagement: EngagementModel::new(),
            audio: AudioModel::new(),
            lighting: LightingModel::new(),
        }
    }

    /// Zones of the installation
    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    /// Current simulation state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Produce the dataset of the tick at `now`
    #[instrument(skip(self), level = "debug")]
    pub fn tick(&mut self, now: DateTime<Utc>) -> Dataset {
        let noise = self.noise.as_mut();

        let environmental =
            self.environmental.tick(now, &self.registry, &mut self.state.environment, noise);
        let trees = self.trees.tick(now, &self.registry, noise);
        let visitors = self.visitors.tick(now, &self.registry, noise);

        let user_engagement = self.engagement.tick(
            now,
            &self.registry,
            &visitors.readings,
            &mut self.state.engagement,
        );

        let stimuli = Stimuli {
            tree_movement_intensity: trees.movement_intensity,
            zone_visitor_activity: visitors.zone_activity,
        };
        let audio_system = self.audio.tick(now, &self.registry, &stimuli, &mut self.state.audio, noise);
        let lighting_system = self.lighting.tick(now, &self.registry, &stimuli);

        let stats = TickStats {
            total_visitors_detected: visitors.total_visitors,
            total_power_consumption: round_to(
                power_consumption(&audio_system, &lighting_system),
                1,
            ),
            average_tree_movement: round_to(stimuli.tree_movement_intensity, 3),
        };

        self.state.tree_movement_intensity = stimuli.tree_movement_intensity;
        self.state.visitor_activity = stimuli.zone_visitor_activity;
        self.state.stats = stats;

        debug!(
            visitors = stats.total_visitors_detected,
            power = stats.total_power_consumption,
            tree_movement = stats.average_tree_movement,
            "tick assembled"
        );

        Dataset {
            metadata: DatasetMetadata {
                timestamp: now,
                simulation_time: now.format("%Y-%m-%d %H:%M:%S%:z").to_string(),
                stats,
                user_engagement,
            },
            environmental,
            tree_biometrics: trees.readings,
            visitor_detection: visitors.readings,
            audio_system,
            lighting_system,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CenteredNoise;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let config = SimulationConfig { interval_seconds: 0, ..Default::default() };
        assert!(InstallationEngine::new(&config, noon()).is_err());
    }

    #[test]
    fn test_tick_point_counts() {
        let config = SimulationConfig { seed: Some(42), ..Default::default() };
        let mut engine = InstallationEngine::new(&config, noon()).unwrap();
        let dataset = engine.tick(noon());

        let summary = dataset.summary();
        assert_eq!(summary.environmental, 3);
        assert_eq!(summary.tree_biometrics, 9);
        assert_eq!(summary.visitor_detection, 15);
        assert_eq!(summary.audio_system, 3);
        assert_eq!(summary.lighting_system, 3);
        assert_eq!(summary.user_engagement, 3);
        assert_eq!(dataset.data_point_count(), 33);
        assert_eq!(dataset.metadata.simulation_time, "2024-06-01 12:00:00+00:00");
    }

    #[test]
    fn test_quiet_tick_power_and_state() {
        let mut engine = InstallationEngine::with_parts(
            ZoneRegistry::standard(),
            Box::new(CenteredNoise::new()),
            1.0,
            noon(),
        );
        let dataset = engine.tick(noon());

        assert_eq!(dataset.stats().total_visitors_detected, 0);
        let expected: f64 = 90.0
            + dataset.lighting_system.iter().map(|l| l.mean_intensity() * 0.2).sum::<f64>()
            + 100.0;
        assert!((dataset.stats().total_power_consumption - expected).abs() < 0.05);
        assert_eq!(engine.state().stats, *dataset.stats());
        assert_eq!(engine.state().engagement.len(crate::types::ZoneId::Riverside), 1);
    }

    #[test]
    fn test_power_bills_only_reporting_speakers() {
        let mut engine = InstallationEngine::with_parts(
            ZoneRegistry::standard(),
            Box::new(CenteredNoise::new()),
            1.0,
            noon(),
        );
        let dataset = engine.tick(noon());
        let leds: f64 =
            dataset.lighting_system.iter().map(|l| l.mean_intensity() * LED_POWER_PER_UNIT_W).sum();

        assert_eq!(dataset.audio_system.len(), engine.registry().total_speaker_count());
        let full = power_consumption(&dataset.audio_system, &dataset.lighting_system);
        assert!((full - (3.0 * SPEAKER_POWER_W + leds + BASELINE_POWER_W)).abs() < 1e-9);

        let one_speaker = power_consumption(&dataset.audio_system[..1], &dataset.lighting_system);
        assert!((full - one_speaker - 2.0 * SPEAKER_POWER_W).abs() < 1e-9);
        assert_eq!(power_consumption(&[], &[]), BASELINE_POWER_W);
    }
}
