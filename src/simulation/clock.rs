//! Simulation clock
//!
//! The installation normally stamps each tick with the wall clock. A stepped
//! clock advances by a fixed amount per tick instead, for deterministic
//! replays. Either way the scheduler still waits out the real interval between
//! ticks.

use chrono::{DateTime, Duration, Utc};

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::SimulationConfig;

/// How the clock produces tick times
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockMode {
    /// Every tick reads the current UTC time
    WallClock,
    /// Every tick advances `current` by `step`
    Stepped {
        /// Time of the next tick
        current: DateTime<Utc>,
        /// Distance between ticks
        step: Duration,
    },
}

/// Source of tick timestamps
#[derive(Debug, Clone)]
pub struct SimulationClock {
    mode: ClockMode,
}

impl SimulationClock {
    /// Clock following real time
    pub fn wall() -> Self {
        Self { mode: ClockMode::WallClock }
    }

    /// Clock starting at `start` and advancing by `step` per tick
    pub fn stepped(start: DateTime<Utc>, step: Duration) -> Self {
        Self { mode: ClockMode::Stepped { current: start, step } }
    }

    /// Stepped clock when the configuration pins a start time, wall clock otherwise
    ///
    /// Fails when the interval does not fit a clock step.
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        let Some(start) = config.start_time else {
            return Ok(Self::wall());
        };

        let step = i64::try_from(config.interval_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                SimulationError::configuration_error(format!(
                    "interval of {}s does not fit a clock step",
                    config.interval_seconds
                ))
            })?;
        Ok(Self::stepped(start, step))
    }

    /// Clock mode
    pub fn mode(&self) -> &ClockMode {
        &self.mode
    }

    /// Whether ticks follow real time
    pub fn is_wall_clock(&self) -> bool {
        matches!(self.mode, ClockMode::WallClock)
    }

    /// Time of the tick about to run; a stepped clock moves on by one step
    pub fn next_tick_time(&mut self) -> DateTime<Utc> {
        match &mut self.mode {
            ClockMode::WallClock => Utc::now(),
            ClockMode::Stepped { current, step } => {
                let now = *current;
                *current = now + *step;
                now
            }
        }
    }

    /// Time the next tick would carry, without advancing
    pub fn current_time(&self) -> DateTime<Utc> {
        match &self.mode {
            ClockMode::WallClock => Utc::now(),
            ClockMode::Stepped { current, .. } => *current,
        }
    }

    /// Move a stepped clock forward by `seconds`; no effect on the wall clock
    pub fn advance_time(&mut self, seconds: i64) {
        if let ClockMode::Stepped { current, .. } = &mut self.mode {
            *current += Duration::seconds(seconds);
        }
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::wall()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stepped_clock() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut clock = SimulationClock::stepped(start, Duration::seconds(30));

        assert_eq!(clock.next_tick_time(), start);
        assert_eq!(clock.next_tick_time(), start + Duration::seconds(30));
        assert_eq!(clock.current_time(), start + Duration::seconds(60));

        clock.advance_time(3600);
        assert_eq!(clock.next_tick_time(), start + Duration::seconds(3660));
        assert!(!clock.is_wall_clock());
    }

    #[test]
    fn test_clock_from_config() {
        let config = SimulationConfig::default();
        assert!(SimulationClock::from_config(&config).unwrap().is_wall_clock());

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let config = SimulationConfig { start_time: Some(start), interval_seconds: 5, ..Default::default() };
        let clock = SimulationClock::from_config(&config).unwrap();
        assert_eq!(
            clock.mode(),
            &ClockMode::Stepped { current: start, step: Duration::seconds(5) }
        );
    }

    #[test]
    fn test_clock_rejects_unrepresentable_steps() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        for interval_seconds in [10_000_000_000_000_000, u64::MAX] {
            let config =
                SimulationConfig { start_time: Some(start), interval_seconds, ..Default::default() };
            match SimulationClock::from_config(&config) {
                Err(error @ SimulationError::ConfigurationError(_)) => {
                    assert!(!error.is_recoverable())
                }
                other => panic!("Expected a configuration error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_one_day_step_moves_forward() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let config =
            SimulationConfig { start_time: Some(start), interval_seconds: 86_400, ..Default::default() };
        let mut clock = SimulationClock::from_config(&config).unwrap();

        assert_eq!(clock.next_tick_time(), start);
        assert_eq!(clock.next_tick_time(), start + Duration::days(1));
    }

    #[test]
    fn test_wall_clock_tracks_now() {
        let mut clock = SimulationClock::wall();
        let before = Utc::now();
        let tick = clock.next_tick_time();
        assert!(tick >= before);
        clock.advance_time(100);
        assert!(clock.current_time() < before + Duration::seconds(100));
    }
}
