//! Engagement analytics
//!
//! Derived from the active detections of the current tick: the more confident
//! the presence returns in a zone, the longer and more engaged the visit.

use chrono::{DateTime, Utc};

use crate::models::round_to;
use crate::readings::{UserEngagement, VisitorDetection};
use crate::simulation::EngagementHistory;
use crate::zones::ZoneRegistry;

/// Longest engagement duration, reached at 100 % confidence
const MAX_ENGAGEMENT_SECONDS: f64 = 300.0;

/// Shortest duration reported for a zone with any active detection
const MIN_ENGAGEMENT_SECONDS: f64 = 5.0;

/// Per-zone engagement duration and score
#[derive(Debug, Clone, Default)]
pub struct EngagementModel;

impl EngagementModel {
    /// Create the model
    pub fn new() -> Self {
        Self
    }

    /// Produce one engagement record per zone and extend the score history
    pub fn tick(
        &self,
        now: DateTime<Utc>,
        registry: &ZoneRegistry,
        detections: &[VisitorDetection],
        history: &mut EngagementHistory,
    ) -> Vec<UserEngagement> {
        registry
            .iter()
            .map(|zone| {
                let (count, confidence_sum) = detections
                    .iter()
                    .filter(|d| d.zone == zone.id && d.detection_active)
                    .fold((0usize, 0.0), |(count, sum), d| (count + 1, sum + d.confidence_level));

                let (duration, score) = if count > 0 {
                    let ratio = confidence_sum / count as f64 / 100.0;
                    ((ratio * MAX_ENGAGEMENT_SECONDS).max(MIN_ENGAGEMENT_SECONDS), ratio.min(1.0))
                } else {
                    (0.0, 0.0)
                };

                history.push(zone.id, score);

                UserEngagement {
                    timestamp: now,
                    zone: zone.id,
                    average_engagement_duration_sec: round_to(duration, 1),
                    engagement_score: round_to(score, 3),
                }
            })
            .collect()
    }
}
