use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Upcoming,
    Active,
    Completed,
}

/// Aggregate numbers over a challenge's participant records.
///
/// `completion_rate` is the exact fraction of participants that have
/// completed, in [0, 1]. It is always recomputed from counts, never set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChallengeMetrics {
    pub total_participants: i64,
    pub completion_rate: f64,
    pub total_impact: f64,
}

impl ChallengeMetrics {
    pub fn recompute(total_participants: i64, completed: i64, total_impact: f64) -> Self {
        let completion_rate = if total_participants > 0 {
            completed as f64 / total_participants as f64
        } else {
            0.0
        };
        Self {
            total_participants,
            completion_rate,
            total_impact,
        }
    }
}

/// A time-boxed, point-rewarding group activity. Participant and completion
/// sets are assembled from per-participant records; `completed_by` is a
/// subset of `participants` by construction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Challenge {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub points: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_by: String,
    pub participants: Vec<String>,
    pub completed_by: Vec<String>,
    pub metrics: ChallengeMetrics,
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    /// Status is derived from the time window, never stored.
    pub fn status_at(&self, now: DateTime<Utc>) -> ChallengeStatus {
        if now < self.start_date {
            ChallengeStatus::Upcoming
        } else if now < self.end_date {
            ChallengeStatus::Active
        } else {
            ChallengeStatus::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn metrics_recompute_exact_fraction() {
        let m = ChallengeMetrics::recompute(4, 1, 12.5);
        assert_eq!(m.total_participants, 4);
        assert_eq!(m.completion_rate, 0.25);
        assert_eq!(m.total_impact, 12.5);
    }

    #[test]
    fn metrics_recompute_empty_challenge() {
        let m = ChallengeMetrics::recompute(0, 0, 0.0);
        assert_eq!(m.completion_rate, 0.0);
    }

    #[test]
    fn status_follows_time_window() {
        let now = Utc::now();
        let challenge = Challenge {
            id: Uuid::new_v4(),
            title: "Zero Waste Week".into(),
            description: String::new(),
            category: Category::Waste,
            points: 150,
            start_date: now + Duration::days(1),
            end_date: now + Duration::days(8),
            created_by: "admin".into(),
            participants: vec![],
            completed_by: vec![],
            metrics: ChallengeMetrics::recompute(0, 0, 0.0),
            created_at: now,
        };

        assert_eq!(challenge.status_at(now), ChallengeStatus::Upcoming);
        assert_eq!(
            challenge.status_at(now + Duration::days(3)),
            ChallengeStatus::Active
        );
        assert_eq!(
            challenge.status_at(now + Duration::days(9)),
            ChallengeStatus::Completed
        );
    }
}
