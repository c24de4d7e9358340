//! The one authoritative scoring schedule, plus derived-impact conversions.
//!
//! Every point a user ever earns flows through this module and lands via
//! `Store::add_points`; nothing downstream (leaderboard included) recomputes
//! points on its own.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::challenge::ProgressResponse;
use crate::dto::impact::{ActivityLoggedResponse, LogImpactRequest};
use crate::error::Result;
use crate::models::{Category, Challenge, ImpactMetric};
use crate::store::Store;

/// Points per unit of logged impact, applied as `round(value * 2)`.
pub const ACTIVITY_POINTS_PER_UNIT: f64 = 2.0;
/// Width of a progress step that earns a bonus.
pub const PROGRESS_STEP_PERCENT: i64 = 20;
/// Bonus for each newly crossed progress step.
pub const PROGRESS_STEP_POINTS: i64 = 20;
/// Flat award for completing a challenge.
pub const COMPLETION_POINTS: i64 = 50;

// Environmental equivalence factors. An average shower runs ~10 L/min, 1 kWh
// drives a 10 W LED for ~100 h, a plastic bottle weighs ~50 g, a car emits
// ~1/6 kg CO₂ per km, and a tree absorbs ~21 kg CO₂ per year.
pub const SHOWER_LITERS_PER_MINUTE: f64 = 10.0;
pub const LED_HOURS_PER_KWH: f64 = 100.0;
pub const PLASTIC_BOTTLES_PER_KG: f64 = 20.0;
pub const CAR_KM_PER_KG_CO2: f64 = 6.0;
pub const TREE_KG_CO2_PER_YEAR: f64 = 21.0;

pub fn activity_points(value: f64) -> i64 {
    (value * ACTIVITY_POINTS_PER_UNIT).round() as i64
}

/// Bonus for moving a participant's progress from `previous` to `current`
/// percent: each 20% boundary crossed on the way up earns a fixed bonus.
/// Moving down or standing still earns nothing, so replaying a percentage
/// can never double-award.
pub fn progress_points(previous: i64, current: i64) -> i64 {
    if current <= previous {
        return 0;
    }
    let steps = current / PROGRESS_STEP_PERCENT - previous / PROGRESS_STEP_PERCENT;
    steps * PROGRESS_STEP_POINTS
}

/// Per-category sums over a user's logged metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTotals {
    pub water: f64,
    pub energy: f64,
    pub waste: f64,
    pub transport: f64,
    pub other: f64,
}

impl CategoryTotals {
    pub fn from_metrics(metrics: &[ImpactMetric]) -> Self {
        let mut totals = Self::default();
        for metric in metrics {
            match metric.category {
                Category::Water => totals.water += metric.value,
                Category::Energy => totals.energy += metric.value,
                Category::Waste => totals.waste += metric.value,
                Category::Transport => totals.transport += metric.value,
                Category::Other => totals.other += metric.value,
            }
        }
        totals
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Water => self.water,
            Category::Energy => self.energy,
            Category::Waste => self.waste,
            Category::Transport => self.transport,
            Category::Other => self.other,
        }
    }
}

/// Tangible equivalents of the raw totals, rounded for display the same way
/// the metric cards show them (whole numbers, trees to one decimal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Equivalents {
    pub shower_minutes: f64,
    pub led_hours: f64,
    pub plastic_bottles: f64,
    pub car_km: f64,
    pub trees_per_year: f64,
}

impl Equivalents {
    pub fn from_totals(totals: &CategoryTotals) -> Self {
        Self {
            shower_minutes: (totals.water / SHOWER_LITERS_PER_MINUTE).round(),
            led_hours: (totals.energy * LED_HOURS_PER_KWH).round(),
            plastic_bottles: (totals.waste * PLASTIC_BOTTLES_PER_KG).round(),
            car_km: (totals.transport * CAR_KM_PER_KG_CO2).round(),
            trees_per_year: ((totals.transport / TREE_KG_CO2_PER_YEAR) * 10.0).round() / 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ImpactSummary {
    pub totals: CategoryTotals,
    pub equivalents: Equivalents,
}

/// Outcome of completing a challenge.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub challenge: Challenge,
    pub points_awarded: i64,
}

/// Persist a logged activity and award its points in one step.
pub async fn log_activity(
    store: &dyn Store,
    req: &LogImpactRequest,
) -> Result<ActivityLoggedResponse> {
    let metric = store.add_impact_metric(req).await?;
    let points_awarded = activity_points(metric.value);
    let total_points = store.add_points(&metric.user_id, points_awarded).await?;

    Ok(ActivityLoggedResponse {
        metric,
        points_awarded,
        total_points,
    })
}

/// Record a participant's progress and award any newly crossed steps.
pub async fn record_progress(
    store: &dyn Store,
    challenge_id: Uuid,
    user_id: &str,
    percent: i64,
) -> Result<ProgressResponse> {
    let update = store.record_progress(challenge_id, user_id, percent).await?;
    let points_awarded = progress_points(update.previous_percent, update.current_percent);
    if points_awarded > 0 {
        store.add_points(user_id, points_awarded).await?;
    }

    Ok(ProgressResponse {
        challenge_id,
        user_id: user_id.to_string(),
        previous_percent: update.previous_percent,
        current_percent: update.current_percent,
        points_awarded,
    })
}

/// Mark a challenge completed for a participant and award the flat bonus.
pub async fn complete_challenge(
    store: &dyn Store,
    challenge_id: Uuid,
    user_id: &str,
    impact_value: f64,
) -> Result<CompletionOutcome> {
    let challenge = store
        .complete_challenge(challenge_id, user_id, impact_value)
        .await?;
    store.add_points(user_id, COMPLETION_POINTS).await?;

    Ok(CompletionOutcome {
        challenge,
        points_awarded: COMPLETION_POINTS,
    })
}

/// Totals and tangible equivalents over a user's whole history.
pub async fn impact_summary(store: &dyn Store, user_id: &str) -> Result<ImpactSummary> {
    let metrics = store.user_impact_metrics(user_id).await?;
    let totals = CategoryTotals::from_metrics(&metrics);
    let equivalents = Equivalents::from_totals(&totals);

    Ok(ImpactSummary { totals, equivalents })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::challenge::CreateChallengeRequest;
    use crate::dto::user::SyncUserRequest;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn metric_with(category: Category, value: f64) -> ImpactMetric {
        ImpactMetric {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            category,
            value,
            description: None,
            logged_at: Utc::now(),
        }
    }

    #[test]
    fn activity_points_round_twice_the_value() {
        assert_eq!(activity_points(50.0), 100);
        assert_eq!(activity_points(0.3), 1);
        assert_eq!(activity_points(0.2), 0);
        assert_eq!(activity_points(12.6), 25);
    }

    #[test]
    fn progress_points_award_each_crossed_step() {
        assert_eq!(progress_points(0, 20), 20);
        assert_eq!(progress_points(0, 100), 100);
        assert_eq!(progress_points(20, 40), 20);
        assert_eq!(progress_points(35, 45), 20);
        assert_eq!(progress_points(40, 40), 0);
        assert_eq!(progress_points(60, 40), 0);
        assert_eq!(progress_points(19, 20), 20);
        assert_eq!(progress_points(0, 19), 0);
    }

    #[test]
    fn category_totals_sum_per_category() {
        let metrics = vec![
            metric_with(Category::Water, 30.0),
            metric_with(Category::Water, 20.0),
            metric_with(Category::Energy, 5.0),
            metric_with(Category::Transport, 42.0),
        ];
        let totals = CategoryTotals::from_metrics(&metrics);
        assert_eq!(totals.water, 50.0);
        assert_eq!(totals.energy, 5.0);
        assert_eq!(totals.waste, 0.0);
        assert_eq!(totals.transport, 42.0);
    }

    #[test]
    fn equivalents_use_fixed_conversions() {
        let totals = CategoryTotals {
            water: 50.0,
            energy: 25.0,
            waste: 3.0,
            transport: 15.0,
            other: 0.0,
        };
        let eq = Equivalents::from_totals(&totals);
        assert_eq!(eq.shower_minutes, 5.0);
        assert_eq!(eq.led_hours, 2500.0);
        assert_eq!(eq.plastic_bottles, 60.0);
        assert_eq!(eq.car_km, 90.0);
        assert_eq!(eq.trees_per_year, 0.7);
    }

    fn profile(id: &str) -> SyncUserRequest {
        SyncUserRequest {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{id}@example.com"),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn log_activity_awards_twice_the_value() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1")).await.unwrap();

        let logged = log_activity(
            &store,
            &LogImpactRequest {
                user_id: "u1".into(),
                category: Category::Water,
                value: 50.0,
                description: Some("Shorter showers".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(logged.points_awarded, 100);
        assert_eq!(logged.total_points, 100);
        assert_eq!(
            store.get_user("u1").await.unwrap().unwrap().points,
            100
        );
    }

    #[tokio::test]
    async fn five_progress_steps_award_hundred_bonus_points() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1")).await.unwrap();
        let challenge = store
            .create_challenge(&CreateChallengeRequest {
                title: "Zero Waste Week".into(),
                description: String::new(),
                category: Category::Waste,
                points: 100,
                duration_days: 7,
                created_by: "admin".into(),
            })
            .await
            .unwrap();
        store.join_challenge(challenge.id, "u1").await.unwrap();

        let mut awarded = 0;
        for percent in [20, 40, 60, 80, 100] {
            let progress = record_progress(&store, challenge.id, "u1", percent)
                .await
                .unwrap();
            awarded += progress.points_awarded;
        }

        assert_eq!(awarded, 100);
        assert_eq!(store.get_user("u1").await.unwrap().unwrap().points, 100);
    }

    #[tokio::test]
    async fn replaying_a_percentage_does_not_double_award() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1")).await.unwrap();
        let challenge = store
            .create_challenge(&CreateChallengeRequest {
                title: "Bike Month".into(),
                description: String::new(),
                category: Category::Transport,
                points: 100,
                duration_days: 30,
                created_by: "admin".into(),
            })
            .await
            .unwrap();
        store.join_challenge(challenge.id, "u1").await.unwrap();

        let first = record_progress(&store, challenge.id, "u1", 40).await.unwrap();
        assert_eq!(first.points_awarded, 40);
        let replay = record_progress(&store, challenge.id, "u1", 40).await.unwrap();
        assert_eq!(replay.points_awarded, 0);
        assert_eq!(store.get_user("u1").await.unwrap().unwrap().points, 40);
    }

    #[tokio::test]
    async fn completion_awards_flat_bonus() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1")).await.unwrap();
        let challenge = store
            .create_challenge(&CreateChallengeRequest {
                title: "Water Conservation Challenge".into(),
                description: String::new(),
                category: Category::Water,
                points: 100,
                duration_days: 7,
                created_by: "admin".into(),
            })
            .await
            .unwrap();
        store.join_challenge(challenge.id, "u1").await.unwrap();

        let outcome = complete_challenge(&store, challenge.id, "u1", 20.0)
            .await
            .unwrap();

        assert_eq!(outcome.points_awarded, COMPLETION_POINTS);
        assert_eq!(outcome.challenge.metrics.completion_rate, 1.0);
        assert_eq!(outcome.challenge.metrics.total_impact, 20.0);
        assert_eq!(store.get_user("u1").await.unwrap().unwrap().points, 50);
    }

    #[tokio::test]
    async fn summary_combines_totals_and_equivalents() {
        let store = MemoryStore::new();
        store.upsert_user(&profile("u1")).await.unwrap();
        for (category, value) in [(Category::Water, 50.0), (Category::Energy, 25.0)] {
            store
                .add_impact_metric(&LogImpactRequest {
                    user_id: "u1".into(),
                    category,
                    value,
                    description: None,
                })
                .await
                .unwrap();
        }

        let summary = impact_summary(&store, "u1").await.unwrap();
        assert_eq!(summary.totals.water, 50.0);
        assert_eq!(summary.equivalents.shower_minutes, 5.0);
        assert_eq!(summary.equivalents.led_hours, 2500.0);
    }
}
