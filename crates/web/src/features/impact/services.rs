use storage::{
    Store,
    dto::impact::{ActivityLoggedResponse, LogImpactRequest},
    error::Result,
    models::ImpactMetric,
    services::scoring::{self, ImpactSummary},
};

/// Store the activity and award its points in one step.
pub async fn log_activity(store: &dyn Store, req: &LogImpactRequest) -> Result<ActivityLoggedResponse> {
    scoring::log_activity(store, req).await
}

pub async fn list_metrics(store: &dyn Store, user_id: &str) -> Result<Vec<ImpactMetric>> {
    store.user_impact_metrics(user_id).await
}

pub async fn summary(store: &dyn Store, user_id: &str) -> Result<ImpactSummary> {
    scoring::impact_summary(store, user_id).await
}
