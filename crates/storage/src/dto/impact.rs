use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Category, ImpactMetric};

/// Request payload for logging a sustainability action
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LogImpactRequest {
    #[validate(length(min = 1, max = 255, message = "User id is required"))]
    pub user_id: String,

    pub category: Category,

    #[validate(range(exclusive_min = 0.0, message = "Value must be greater than zero"))]
    pub value: f64,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Response after logging an activity: the stored metric plus the points it
/// earned and the user's new total.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityLoggedResponse {
    pub metric: ImpactMetric,
    pub points_awarded: i64,
    pub total_points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_values() {
        let mut req = LogImpactRequest {
            user_id: "user-1".into(),
            category: Category::Water,
            value: 0.0,
            description: None,
        };
        assert!(req.validate().is_err());

        req.value = -3.0;
        assert!(req.validate().is_err());

        req.value = 12.5;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_empty_user_id() {
        let req = LogImpactRequest {
            user_id: String::new(),
            category: Category::Energy,
            value: 1.0,
            description: None,
        };
        assert!(req.validate().is_err());
    }
}
