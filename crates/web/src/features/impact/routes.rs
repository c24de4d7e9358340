use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_api_key;
use crate::state::AppState;

use super::handlers::{list_metrics, log_activity, summary};

pub fn routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, require_api_key);

    Router::new()
        .route("/", post(log_activity).route_layer(auth))
        .route("/:user_id", get(list_metrics))
        .route("/:user_id/summary", get(summary))
}
