use axum::{Router, middleware, routing::post};

use crate::middleware::auth::require_api_key;
use crate::state::AppState;

use super::handlers::{chat, recommendations, waste_scan};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/recommendations", post(recommendations))
        .route("/waste-scan", post(waste_scan))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}
