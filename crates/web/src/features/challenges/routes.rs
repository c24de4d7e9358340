use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_api_key;
use crate::state::AppState;

use super::handlers::{
    active_challenges, complete_challenge, create_challenge, get_challenge, join_challenge,
    record_progress, user_challenges,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, require_api_key);

    Router::new()
        .route("/", post(create_challenge).route_layer(auth.clone()))
        .route("/active", get(active_challenges))
        .route("/user/:user_id", get(user_challenges))
        .route("/:challenge_id", get(get_challenge))
        .route(
            "/:challenge_id/join",
            post(join_challenge).route_layer(auth.clone()),
        )
        .route(
            "/:challenge_id/progress",
            post(record_progress).route_layer(auth.clone()),
        )
        .route(
            "/:challenge_id/complete",
            post(complete_challenge).route_layer(auth),
        )
}
