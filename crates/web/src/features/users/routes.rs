use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_api_key;
use crate::state::AppState;

use super::handlers::{get_user, sync_user};

pub fn routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, require_api_key);

    Router::new()
        .route("/sync", post(sync_user).route_layer(auth))
        .route("/:user_id", get(get_user))
}
