use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::require_api_key;
use crate::state::AppState;

use super::handlers::{list_messages, post_message};

pub fn routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, require_api_key);

    Router::new().route(
        "/",
        get(list_messages).merge(post(post_message).route_layer(auth)),
    )
}
