use std::sync::Arc;

use assistant::Assistant;
use storage::Store;

use crate::middleware::auth::ApiKeys;

/// Shared handler state: the injected store backend, the AI assistant, and
/// the accepted API keys.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub assistant: Arc<Assistant>,
    pub api_keys: ApiKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, assistant: Arc<Assistant>, api_keys: ApiKeys) -> Self {
        Self {
            store,
            assistant,
            api_keys,
        }
    }
}
