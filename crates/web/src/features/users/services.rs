use storage::{Store, dto::user::SyncUserRequest, error::Result, models::User};

/// Mirror the identity tuple into the store, creating the user on first
/// sign-in and refreshing the profile afterwards.
pub async fn sync_user(store: &dyn Store, req: &SyncUserRequest) -> Result<User> {
    store.upsert_user(req).await
}

pub async fn get_user(store: &dyn Store, user_id: &str) -> Result<Option<User>> {
    store.get_user(user_id).await
}
