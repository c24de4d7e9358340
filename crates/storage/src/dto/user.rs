use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// The resolved identity tuple handed over by the auth layer. Mirrored into
/// the store on first sign-in and refreshed on later ones.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SyncUserRequest {
    #[validate(length(min = 1, max = 255, message = "User id is required"))]
    pub id: String,

    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 500))]
    #[serde(default)]
    pub image: String,
}
