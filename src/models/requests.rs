use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to record a like
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeRequest {
    // Defaults to empty when the field is absent so validation, not
    // deserialization, rejects the payload.
    #[validate(length(min = 1))]
    #[serde(default, rename = "toUserId")]
    pub to_user_id: String,
}
