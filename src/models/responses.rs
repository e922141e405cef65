use serde::{Deserialize, Serialize};

/// Plain message body, used for the root greeting and for every outcome
/// of the like endpoint (success or failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response for the profile listing endpoint. Profiles carry their raw
/// stored attributes, so they stay untyped here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesResponse {
    pub users: Vec<serde_json::Value>,
}

/// Error body for authentication failures and the profile listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
