use serde::{Deserialize, Serialize};

/// Profile document as the reconciler sees it: the document id plus the
/// set of user ids this profile has liked. All other stored attributes
/// pass through the store untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub id: String,
    #[serde(default)]
    pub likes: Vec<String>,
}

impl ProfileDocument {
    pub fn has_liked(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }
}

/// Mutual match between two users. Created once when reciprocity is
/// detected; never updated or deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    pub user1: String,
    pub user2: String,
    /// Assigned by the store at creation time; absent until the server
    /// timestamp has been resolved.
    #[serde(default)]
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}
