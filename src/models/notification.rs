use serde::{Deserialize, Serialize};

/// An in-app message for a requester, written when their request is assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub requester_id: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

impl Notification {
    pub fn new(requester_id: String, message: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            requester_id,
            message,
            read: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
