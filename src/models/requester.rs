use serde::{Deserialize, Serialize};

/// A person (or account) that submits service requests.
///
/// Requesters are reference data owned by the ingestion side; the scheduler
/// only ever reads them for locality and notification display names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requester {
    pub id: String,
    pub name: String,
    pub city: String,
    pub created_at: String,
}

impl Requester {
    pub fn new(name: String, city: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            city,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
