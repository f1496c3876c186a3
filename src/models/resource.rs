use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    TechTeam,
    SupportAgent,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::TechTeam => "TECH_TEAM",
            ResourceKind::SupportAgent => "SUPPORT_AGENT",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for ResourceKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SUPPORT_AGENT" => ResourceKind::SupportAgent,
            _ => ResourceKind::TechTeam,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    Available,
    Busy,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Available => "AVAILABLE",
            ResourceStatus::Busy => "BUSY",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for ResourceStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "BUSY" => ResourceStatus::Busy,
            _ => ResourceStatus::Available,
        }
    }
}

/// A capacity-limited team or agent that serves assignments.
///
/// The stored status is derived state: BUSY exactly when the count of
/// ASSIGNED assignments on this resource has reached capacity. Both are
/// updated inside the same transaction that changes the assignment set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub kind: ResourceKind,
    pub city: String,
    pub capacity: i64,
    pub status: ResourceStatus,
}

impl Resource {
    pub fn new(id: String, kind: ResourceKind, city: String, capacity: i64) -> Self {
        Self {
            id,
            kind,
            city,
            capacity,
            status: ResourceStatus::Available,
        }
    }
}

/// A resource together with its active assignment count at lookup time.
#[derive(Debug, Clone)]
pub struct ResourceWithLoad {
    pub resource: Resource,
    pub active_assignments: i64,
}

impl ResourceWithLoad {
    pub fn has_spare_capacity(&self) -> bool {
        self.active_assignments < self.resource.capacity
    }
}
