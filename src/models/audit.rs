use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    RequestCreated,
    RequestQueued,
    AssignmentCreated,
    AssignmentCompleted,
    ResourceBusy,
    ResourceAvailable,
    SchedulerStarted,
    SchedulerStopped,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::RequestCreated => "REQUEST_CREATED",
            AuditEventType::RequestQueued => "REQUEST_QUEUED",
            AuditEventType::AssignmentCreated => "ASSIGNMENT_CREATED",
            AuditEventType::AssignmentCompleted => "ASSIGNMENT_COMPLETED",
            AuditEventType::ResourceBusy => "RESOURCE_BUSY",
            AuditEventType::ResourceAvailable => "RESOURCE_AVAILABLE",
            AuditEventType::SchedulerStarted => "SCHEDULER_STARTED",
            AuditEventType::SchedulerStopped => "SCHEDULER_STOPPED",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for AuditEventType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "REQUEST_QUEUED" => AuditEventType::RequestQueued,
            "ASSIGNMENT_CREATED" => AuditEventType::AssignmentCreated,
            "ASSIGNMENT_COMPLETED" => AuditEventType::AssignmentCompleted,
            "RESOURCE_BUSY" => AuditEventType::ResourceBusy,
            "RESOURCE_AVAILABLE" => AuditEventType::ResourceAvailable,
            "SCHEDULER_STARTED" => AuditEventType::SchedulerStarted,
            "SCHEDULER_STOPPED" => AuditEventType::SchedulerStopped,
            _ => AuditEventType::RequestCreated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEntityType {
    Request,
    Assignment,
    Resource,
    System,
}

impl AuditEntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntityType::Request => "REQUEST",
            AuditEntityType::Assignment => "ASSIGNMENT",
            AuditEntityType::Resource => "RESOURCE",
            AuditEntityType::System => "SYSTEM",
        }
    }
}

impl fmt::Display for AuditEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for AuditEntityType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "REQUEST" => AuditEntityType::Request,
            "ASSIGNMENT" => AuditEntityType::Assignment,
            "RESOURCE" => AuditEntityType::Resource,
            _ => AuditEntityType::System,
        }
    }
}

/// One append-only audit record for a state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub event_type: AuditEventType,
    pub entity_type: AuditEntityType,
    pub entity_id: Option<String>,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub created_at: String,
}

impl AuditLogEntry {
    pub fn new(
        event_type: AuditEventType,
        entity_type: AuditEntityType,
        entity_id: Option<String>,
        message: String,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            entity_type,
            entity_id,
            message,
            details,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
