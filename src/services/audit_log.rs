use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::{
    Assignment, AuditEntityType, AuditEventType, AuditLogEntry, Resource, ServiceRequest,
};
use serde_json::json;

/// Append-only audit trail for every scheduler state transition.
///
/// Writes are best-effort: a failed audit insert is logged and swallowed so
/// it can never fail the cycle that produced it.
#[derive(Clone)]
pub struct AuditLogService {
    db: Database,
}

impl AuditLogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn append(&self, entry: AuditLogEntry) {
        if let Err(e) = self.db.insert_audit_entry(&entry).await {
            tracing::warn!(
                "Failed to write audit entry {} ({}): {}",
                entry.id,
                entry.event_type,
                e
            );
        }
    }

    pub async fn log_request_created(&self, request: &ServiceRequest) {
        self.append(AuditLogEntry::new(
            AuditEventType::RequestCreated,
            AuditEntityType::Request,
            Some(request.id.clone()),
            format!("New request submitted: {}", request.id),
            Some(json!({
                "requester_id": request.requester_id,
                "service_category": request.service_category,
                "request_type": request.request_type,
                "urgency_level": request.urgency_level,
            })),
        ))
        .await;
    }

    pub async fn log_request_queued(&self, request_id: &str, priority_score: i64, reason: &str) {
        self.append(AuditLogEntry::new(
            AuditEventType::RequestQueued,
            AuditEntityType::Request,
            Some(request_id.to_string()),
            format!("Request queued: {}", request_id),
            Some(json!({
                "priority_score": priority_score,
                "reason": reason,
            })),
        ))
        .await;
    }

    pub async fn log_assignment_created(&self, assignment: &Assignment) {
        self.append(AuditLogEntry::new(
            AuditEventType::AssignmentCreated,
            AuditEntityType::Assignment,
            Some(assignment.id.clone()),
            format!(
                "Assignment created: {} -> {}",
                assignment.request_id, assignment.resource_id
            ),
            Some(json!({
                "request_id": assignment.request_id,
                "resource_id": assignment.resource_id,
                "priority_score": assignment.priority_score,
                "expected_completion_at": assignment.expected_completion_at,
            })),
        ))
        .await;
    }

    pub async fn log_assignment_completed(&self, assignment: &Assignment, duration_ms: i64) {
        self.append(AuditLogEntry::new(
            AuditEventType::AssignmentCompleted,
            AuditEntityType::Assignment,
            Some(assignment.id.clone()),
            format!("Assignment completed: {}", assignment.id),
            Some(json!({
                "request_id": assignment.request_id,
                "resource_id": assignment.resource_id,
                "duration_ms": duration_ms,
                "duration_seconds": duration_ms / 1000,
            })),
        ))
        .await;
    }

    pub async fn log_resource_busy(&self, resource: &Resource) {
        self.append(AuditLogEntry::new(
            AuditEventType::ResourceBusy,
            AuditEntityType::Resource,
            Some(resource.id.clone()),
            format!("Resource at capacity: {}", resource.id),
            Some(json!({
                "city": resource.city,
                "kind": resource.kind,
                "capacity": resource.capacity,
            })),
        ))
        .await;
    }

    pub async fn log_resource_available(&self, resource: &Resource) {
        self.append(AuditLogEntry::new(
            AuditEventType::ResourceAvailable,
            AuditEntityType::Resource,
            Some(resource.id.clone()),
            format!("Resource available again: {}", resource.id),
            Some(json!({
                "city": resource.city,
                "kind": resource.kind,
                "capacity": resource.capacity,
            })),
        ))
        .await;
    }

    pub async fn log_scheduler_started(&self) {
        self.append(AuditLogEntry::new(
            AuditEventType::SchedulerStarted,
            AuditEntityType::System,
            None,
            "Scheduler started".to_string(),
            None,
        ))
        .await;
    }

    pub async fn log_scheduler_stopped(&self) {
        self.append(AuditLogEntry::new(
            AuditEventType::SchedulerStopped,
            AuditEntityType::System,
            None,
            "Scheduler stopped".to_string(),
            None,
        ))
        .await;
    }

    /// Read side for external observers (dashboard, ops tooling).
    pub async fn recent_entries(&self, limit: i64) -> DomainResult<Vec<AuditLogEntry>> {
        self.db.recent_audit_entries(limit).await
    }
}
