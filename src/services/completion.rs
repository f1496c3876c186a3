use crate::database::{CompleteOutcome, Database};
use crate::errors::DomainResult;
use crate::events::{EventBus, SystemEvent};
use crate::models::AssignmentStatus;
use crate::services::allocation::AllocationService;
use crate::services::audit_log::AuditLogService;
use chrono::Utc;
use std::sync::Arc;

/// Counters for one completion tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompletionOutcome {
    pub completed: usize,
    pub backfilled: usize,
}

/// Advances due assignments to COMPLETED and frees their capacity.
///
/// Whenever a tick frees capacity it immediately runs the allocation
/// backfill pass, so queued requests do not wait for the next allocation
/// tick.
pub struct CompletionService {
    db: Database,
    event_bus: EventBus,
    audit: AuditLogService,
    allocation: Arc<AllocationService>,
}

impl CompletionService {
    pub fn new(db: Database, event_bus: EventBus, allocation: Arc<AllocationService>) -> Self {
        Self {
            audit: AuditLogService::new(db.clone()),
            db,
            event_bus,
            allocation,
        }
    }

    pub async fn run_cycle(&self) -> DomainResult<CompletionOutcome> {
        let now = Utc::now();
        let now_str = now.to_rfc3339();
        let due = self.db.list_due_assignments(&now_str).await?;
        if due.is_empty() {
            return Ok(CompletionOutcome::default());
        }

        let mut outcome = CompletionOutcome::default();
        for assignment in due {
            match self.db.complete_assignment(&assignment.id, &now_str).await? {
                CompleteOutcome::Completed {
                    resource,
                    became_available,
                } => {
                    outcome.completed += 1;

                    let duration_ms = assignment
                        .assigned_at_datetime()
                        .map(|assigned| (now - assigned).num_milliseconds())
                        .unwrap_or(0);
                    tracing::info!(
                        "Completed assignment {} after {}ms",
                        assignment.id,
                        duration_ms
                    );

                    let mut completed = assignment.clone();
                    completed.status = AssignmentStatus::Completed;
                    completed.completed_at = Some(now_str.clone());

                    self.audit
                        .log_assignment_completed(&completed, duration_ms)
                        .await;
                    if became_available {
                        self.audit.log_resource_available(&resource).await;
                        self.event_bus
                            .publish(SystemEvent::ResourceStatusChanged(resource.clone()));
                    }
                    self.event_bus
                        .publish(SystemEvent::AssignmentCompleted(completed));
                }
                CompleteOutcome::AlreadyCompleted => {
                    tracing::debug!(
                        "Assignment {} was already completed, skipping",
                        assignment.id
                    );
                }
            }
        }

        if outcome.completed > 0 {
            outcome.backfilled = self.allocation.backfill_queued().await?.assigned;
            self.event_bus.publish(SystemEvent::DashboardRefresh);
        }

        Ok(outcome)
    }
}
