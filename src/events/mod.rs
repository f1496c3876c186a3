use crate::models::{Assignment, Resource, ServiceRequest};
use tokio::sync::broadcast;

/// Events the scheduler publishes for external observers (dashboard,
/// webhooks, analytics). `DashboardRefresh` is coalesced: one per cycle, not
/// one per request.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    RequestCreated(ServiceRequest),
    AssignmentCreated(Assignment),
    AssignmentCompleted(Assignment),
    ResourceStatusChanged(Resource),
    DashboardRefresh,
    SchedulerStarted,
    SchedulerStopped,
}

impl SystemEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SystemEvent::RequestCreated(_) => "request.created",
            SystemEvent::AssignmentCreated(_) => "assignment.created",
            SystemEvent::AssignmentCompleted(_) => "assignment.completed",
            SystemEvent::ResourceStatusChanged(_) => "resource.status_changed",
            SystemEvent::DashboardRefresh => "dashboard.refresh",
            SystemEvent::SchedulerStarted => "scheduler.started",
            SystemEvent::SchedulerStopped => "scheduler.stopped",
        }
    }
}

/// Event bus for publishing and subscribing to system events
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SystemEvent>,
}

impl EventBus {
    /// Create a new event bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event to all subscribers (non-blocking, fire-and-forget)
    pub fn publish(&self, event: SystemEvent) {
        tracing::trace!("Publishing event: {}", event.kind());
        // No subscribers is a normal state for a headless run
        if self.tx.receiver_count() > 0 {
            if let Err(e) = self.tx.send(event) {
                tracing::warn!("Failed to publish event: {}", e);
            }
        }
    }

    /// Subscribe to events (returns a receiver)
    pub fn subscribe(&self) -> broadcast::Receiver<SystemEvent> {
        self.tx.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1000)
    }
}
