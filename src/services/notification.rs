use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::{Notification, RequestType, ServiceCategory};

/// Mock outbound notification channel.
///
/// Delivery is simulated by persisting an in-app notification; the call site
/// contract is fire-and-forget, so failures are logged and never surface to
/// the allocation cycle.
#[derive(Clone)]
pub struct NotificationService {
    db: Database,
}

impl NotificationService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn notify_assignment(
        &self,
        requester_id: &str,
        requester_name: &str,
        category: ServiceCategory,
        request_type: RequestType,
    ) {
        let notification = Notification::new(
            requester_id.to_string(),
            format!(
                "{}, your {} request ({}) has been prioritized and is now being handled.",
                requester_name, category, request_type
            ),
        );

        match self.db.insert_notification(&notification).await {
            Ok(()) => {
                tracing::info!(
                    "Notification sent to {}: {}",
                    requester_id,
                    notification.message
                );
            }
            Err(e) => {
                tracing::warn!("Failed to deliver notification to {}: {}", requester_id, e);
            }
        }
    }

    pub async fn notifications_for(&self, requester_id: &str) -> DomainResult<Vec<Notification>> {
        self.db.list_notifications_for_requester(requester_id).await
    }

    pub async fn mark_read(&self, notification_id: &str) -> DomainResult<bool> {
        self.db.mark_notification_read(notification_id).await
    }
}
