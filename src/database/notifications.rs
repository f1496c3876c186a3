use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::Notification;
use sqlx::Row;

impl Database {
    pub async fn insert_notification(&self, notification: &Notification) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO notifications (id, requester_id, message, read, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&notification.id)
        .bind(&notification.requester_id)
        .bind(&notification.message)
        .bind(notification.read)
        .bind(&notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_notifications_for_requester(
        &self,
        requester_id: &str,
    ) -> DomainResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, requester_id, message, read, created_at
             FROM notifications
             WHERE requester_id = ?
             ORDER BY created_at DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        let mut notifications = Vec::with_capacity(rows.len());
        for row in rows {
            notifications.push(Notification {
                id: row.try_get("id")?,
                requester_id: row.try_get("requester_id")?,
                message: row.try_get("message")?,
                read: row.try_get("read")?,
                created_at: row.try_get("created_at")?,
            });
        }
        Ok(notifications)
    }

    pub async fn mark_notification_read(&self, id: &str) -> DomainResult<bool> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
