use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::{RequestStatus, ServiceRequest};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_request(row: &SqliteRow) -> Result<ServiceRequest, sqlx::Error> {
    Ok(ServiceRequest {
        id: row.try_get("id")?,
        requester_id: row.try_get("requester_id")?,
        service_category: row.try_get::<String, _>("service_category")?.into(),
        request_type: row.try_get::<String, _>("request_type")?.into(),
        urgency_level: row.try_get::<String, _>("urgency_level")?.into(),
        status: row.try_get::<String, _>("status")?.into(),
        submitted_at: row.try_get("submitted_at")?,
        queued_at: row.try_get("queued_at")?,
        processed_at: row.try_get("processed_at")?,
    })
}

impl Database {
    pub async fn create_request(&self, request: &ServiceRequest) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO service_requests
                 (id, requester_id, service_category, request_type, urgency_level, status,
                  submitted_at, queued_at, processed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.id)
        .bind(&request.requester_id)
        .bind(request.service_category.as_str())
        .bind(request.request_type.as_str())
        .bind(request.urgency_level.as_str())
        .bind(request.status.as_str())
        .bind(&request.submitted_at)
        .bind(&request.queued_at)
        .bind(&request.processed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_request_by_id(&self, id: &str) -> DomainResult<Option<ServiceRequest>> {
        let row = sqlx::query(
            "SELECT id, requester_id, service_category, request_type, urgency_level, status,
                    submitted_at, queued_at, processed_at
             FROM service_requests
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_request(&row)?)),
            None => Ok(None),
        }
    }

    /// Snapshot of every PENDING request, oldest submission first.
    pub async fn list_pending_requests(&self) -> DomainResult<Vec<ServiceRequest>> {
        let rows = sqlx::query(
            "SELECT id, requester_id, service_category, request_type, urgency_level, status,
                    submitted_at, queued_at, processed_at
             FROM service_requests
             WHERE status = 'PENDING'
             ORDER BY submitted_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut requests = Vec::with_capacity(rows.len());
        for row in rows {
            requests.push(row_to_request(&row)?);
        }
        Ok(requests)
    }

    /// PENDING requests that have already been through a failed match attempt.
    pub async fn list_queued_pending_requests(&self) -> DomainResult<Vec<ServiceRequest>> {
        let rows = sqlx::query(
            "SELECT id, requester_id, service_category, request_type, urgency_level, status,
                    submitted_at, queued_at, processed_at
             FROM service_requests
             WHERE status = 'PENDING' AND queued_at IS NOT NULL
             ORDER BY submitted_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut requests = Vec::with_capacity(rows.len());
        for row in rows {
            requests.push(row_to_request(&row)?);
        }
        Ok(requests)
    }

    /// Set `queued_at` the first time no resource is found. Returns true only
    /// when this call actually stamped the request.
    pub async fn mark_request_queued(&self, id: &str, queued_at: &str) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE service_requests
             SET queued_at = ?
             WHERE id = ? AND status = 'PENDING' AND queued_at IS NULL",
        )
        .bind(queued_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_requests_with_status(&self, status: RequestStatus) -> DomainResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM service_requests WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }

    /// Demo reset: drop every request from a previous run that never finished.
    /// COMPLETED history is kept.
    pub async fn clear_transient_requests(&self) -> DomainResult<u64> {
        let result =
            sqlx::query("DELETE FROM service_requests WHERE status IN ('PENDING', 'ASSIGNED')")
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
