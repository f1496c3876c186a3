use crate::database::Database;
use crate::errors::{DomainError, DomainResult};
use crate::models::{Assignment, RequestStatus, Resource, ResourceStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_assignment(row: &SqliteRow) -> Result<Assignment, sqlx::Error> {
    Ok(Assignment {
        id: row.try_get("id")?,
        request_id: row.try_get("request_id")?,
        resource_id: row.try_get("resource_id")?,
        priority_score: row.try_get("priority_score")?,
        status: row.try_get::<String, _>("status")?.into(),
        assigned_at: row.try_get("assigned_at")?,
        expected_completion_at: row.try_get("expected_completion_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}

/// Result of an atomic assignment attempt.
#[derive(Debug)]
pub enum AssignOutcome {
    /// Assignment created; request is ASSIGNED. Carries the resource as it
    /// looks after the write and whether this write flipped it to BUSY.
    Assigned {
        resource: Resource,
        became_busy: bool,
    },
    /// The resource reached capacity between match and write.
    ResourceFull,
    /// The request left PENDING between snapshot and write (e.g. a
    /// concurrent pass assigned it first).
    RequestUnavailable,
}

/// Result of an atomic completion.
#[derive(Debug)]
pub enum CompleteOutcome {
    Completed {
        resource: Resource,
        became_available: bool,
    },
    /// The assignment was no longer ASSIGNED (already completed elsewhere).
    AlreadyCompleted,
}

impl Database {
    /// Create an assignment and transition its request PENDING -> ASSIGNED as
    /// one atomic unit.
    ///
    /// The capacity recount and the request check-and-set both happen inside
    /// the transaction, so concurrent passes can neither overfill a resource
    /// nor double-assign a request.
    pub async fn assign_request(
        &self,
        assignment: &Assignment,
        processed_at: &str,
    ) -> DomainResult<AssignOutcome> {
        let mut tx = self.pool.begin().await?;

        // Recount under the transaction; the matcher's count may be stale.
        let active: i64 = sqlx::query(
            "SELECT COUNT(*) AS n FROM assignments WHERE resource_id = ? AND status = 'ASSIGNED'",
        )
        .bind(&assignment.resource_id)
        .fetch_one(&mut *tx)
        .await?
        .try_get("n")?;

        let resource_row = sqlx::query(
            "SELECT id, kind, city, capacity, status FROM resources WHERE id = ?",
        )
        .bind(&assignment.resource_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            DomainError::NotFound(format!("Resource not found: {}", assignment.resource_id))
        })?;

        let capacity: i64 = resource_row.try_get("capacity")?;
        if active >= capacity {
            tx.rollback().await?;
            return Ok(AssignOutcome::ResourceFull);
        }

        let current_status: RequestStatus = sqlx::query(
            "SELECT status FROM service_requests WHERE id = ?",
        )
        .bind(&assignment.request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            DomainError::NotFound(format!("Request not found: {}", assignment.request_id))
        })?
        .try_get::<String, _>("status")?
        .into();

        if !current_status.can_transition_to(RequestStatus::Assigned) {
            tx.rollback().await?;
            return Ok(AssignOutcome::RequestUnavailable);
        }

        // Check-and-set on the request's status; the SELECT above is only a
        // pre-check, this conditional write is what makes it race-safe.
        let updated = sqlx::query(
            "UPDATE service_requests
             SET status = 'ASSIGNED', processed_at = ?
             WHERE id = ? AND status = 'PENDING'",
        )
        .bind(processed_at)
        .bind(&assignment.request_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(AssignOutcome::RequestUnavailable);
        }

        sqlx::query(
            "INSERT INTO assignments
                 (id, request_id, resource_id, priority_score, status,
                  assigned_at, expected_completion_at, completed_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&assignment.id)
        .bind(&assignment.request_id)
        .bind(&assignment.resource_id)
        .bind(assignment.priority_score)
        .bind(assignment.status.as_str())
        .bind(&assignment.assigned_at)
        .bind(&assignment.expected_completion_at)
        .bind(&assignment.completed_at)
        .execute(&mut *tx)
        .await?;

        let became_busy = active + 1 >= capacity;
        if became_busy {
            sqlx::query("UPDATE resources SET status = 'BUSY' WHERE id = ?")
                .bind(&assignment.resource_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let mut resource = Resource {
            id: resource_row.try_get("id")?,
            kind: resource_row.try_get::<String, _>("kind")?.into(),
            city: resource_row.try_get("city")?,
            capacity,
            status: resource_row.try_get::<String, _>("status")?.into(),
        };
        let was_busy = resource.status == ResourceStatus::Busy;
        if became_busy {
            resource.status = ResourceStatus::Busy;
        }

        Ok(AssignOutcome::Assigned {
            resource,
            became_busy: became_busy && !was_busy,
        })
    }

    /// Complete an assignment, its request, and free capacity atomically.
    ///
    /// An assignment that is no longer ASSIGNED is reported, not an error; a
    /// request that is not ASSIGNED while its assignment was is state
    /// corruption and surfaces as a Conflict.
    pub async fn complete_assignment(
        &self,
        assignment_id: &str,
        completed_at: &str,
    ) -> DomainResult<CompleteOutcome> {
        let mut tx = self.pool.begin().await?;

        let assignment_row = sqlx::query(
            "SELECT id, request_id, resource_id, priority_score, status,
                    assigned_at, expected_completion_at, completed_at
             FROM assignments
             WHERE id = ?",
        )
        .bind(assignment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("Assignment not found: {}", assignment_id)))?;

        let updated = sqlx::query(
            "UPDATE assignments
             SET status = 'COMPLETED', completed_at = ?
             WHERE id = ? AND status = 'ASSIGNED'",
        )
        .bind(completed_at)
        .bind(assignment_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(CompleteOutcome::AlreadyCompleted);
        }

        let request_id: String = assignment_row.try_get("request_id")?;
        let request_updated = sqlx::query(
            "UPDATE service_requests
             SET status = 'COMPLETED'
             WHERE id = ? AND status = 'ASSIGNED'",
        )
        .bind(&request_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if request_updated == 0 {
            // An ASSIGNED assignment whose request is not ASSIGNED means the
            // two went out of step; abort rather than paper over it.
            tx.rollback().await?;
            return Err(DomainError::Conflict(format!(
                "Request {} is not ASSIGNED while its assignment {} is",
                request_id, assignment_id
            )));
        }

        let resource_id: String = assignment_row.try_get("resource_id")?;
        let active_after: i64 = sqlx::query(
            "SELECT COUNT(*) AS n FROM assignments WHERE resource_id = ? AND status = 'ASSIGNED'",
        )
        .bind(&resource_id)
        .fetch_one(&mut *tx)
        .await?
        .try_get("n")?;

        let resource_row =
            sqlx::query("SELECT id, kind, city, capacity, status FROM resources WHERE id = ?")
                .bind(&resource_id)
                .fetch_one(&mut *tx)
                .await?;

        let capacity: i64 = resource_row.try_get("capacity")?;
        let previous_status: ResourceStatus =
            resource_row.try_get::<String, _>("status")?.into();
        let became_available =
            previous_status == ResourceStatus::Busy && active_after < capacity;
        if became_available {
            sqlx::query("UPDATE resources SET status = 'AVAILABLE' WHERE id = ?")
                .bind(&resource_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let resource = Resource {
            id: resource_id,
            kind: resource_row.try_get::<String, _>("kind")?.into(),
            city: resource_row.try_get("city")?,
            capacity,
            status: if became_available || previous_status == ResourceStatus::Available {
                ResourceStatus::Available
            } else {
                ResourceStatus::Busy
            },
        };

        Ok(CompleteOutcome::Completed {
            resource,
            became_available,
        })
    }

    pub async fn get_assignment_by_id(&self, id: &str) -> DomainResult<Option<Assignment>> {
        let row = sqlx::query(
            "SELECT id, request_id, resource_id, priority_score, status,
                    assigned_at, expected_completion_at, completed_at
             FROM assignments
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_assignment(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_active_assignment_for_request(
        &self,
        request_id: &str,
    ) -> DomainResult<Option<Assignment>> {
        let row = sqlx::query(
            "SELECT id, request_id, resource_id, priority_score, status,
                    assigned_at, expected_completion_at, completed_at
             FROM assignments
             WHERE request_id = ? AND status = 'ASSIGNED'",
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_assignment(&row)?)),
            None => Ok(None),
        }
    }

    /// ASSIGNED assignments whose simulated service window has elapsed.
    pub async fn list_due_assignments(&self, now: &str) -> DomainResult<Vec<Assignment>> {
        let rows = sqlx::query(
            "SELECT id, request_id, resource_id, priority_score, status,
                    assigned_at, expected_completion_at, completed_at
             FROM assignments
             WHERE status = 'ASSIGNED' AND expected_completion_at <= ?
             ORDER BY expected_completion_at",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        let mut assignments = Vec::with_capacity(rows.len());
        for row in rows {
            assignments.push(row_to_assignment(&row)?);
        }
        Ok(assignments)
    }

    pub async fn list_active_assignments(&self) -> DomainResult<Vec<Assignment>> {
        let rows = sqlx::query(
            "SELECT id, request_id, resource_id, priority_score, status,
                    assigned_at, expected_completion_at, completed_at
             FROM assignments
             WHERE status = 'ASSIGNED'
             ORDER BY assigned_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut assignments = Vec::with_capacity(rows.len());
        for row in rows {
            assignments.push(row_to_assignment(&row)?);
        }
        Ok(assignments)
    }

    /// Demo reset: drop all assignments from a previous run.
    pub async fn clear_assignments(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM assignments")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
