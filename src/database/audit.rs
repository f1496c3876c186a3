use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::{AuditEntityType, AuditEventType, AuditLogEntry};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_entry(row: &SqliteRow) -> Result<AuditLogEntry, sqlx::Error> {
    let details: Option<String> = row.try_get("details")?;
    Ok(AuditLogEntry {
        id: row.try_get("id")?,
        event_type: row.try_get::<String, _>("event_type")?.into(),
        entity_type: row.try_get::<String, _>("entity_type")?.into(),
        entity_id: row.try_get("entity_id")?,
        message: row.try_get("message")?,
        details: details.and_then(|d| serde_json::from_str(&d).ok()),
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn insert_audit_entry(&self, entry: &AuditLogEntry) -> DomainResult<()> {
        let details = entry
            .details
            .as_ref()
            .map(|d| d.to_string());

        sqlx::query(
            "INSERT INTO audit_log
                 (id, event_type, entity_type, entity_id, message, details, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(entry.event_type.as_str())
        .bind(entry.entity_type.as_str())
        .bind(&entry.entity_id)
        .bind(&entry.message)
        .bind(details)
        .bind(&entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Newest-first audit entries with optional event/entity filters.
    pub async fn list_audit_entries(
        &self,
        event_type: Option<AuditEventType>,
        entity_type: Option<AuditEntityType>,
        limit: i64,
        offset: i64,
    ) -> DomainResult<Vec<AuditLogEntry>> {
        let rows = sqlx::query(
            "SELECT id, event_type, entity_type, entity_id, message, details, created_at
             FROM audit_log
             WHERE (?1 IS NULL OR event_type = ?1)
               AND (?2 IS NULL OR entity_type = ?2)
             ORDER BY created_at DESC
             LIMIT ?3 OFFSET ?4",
        )
        .bind(event_type.map(|e| e.as_str()))
        .bind(entity_type.map(|e| e.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(row_to_entry(&row)?);
        }
        Ok(entries)
    }

    pub async fn recent_audit_entries(&self, limit: i64) -> DomainResult<Vec<AuditLogEntry>> {
        self.list_audit_entries(None, None, limit, 0).await
    }
}
