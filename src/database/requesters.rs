use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::Requester;
use sqlx::Row;

impl Database {
    pub async fn create_requester(&self, requester: &Requester) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO requesters (id, name, city, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&requester.id)
        .bind(&requester.name)
        .bind(&requester.city)
        .bind(&requester.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_requester_by_id(&self, id: &str) -> DomainResult<Option<Requester>> {
        let row = sqlx::query(
            "SELECT id, name, city, created_at
             FROM requesters
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            Ok(Some(Requester {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                city: row.try_get("city")?,
                created_at: row.try_get("created_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn list_requesters(&self) -> DomainResult<Vec<Requester>> {
        let rows = sqlx::query(
            "SELECT id, name, city, created_at
             FROM requesters
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut requesters = Vec::with_capacity(rows.len());
        for row in rows {
            requesters.push(Requester {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                city: row.try_get("city")?,
                created_at: row.try_get("created_at")?,
            });
        }
        Ok(requesters)
    }
}
