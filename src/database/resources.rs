use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::{Resource, ResourceWithLoad};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_resource(row: &SqliteRow) -> Result<Resource, sqlx::Error> {
    Ok(Resource {
        id: row.try_get("id")?,
        kind: row.try_get::<String, _>("kind")?.into(),
        city: row.try_get("city")?,
        capacity: row.try_get("capacity")?,
        status: row.try_get::<String, _>("status")?.into(),
    })
}

impl Database {
    pub async fn create_resource(&self, resource: &Resource) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO resources (id, kind, city, capacity, status)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&resource.id)
        .bind(resource.kind.as_str())
        .bind(&resource.city)
        .bind(resource.capacity)
        .bind(resource.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_resource_by_id(&self, id: &str) -> DomainResult<Option<Resource>> {
        let row = sqlx::query(
            "SELECT id, kind, city, capacity, status
             FROM resources
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_resource(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_resources(&self) -> DomainResult<Vec<Resource>> {
        let rows = sqlx::query(
            "SELECT id, kind, city, capacity, status
             FROM resources
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut resources = Vec::with_capacity(rows.len());
        for row in rows {
            resources.push(row_to_resource(&row)?);
        }
        Ok(resources)
    }

    /// Resources with their current ASSIGNED count, lowest id first so the
    /// matcher's tie-break is deterministic. Pass a city to scope the search.
    pub async fn list_resources_with_load(
        &self,
        city: Option<&str>,
    ) -> DomainResult<Vec<ResourceWithLoad>> {
        let sql = "SELECT r.id, r.kind, r.city, r.capacity, r.status,
                          (SELECT COUNT(*) FROM assignments a
                           WHERE a.resource_id = r.id AND a.status = 'ASSIGNED') AS active_assignments
                   FROM resources r
                   WHERE (?1 IS NULL OR r.city = ?1)
                   ORDER BY r.id";

        let rows = sqlx::query(sql).bind(city).fetch_all(&self.pool).await?;

        let mut loaded = Vec::with_capacity(rows.len());
        for row in rows {
            loaded.push(ResourceWithLoad {
                resource: row_to_resource(&row)?,
                active_assignments: row.try_get("active_assignments")?,
            });
        }
        Ok(loaded)
    }

    pub async fn count_active_assignments(&self, resource_id: &str) -> DomainResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM assignments WHERE resource_id = ? AND status = 'ASSIGNED'",
        )
        .bind(resource_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("n")?)
    }

    pub async fn count_resources(&self) -> DomainResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM resources")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }

    /// Demo reset: every resource starts the run AVAILABLE.
    pub async fn reset_resources_available(&self) -> DomainResult<()> {
        sqlx::query("UPDATE resources SET status = 'AVAILABLE'")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
