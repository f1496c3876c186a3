use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::{PriorityRule, RuleSet};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_rule(row: &SqliteRow) -> Result<PriorityRule, sqlx::Error> {
    Ok(PriorityRule {
        id: row.try_get("id")?,
        category: row.try_get::<String, _>("category")?.into(),
        key: row.try_get("key")?,
        condition: row.try_get("condition")?,
        weight: row.try_get("weight")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_rule(&self, rule: &PriorityRule) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO priority_rules
                 (id, category, key, condition, weight, active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&rule.id)
        .bind(rule.category.as_str())
        .bind(&rule.key)
        .bind(&rule.condition)
        .bind(rule.weight)
        .bind(rule.active)
        .bind(&rule.created_at)
        .bind(&rule.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fresh snapshot of the active rules. Called once per cycle; the engine
    /// never caches a snapshot across cycles.
    pub async fn load_active_rules(&self) -> DomainResult<RuleSet> {
        let rows = sqlx::query(
            "SELECT id, category, key, condition, weight, active, created_at, updated_at
             FROM priority_rules
             WHERE active = 1
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut rules = Vec::with_capacity(rows.len());
        for row in rows {
            rules.push(row_to_rule(&row)?);
        }
        Ok(RuleSet::from_rules(rules))
    }

    pub async fn list_rules(&self) -> DomainResult<Vec<PriorityRule>> {
        let rows = sqlx::query(
            "SELECT id, category, key, condition, weight, active, created_at, updated_at
             FROM priority_rules
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut rules = Vec::with_capacity(rows.len());
        for row in rows {
            rules.push(row_to_rule(&row)?);
        }
        Ok(rules)
    }

    pub async fn update_rule_weight(&self, id: &str, weight: i64) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE priority_rules SET weight = ?, updated_at = ? WHERE id = ?",
        )
        .bind(weight)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_rule_active(&self, id: &str, active: bool) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE priority_rules SET active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(active)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_rule(&self, id: &str) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM priority_rules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_rules(&self) -> DomainResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM priority_rules")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }
}
