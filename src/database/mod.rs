use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub mod assignments;
pub mod audit;
pub mod notifications;
pub mod requesters;
pub mod requests;
pub mod resources;
pub mod rules;
pub mod seed;

pub use assignments::{AssignOutcome, CompleteOutcome};

/// Storage access for all scheduler entities.
///
/// All queries are runtime-bound; multi-entity writes (assign, complete) run
/// inside a single transaction so capacity counts and request status can
/// never drift apart.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("migrations/sqlite").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
