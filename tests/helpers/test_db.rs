use allocdesk::config::Config;
use allocdesk::database::Database;
use uuid::Uuid;

/// Connect to a throwaway file-based SQLite database (unique name per test
/// for parallel execution) and apply migrations.
pub async fn setup_test_db() -> Database {
    let temp_file = format!("test_{}.db", Uuid::new_v4());
    let db_url = format!("sqlite://{}?mode=rwc", temp_file);

    let db = Database::connect(&db_url)
        .await
        .expect("Failed to connect to test database");

    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    db
}

/// Config with demo-paced completion windows for tests that only need
/// structure, not timing.
pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        allocation_tick_ms: 1000,
        completion_tick_ms: 500,
        min_completion_ms: 10_000,
        max_completion_ms: 15_000,
        request_feed_ms: 2000,
        waiting_bonus_per_second: 2,
    }
}

/// Config with very short ticks for lifecycle tests that run real timers.
pub fn fast_config() -> Config {
    Config {
        database_url: String::new(),
        allocation_tick_ms: 20,
        completion_tick_ms: 10,
        min_completion_ms: 30,
        max_completion_ms: 60,
        request_feed_ms: 25,
        waiting_bonus_per_second: 2,
    }
}
