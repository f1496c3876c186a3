use std::env;

/// Scheduler timing and storage configuration.
///
/// Values come from the environment with demo-paced defaults: a new request
/// every 2s, allocation checks every 1s, completion checks every 0.5s, and
/// simulated service durations of 10-15s.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub allocation_tick_ms: u64,
    pub completion_tick_ms: u64,
    pub min_completion_ms: u64,
    pub max_completion_ms: u64,
    pub request_feed_ms: u64,
    pub waiting_bonus_per_second: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://allocdesk.db?mode=rwc".to_string());

        let allocation_tick_ms = parse_env_u64("ALLOCATION_TICK_MS", 1000)?;
        let completion_tick_ms = parse_env_u64("COMPLETION_TICK_MS", 500)?;
        let min_completion_ms = parse_env_u64("MIN_COMPLETION_MS", 10_000)?;
        let max_completion_ms = parse_env_u64("MAX_COMPLETION_MS", 15_000)?;
        let request_feed_ms = parse_env_u64("REQUEST_FEED_MS", 2000)?;

        let waiting_bonus_per_second = env::var("WAITING_BONUS_PER_SECOND")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .map_err(|_| ConfigError::InvalidValue("WAITING_BONUS_PER_SECOND"))?
            .unwrap_or(2);

        if min_completion_ms > max_completion_ms {
            return Err(ConfigError::InvalidCompletionWindow);
        }

        Ok(Config {
            database_url,
            allocation_tick_ms,
            completion_tick_ms,
            min_completion_ms,
            max_completion_ms,
            request_feed_ms,
            waiting_bonus_per_second,
        })
    }
}

fn parse_env_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),

    #[error("MIN_COMPLETION_MS must not exceed MAX_COMPLETION_MS")]
    InvalidCompletionWindow,
}
