use allocdesk::config::Config;
use allocdesk::database::Database;
use allocdesk::events::EventBus;
use allocdesk::services::{RequestFeeder, Scheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "allocdesk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Initialize database connection
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    db.run_migrations().await?;
    tracing::info!("Database migrations applied");

    // Seed demo resources, requesters, and default rules on first run
    if db.seed_demo_data(&config).await? {
        tracing::info!("Demo data seeded");
    }

    let event_bus = EventBus::default();

    let scheduler = Scheduler::new(db.clone(), event_bus.clone(), config.clone());
    let feeder = RequestFeeder::new(db.clone(), event_bus.clone(), config.clone());

    scheduler.start().await?;
    feeder.start().await?;
    tracing::info!(
        "Running: new request every {}ms, allocation every {}ms, completion every {}ms",
        config.request_feed_ms,
        config.allocation_tick_ms,
        config.completion_tick_ms
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    feeder.stop().await?;
    scheduler.stop().await?;

    Ok(())
}
