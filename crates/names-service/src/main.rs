//! Names engine service: hourly reminder cron plus a health/ready HTTP
//! surface. The chat/delivery adapter that turns these services into a
//! bot is out of scope here (spec Non-goals) — `inbound` only keeps the
//! concurrency shape such an adapter would plug into.

mod health;
#[allow(dead_code)]
mod inbound;
mod notifier;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use names_config::AppConfig;
use names_core::services::ReminderScheduler;
use names_storage::{
    create_pool, run_migrations, JsonCatalog, PgTransactor, PlanRepository, ProgressRepository,
    ReminderRepository, SettingsRepository,
};

use health::HealthState;
use notifier::TracingNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting names engine service");

    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_db_connections).await?;
    tracing::info!("database connection pool created");

    run_migrations(&pool).await?;
    tracing::info!("database migrations complete");

    let catalog = Arc::new(JsonCatalog::load_from_path(&config.catalog_path).await?);
    tracing::info!(path = %config.catalog_path, "catalog loaded");

    let reminder_store = Arc::new(ReminderRepository::new(pool.clone()));
    let progress_store = Arc::new(ProgressRepository::new(pool.clone()));
    let plan_store = Arc::new(PlanRepository::new(pool.clone()));
    let settings_store = Arc::new(SettingsRepository::new(pool.clone()));
    let notifier = Arc::new(TracingNotifier);
    let transactor = Arc::new(PgTransactor::new(pool.clone()));

    let reminder_scheduler = ReminderScheduler::new(
        reminder_store,
        progress_store,
        plan_store,
        settings_store,
        catalog,
        notifier,
        transactor,
    );

    tokio::spawn(run_reminder_cron(reminder_scheduler));

    let health_state = Arc::new(HealthState {
        pool: pool.clone(),
        start_time: Instant::now(),
    });

    let app = Router::new()
        .route("/v1/health", get(health::health))
        .route("/v1/ready", get(health::ready))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(health_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!(address = %config.bind_address, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Fires `process_hour` aligned to the top of every UTC hour (spec §5's
/// `0 * * * *` cron driver), not merely every 3600s from process start.
async fn run_reminder_cron(scheduler: ReminderScheduler) {
    let next_hour = names_core::clock::truncate_to_hour(Utc::now()) + chrono::Duration::hours(1);
    let first_tick_delay = (next_hour - Utc::now())
        .to_std()
        .unwrap_or(Duration::from_secs(0));
    tokio::time::sleep(first_tick_delay).await;

    let mut ticker = tokio::time::interval(Duration::from_secs(3600));
    loop {
        ticker.tick().await;
        match scheduler.process_hour(Utc::now()).await {
            Ok(dispatched) => tracing::info!(dispatched, "reminder cron tick complete"),
            Err(err) => tracing::error!(error = %err, "reminder cron tick failed"),
        }
    }
}

