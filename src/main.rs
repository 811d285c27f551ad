//! Loyalty points backend entry point.
//!
//! ```text
//! ┌────────┐    ┌──────────┐    ┌────────────┐    ┌──────────┐
//! │ Config │───▶│ Database │───▶│ HTTP + the │───▶│ axum::   │
//! │        │    │ (sqlx)   │    │ pipeline   │    │ serve    │
//! └────────┘    └──────────┘    └────────────┘    └──────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use gophermart_loyalty::accrual::{self, HttpAccrualClient, PipelineConfig};
use gophermart_loyalty::balance::BalanceService;
use gophermart_loyalty::config::Config;
use gophermart_loyalty::db::Database;
use gophermart_loyalty::http::build_router;
use gophermart_loyalty::http::state::AppState;
use gophermart_loyalty::logging::init_logging;
use gophermart_loyalty::user_auth::AuthService;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    init_logging();

    tracing::info!(
        address = %config.run_address,
        git_hash = env!("GIT_HASH"),
        "starting loyalty-server"
    );

    let db = Database::connect(&config.database_uri, config.db_pool_size).await?;

    let auth = AuthService::new(db.pool().clone(), config.jwt_secret.clone());
    let balance = BalanceService::new(db.clone());
    let state = AppState::new(db.clone(), auth, balance);

    let accrual_client: Arc<dyn accrual::AccrualClient> =
        Arc::new(HttpAccrualClient::new(config.accrual_system_address.clone()));
    let pipeline = accrual::pipeline::start(
        db,
        accrual_client,
        PipelineConfig {
            workers: config.workers,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
        },
    );

    let app = build_router(state);
    let listener = TcpListener::bind(&config.run_address).await?;

    tracing::info!("listening on {}", config.run_address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pipeline.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
