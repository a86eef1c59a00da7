//! # TaskFlow API Server
//!
//! REST backend for the TaskFlow task manager: task CRUD with filtering,
//! user registration and dashboard analytics.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/taskflow cargo run -p taskflow-api
//! ```

use anyhow::Context;
use std::sync::Arc;
use taskflow_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskflow_shared::{
    db::{
        migrations::{get_migration_status, run_migrations},
        pool::{close_pool, create_pool, get_pool_stats},
    },
    repository::PgRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.api.log_json);

    tracing::info!(
        "TaskFlow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let pool = create_pool(config.pool_config())
        .await
        .context("failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("failed to bootstrap collections")?;

    match get_migration_status(&pool).await {
        Ok(status) => tracing::info!(
            applied = status.applied_migrations,
            latest = ?status.latest_version,
            "Migration status"
        ),
        Err(e) => tracing::warn!("Could not read migration status: {}", e),
    }

    let stats = get_pool_stats(&pool);
    tracing::debug!(
        open = stats.open,
        idle = stats.idle,
        "Connection pool ready"
    );

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgRepository::new(pool.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, draining connections...");
    close_pool(pool).await;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "taskflow_api=debug,taskflow_shared=debug,tower_http=debug".into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
