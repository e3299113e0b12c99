//! Standalone sqlpeek server
//!
//! Reads connection settings from the environment, verifies database
//! connectivity before serving, and drains the pool on shutdown. A database
//! that cannot be reached at startup is fatal; failures during individual
//! requests are not.

use sqlpeek::SqlPeekLayer;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env();
    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        user = %config.user,
        "connecting to postgres"
    );

    let pool = match connect(&config).await {
        Ok(pool) => pool,
        Err(error) => {
            error!(%error, "cannot connect to postgres");
            std::process::exit(1);
        }
    };

    let app = SqlPeekLayer::postgres(pool.clone())
        .into_router()
        .layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(error) => {
            error!(address = %config.bind_addr, %error, "cannot bind listener");
            std::process::exit(1);
        }
    };

    info!(address = %config.bind_addr, "listening");

    if let Err(error) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(%error, "server error");
    }

    // Explicit drain: return checked-out connections and close the pool
    info!("shutting down, closing pool");
    pool.close().await;
}

async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        // Liveness check on checkout so idle-connection drops are tolerated
        .test_before_acquire(true)
        .connect_with(config.connect_options())
        .await?;

    // Verify connectivity once before serving
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(pool)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to install ctrl-c handler");
    }
}
