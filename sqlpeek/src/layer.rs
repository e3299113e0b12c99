//! SqlPeekLayer - main Axum integration point
//!
//! Bundles the API and frontend routers around a shared database provider.

use crate::api::create_api_router;
use crate::database::postgres::PostgresProvider;
use crate::database::traits::DatabaseProvider;
use crate::frontend::create_frontend_router;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// The full browsing surface over a database provider
///
/// # Example
///
/// ```rust,no_run
/// use sqlpeek::SqlPeekLayer;
/// use sqlx::PgPool;
///
/// # async fn example() {
/// let pool = PgPool::connect("postgres://localhost/postgres").await.unwrap();
/// let app = SqlPeekLayer::postgres(pool).into_router();
/// # }
/// ```
pub struct SqlPeekLayer<DB: DatabaseProvider> {
    database: Arc<DB>,
}

impl<DB: DatabaseProvider> SqlPeekLayer<DB> {
    pub fn new(database: DB) -> Self {
        Self {
            database: Arc::new(database),
        }
    }

    /// Convert into an Axum Router
    ///
    /// The returned router serves:
    /// - the landing page at `/` and assets under `/static/`
    /// - the REST API under `/api/*`
    /// - permissive CORS on everything (inspection tool, not a public API)
    pub fn into_router(self) -> Router {
        Router::new()
            .nest("/api", create_api_router(self.database))
            .merge(create_frontend_router())
            .layer(CorsLayer::permissive())
    }
}

impl SqlPeekLayer<PostgresProvider> {
    /// Create the browsing surface for a PostgreSQL pool
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::new(PostgresProvider::new(pool))
    }
}
