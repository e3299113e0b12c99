//! REST API endpoints
//!
//! Handlers are generic over [`DatabaseProvider`] so the router can be
//! exercised in tests with an in-memory provider.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::database::traits::{DatabaseError, DatabaseProvider};

pub mod data;
pub mod tables;

pub use data::{get_data_handler, post_data_handler};
pub use tables::{list_columns_handler, list_tables_handler};

/// Create the API router with all endpoints and state attached
pub fn create_api_router<DB: DatabaseProvider>(database: Arc<DB>) -> Router {
    Router::new()
        .route("/tables", get(list_tables_handler::<DB>))
        .route("/columns", get(list_columns_handler::<DB>))
        .route(
            "/data",
            get(get_data_handler::<DB>).post(post_data_handler::<DB>),
        )
        .route("/health", get(health_handler::<DB>))
        .with_state(database)
}

/// Map a database error to its HTTP status and `{"error": ..}` body
///
/// Validation failures are client errors; anything the database raises
/// mid-query (e.g. a type mismatch on a bound value) is a 500.
pub(crate) fn error_response(error: &DatabaseError) -> Response {
    let status = match error {
        DatabaseError::MissingTable
        | DatabaseError::InvalidColumn(_)
        | DatabaseError::InvalidOp(_) => StatusCode::BAD_REQUEST,
        DatabaseError::TableNotFound(_) => StatusCode::NOT_FOUND,
        DatabaseError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}

/// Handler for GET /api/health
///
/// Probes the pool with `SELECT 1`; 503 when the database is unreachable.
pub async fn health_handler<DB: DatabaseProvider>(State(database): State<Arc<DB>>) -> Response {
    match database.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok" })),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%error, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}
