//! Table and column listing endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error_response;
use crate::database::traits::DatabaseProvider;
use crate::schema::{ColumnsResponse, TablesResponse};

/// Handler for GET /api/tables
///
/// Returns all base table names in the public schema, alphabetically.
pub async fn list_tables_handler<DB: DatabaseProvider>(
    State(database): State<Arc<DB>>,
) -> Response {
    match database.list_tables().await {
        Ok(tables) => (StatusCode::OK, Json(TablesResponse { tables })).into_response(),
        Err(error) => {
            tracing::error!(%error, "failed to list tables");
            error_response(&error)
        }
    }
}

/// Query parameters for GET /api/columns
#[derive(Debug, Deserialize)]
pub struct ColumnsParams {
    pub table: Option<String>,
}

/// Handler for GET /api/columns?table=name
///
/// Returns the table's columns in ordinal order. The introspector reports an
/// unknown table as an empty column set, which maps to 404 here.
pub async fn list_columns_handler<DB: DatabaseProvider>(
    State(database): State<Arc<DB>>,
    Query(params): Query<ColumnsParams>,
) -> Response {
    // An empty param is as good as a missing one
    let Some(table) = params.table.filter(|table| !table.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "table param required" })),
        )
            .into_response();
    };

    match database.columns_for_table(&table).await {
        Ok(columns) if columns.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "table not found or has no columns" })),
        )
            .into_response(),
        Ok(columns) => (StatusCode::OK, Json(ColumnsResponse { columns })).into_response(),
        Err(error) => {
            tracing::error!(%table, %error, "failed to list columns");
            error_response(&error)
        }
    }
}
