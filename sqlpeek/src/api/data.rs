//! Filtered row fetching endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error_response;
use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::schema::{default_limit, DataRequest, Filter, RowsResponse};

/// Query parameters for GET /api/data
///
/// GET deliberately accepts no filters; filtered queries go through the POST
/// body. The GET form exists for quick curl inspection of a table.
#[derive(Debug, Deserialize)]
pub struct DataParams {
    pub table: Option<String>,
    pub limit: Option<i64>,
}

/// Handler for GET /api/data?table=name&limit=n
pub async fn get_data_handler<DB: DatabaseProvider>(
    State(database): State<Arc<DB>>,
    Query(params): Query<DataParams>,
) -> Response {
    let limit = params.limit.unwrap_or_else(default_limit);
    fetch_rows_response(database.as_ref(), params.table, &[], limit).await
}

/// Handler for POST /api/data
///
/// Body carries the table, an ordered filter list, and a row limit.
pub async fn post_data_handler<DB: DatabaseProvider>(
    State(database): State<Arc<DB>>,
    Json(request): Json<DataRequest>,
) -> Response {
    fetch_rows_response(
        database.as_ref(),
        request.table,
        &request.filters,
        request.limit,
    )
    .await
}

async fn fetch_rows_response<DB: DatabaseProvider>(
    database: &DB,
    table: Option<String>,
    filters: &[Filter],
    limit: i64,
) -> Response {
    // An empty table name is as good as a missing one
    let Some(table) = table.filter(|table| !table.is_empty()) else {
        return error_response(&DatabaseError::MissingTable);
    };

    match database.fetch_rows(&table, filters, limit).await {
        Ok(rows) => {
            let count = rows.len();
            (StatusCode::OK, Json(RowsResponse { rows, count })).into_response()
        }
        Err(error) => {
            tracing::warn!(%table, %error, "row fetch rejected");
            error_response(&error)
        }
    }
}
