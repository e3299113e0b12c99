//! Database provider trait
//!
//! The seam between the HTTP handlers and the actual database. Handlers are
//! generic over this trait, which also lets tests run against an in-memory
//! provider instead of a live Postgres.

use crate::schema::{ColumnInfo, Filter, Row};
use async_trait::async_trait;
use thiserror::Error;

/// Catalog introspection and filtered row fetching
#[async_trait]
pub trait DatabaseProvider: Send + Sync + 'static {
    /// List all base table names in the public schema, alphabetically
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError>;

    /// Columns of a table in ordinal order
    ///
    /// Returns an empty vector (not an error) when the table is unknown or
    /// has no columns. Callers distinguish "not found" by checking emptiness.
    async fn columns_for_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError>;

    /// Fetch rows matching the given filters, up to `limit`
    ///
    /// Re-queries the catalog on every call, validates each filter against
    /// the live column set, and fails before executing any row SQL if a
    /// filter references an unknown column or operator.
    async fn fetch_rows(
        &self,
        table: &str,
        filters: &[Filter],
        limit: i64,
    ) -> Result<Vec<Row>, DatabaseError>;

    /// Cheap connectivity probe for the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Database and request-validation errors
///
/// Display strings double as the machine-readable `error` field in API
/// responses, so they are part of the wire contract.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No table name was supplied
    #[error("table required")]
    MissingTable,

    /// The named table does not exist (or has no columns)
    #[error("table not found")]
    TableNotFound(String),

    /// A filter referenced a column outside the table's current column set
    #[error("invalid column: {0}")]
    InvalidColumn(String),

    /// A filter used an operator outside the allowed set
    ///
    /// Carries the rejected token lowercased, the form it was parsed in.
    #[error("invalid op: {0}")]
    InvalidOp(String),

    /// The database itself failed mid-query
    #[error("database error: {0}")]
    Query(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_matches_wire_contract() {
        assert_eq!(DatabaseError::MissingTable.to_string(), "table required");
        assert_eq!(
            DatabaseError::TableNotFound("ghost".to_string()).to_string(),
            "table not found"
        );
        assert_eq!(
            DatabaseError::InvalidColumn("ghost".to_string()).to_string(),
            "invalid column: ghost"
        );
        assert_eq!(
            DatabaseError::InvalidOp("!=".to_string()).to_string(),
            "invalid op: !="
        );
    }
}
