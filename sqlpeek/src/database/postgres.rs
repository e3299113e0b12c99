//! PostgreSQL provider: catalog introspection and filtered row fetching
//!
//! All SQL built here interpolates only identifiers that were validated
//! against the live catalog first; every user-supplied value, including the
//! row limit, travels as a positional bound parameter.

use crate::database::traits::{DatabaseError, DatabaseProvider};
use crate::schema::{CellValue, ColumnInfo, Filter, FilterOp, Row};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::Row as _;
use sqlx::{Column, PgPool, Postgres, TypeInfo};

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// PostgreSQL database provider over a shared connection pool
pub struct PostgresProvider {
    pool: PgPool,
}

impl PostgresProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Quote an identifier for interpolation into SQL text
///
/// Postgres uses double quotes for identifiers; embedded double quotes are
/// escaped by doubling them. Identifiers reaching this point have already
/// been checked against the catalog.
fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// A filter value ready for parameter binding, typed by its JSON shape
///
/// No coercion against the column's declared type happens here; a string
/// bound against a numeric column is left to the driver and the database.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl BindValue {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    Self::Int(integer)
                } else if let Some(float) = number.as_f64() {
                    Self::Float(float)
                } else {
                    Self::Text(number.to_string())
                }
            }
            Value::String(text) => Self::Text(text.clone()),
            // Arrays and objects have no binding; pass their JSON rendering
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }
}

/// Wrap a LIKE value with wildcards on both sides
///
/// Fixed substring-match behavior: a value with no wildcard characters still
/// matches as a substring.
fn like_pattern(value: &Value) -> String {
    let raw = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    format!("%{}%", raw)
}

/// Build the conjunctive WHERE clause for a filter list
///
/// One `AND`-joined condition per filter, input order preserved, positional
/// `$n` parameters starting at `$1`. Fails on the first filter whose column
/// is not in `columns` or whose operator does not parse; no SQL is executed
/// for an invalid filter list.
fn build_where_clause(
    filters: &[Filter],
    columns: &[ColumnInfo],
) -> Result<(String, Vec<BindValue>), DatabaseError> {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    for filter in filters {
        if !columns.iter().any(|column| column.name == filter.column) {
            return Err(DatabaseError::InvalidColumn(filter.column.clone()));
        }
        // Echo the rejected token lowercased, matching how it was parsed
        let op = FilterOp::parse(&filter.op)
            .ok_or_else(|| DatabaseError::InvalidOp(filter.op.to_ascii_lowercase()))?;

        let value = if op == FilterOp::Like {
            BindValue::Text(like_pattern(&filter.value))
        } else {
            BindValue::from_json(&filter.value)
        };
        values.push(value);
        conditions.push(format!(
            "{} {} ${}",
            quote_identifier(&filter.column),
            op.sql(),
            values.len()
        ));
    }

    if conditions.is_empty() {
        Ok((String::new(), values))
    } else {
        Ok((format!(" WHERE {}", conditions.join(" AND ")), values))
    }
}

fn bind_value<'q>(query: PgQuery<'q>, value: &'q BindValue) -> PgQuery<'q> {
    match value {
        BindValue::Null => query.bind(None::<String>),
        BindValue::Bool(flag) => query.bind(*flag),
        BindValue::Int(integer) => query.bind(*integer),
        BindValue::Float(float) => query.bind(*float),
        BindValue::Text(text) => query.bind(text.as_str()),
    }
}

/// Convert a result row to an ordered column-to-cell mapping
fn row_to_cells(row: &PgRow) -> Result<Row, DatabaseError> {
    let mut cells = Row::new();
    for column in row.columns() {
        let name = column.name();
        let cell = extract_cell(row, name, column.type_info().name())?;
        cells.insert(name.to_string(), cell);
    }
    Ok(cells)
}

/// Decode a single cell by its Postgres type name
fn extract_cell(row: &PgRow, name: &str, type_name: &str) -> Result<CellValue, DatabaseError> {
    let cell = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(name)?.map(CellValue::Bool),
        "INT2" => row
            .try_get::<Option<i16>, _>(name)?
            .map(|value| CellValue::Int(value as i64)),
        "INT4" => row
            .try_get::<Option<i32>, _>(name)?
            .map(|value| CellValue::Int(value as i64)),
        "INT8" => row.try_get::<Option<i64>, _>(name)?.map(CellValue::Int),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(name)?
            .map(|value| CellValue::Float(value as f64)),
        "FLOAT8" => row.try_get::<Option<f64>, _>(name)?.map(CellValue::Float),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(name)?.map(CellValue::Text)
        }
        "BYTEA" => row
            .try_get::<Option<Vec<u8>>, _>(name)?
            .map(|bytes| CellValue::Bytes(format!("[{} bytes]", bytes.len()))),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(name)?
            .map(|value| CellValue::Timestamp(value.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name)?
            .map(|value| CellValue::Timestamp(value.to_rfc3339())),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(name)?
            .map(|value| CellValue::Timestamp(value.to_string())),
        "TIME" => row
            .try_get::<Option<chrono::NaiveTime>, _>(name)?
            .map(|value| CellValue::Timestamp(value.to_string())),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(name)?
            .map(|value| CellValue::Text(value.to_string())),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(name)?
            .map(|value| CellValue::Text(value.to_string())),
        // NUMERIC has no lossless decode without a decimal crate; fall
        // through to the string attempt and render null on failure
        _ => row
            .try_get::<Option<String>, _>(name)
            .ok()
            .flatten()
            .map(CellValue::Text),
    };
    Ok(cell.unwrap_or(CellValue::Null))
}

#[async_trait]
impl DatabaseProvider for PostgresProvider {
    async fn list_tables(&self) -> Result<Vec<String>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = 'public'
              AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            tables.push(row.try_get("table_name")?);
        }
        Ok(tables)
    }

    async fn columns_for_table(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT column_name, data_type
            FROM information_schema.columns
            WHERE table_schema = 'public'
              AND table_name = $1
            ORDER BY ordinal_position
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        // An unknown table is an empty result, not an error
        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            columns.push(ColumnInfo {
                name: row.try_get("column_name")?,
                data_type: row.try_get("data_type")?,
            });
        }
        Ok(columns)
    }

    async fn fetch_rows(
        &self,
        table: &str,
        filters: &[Filter],
        limit: i64,
    ) -> Result<Vec<Row>, DatabaseError> {
        // Re-fetch the column set on every call so schema changes are
        // observed immediately; this also serves as the existence check
        let columns = self.columns_for_table(table).await?;
        if columns.is_empty() {
            return Err(DatabaseError::TableNotFound(table.to_string()));
        }

        let (where_clause, values) = build_where_clause(filters, &columns)?;

        let sql = format!(
            "SELECT * FROM {}{} LIMIT ${}",
            quote_identifier(table),
            where_clause,
            values.len() + 1
        );
        tracing::debug!(%table, %sql, filters = filters.len(), "fetching rows");

        let mut query = sqlx::query(&sql);
        for value in &values {
            query = bind_value(query, value);
        }
        query = query.bind(limit);

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_cells).collect()
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<ColumnInfo> {
        names
            .iter()
            .map(|name| ColumnInfo {
                name: name.to_string(),
                data_type: "text".to_string(),
            })
            .collect()
    }

    fn filter(column: &str, op: &str, value: Value) -> Filter {
        Filter {
            column: column.to_string(),
            op: op.to_string(),
            value,
        }
    }

    #[test]
    fn quote_identifier_doubles_embedded_quotes() {
        assert_eq!(quote_identifier("users"), "\"users\"");
        assert_eq!(quote_identifier("ta\"ble"), "\"ta\"\"ble\"");
    }

    #[test]
    fn empty_filter_list_builds_no_clause() {
        let (clause, values) = build_where_clause(&[], &columns(&["id"])).unwrap();
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn clause_preserves_filter_order_and_numbers_parameters() {
        let filters = vec![
            filter("name", "=", json!("Alice")),
            filter("age", ">=", json!(18)),
            filter("age", "<", json!(65)),
        ];
        let (clause, values) =
            build_where_clause(&filters, &columns(&["name", "age"])).unwrap();
        assert_eq!(
            clause,
            " WHERE \"name\" = $1 AND \"age\" >= $2 AND \"age\" < $3"
        );
        assert_eq!(
            values,
            vec![
                BindValue::Text("Alice".to_string()),
                BindValue::Int(18),
                BindValue::Int(65),
            ]
        );
    }

    #[test]
    fn like_values_are_wrapped_with_wildcards() {
        let filters = vec![filter("name", "like", json!("Ali"))];
        let (clause, values) = build_where_clause(&filters, &columns(&["name"])).unwrap();
        assert_eq!(clause, " WHERE \"name\" LIKE $1");
        assert_eq!(values, vec![BindValue::Text("%Ali%".to_string())]);
    }

    #[test]
    fn like_operator_parses_case_insensitively() {
        let filters = vec![filter("name", "LIKE", json!("Ali"))];
        let (clause, _) = build_where_clause(&filters, &columns(&["name"])).unwrap();
        assert_eq!(clause, " WHERE \"name\" LIKE $1");
    }

    #[test]
    fn unknown_column_is_rejected() {
        let filters = vec![filter("ghost", "=", json!(1))];
        let error = build_where_clause(&filters, &columns(&["id"])).unwrap_err();
        assert!(matches!(error, DatabaseError::InvalidColumn(name) if name == "ghost"));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let filters = vec![filter("id", "!=", json!(1))];
        let error = build_where_clause(&filters, &columns(&["id"])).unwrap_err();
        assert!(matches!(error, DatabaseError::InvalidOp(op) if op == "!="));
    }

    #[test]
    fn rejected_operator_is_echoed_lowercased() {
        let filters = vec![filter("id", "IN", json!(1))];
        let error = build_where_clause(&filters, &columns(&["id"])).unwrap_err();
        assert_eq!(error.to_string(), "invalid op: in");
    }

    #[test]
    fn bind_values_follow_json_shape() {
        assert_eq!(BindValue::from_json(&json!(null)), BindValue::Null);
        assert_eq!(BindValue::from_json(&json!(true)), BindValue::Bool(true));
        assert_eq!(BindValue::from_json(&json!(7)), BindValue::Int(7));
        assert_eq!(BindValue::from_json(&json!(1.25)), BindValue::Float(1.25));
        assert_eq!(
            BindValue::from_json(&json!("18")),
            BindValue::Text("18".to_string())
        );
    }

    #[test]
    fn like_pattern_stringifies_non_string_values() {
        assert_eq!(like_pattern(&json!("Ali")), "%Ali%");
        assert_eq!(like_pattern(&json!(42)), "%42%");
    }
}
