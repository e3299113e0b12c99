//! Request and response shapes for the browsing API
//!
//! Nothing here outlives a single request: these types are built from input,
//! used to assemble one SQL statement, serialized back out, and discarded.
//! The database schema itself is discovered at request time and never cached.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Comparison operators accepted in filters
///
/// This is a closed set: anything outside it is rejected before SQL is built.
/// `Like` is a fixed substring-match convenience; the bound value is wrapped
/// with `%` wildcards on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    Like,
}

impl FilterOp {
    /// Parse an operator token, case-insensitively
    ///
    /// Returns `None` for anything outside the allowed set so callers can
    /// report the original token back to the client.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "=" => Some(Self::Eq),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            "like" => Some(Self::Like),
            _ => None,
        }
    }

    /// The SQL fragment this operator maps to
    pub fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Like => "LIKE",
        }
    }
}

/// A single column filter as supplied by the client
///
/// The operator stays a raw string here so an invalid token can be echoed in
/// the error message; it is parsed to [`FilterOp`] during validation.
#[derive(Debug, Clone, Deserialize)]
pub struct Filter {
    /// Column name, validated against the live catalog before use
    pub column: String,

    /// Operator token, defaults to equality
    #[serde(default = "default_op")]
    pub op: String,

    /// Filter value, bound as a parameter typed by its JSON shape
    #[serde(default)]
    pub value: serde_json::Value,
}

fn default_op() -> String {
    "=".to_string()
}

/// Body of a POST /api/data request
#[derive(Debug, Clone, Deserialize)]
pub struct DataRequest {
    /// Target table; missing table is a 400, not a deserialization failure
    pub table: Option<String>,

    /// Maximum number of rows to return
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Filters, ANDed together in the order given
    #[serde(default)]
    pub filters: Vec<Filter>,
}

pub(crate) fn default_limit() -> i64 {
    100
}

/// Name and declared type of a single column, in ordinal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,

    /// Declared SQL data type (e.g. "integer", "character varying")
    #[serde(rename = "type")]
    pub data_type: String,
}

/// A dynamically typed cell value decoded from a result row
///
/// Rows have no compile-time schema, so cells carry a tagged variant instead
/// of an untyped JSON value. Serialization is untagged: `Null` becomes JSON
/// null, `Int` a number, and so on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Rendered description of binary data, not the raw bytes
    Bytes(String),
    /// Timestamp, date, or time rendered as a string
    Timestamp(String),
}

/// One result row: column name to cell value, preserving column order
pub type Row = IndexMap<String, CellValue>;

/// Response from GET /api/tables
#[derive(Debug, Clone, Serialize)]
pub struct TablesResponse {
    /// Table names, alphabetically ordered
    pub tables: Vec<String>,
}

/// Response from GET /api/columns
#[derive(Debug, Clone, Serialize)]
pub struct ColumnsResponse {
    /// Columns in ordinal order
    pub columns: Vec<ColumnInfo>,
}

/// Response from GET|POST /api/data
#[derive(Debug, Clone, Serialize)]
pub struct RowsResponse {
    /// Matching rows, each an ordered column-to-value mapping
    pub rows: Vec<Row>,

    /// Number of rows returned (not the unfiltered table size)
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_op_parses_allowed_set() {
        assert_eq!(FilterOp::parse("="), Some(FilterOp::Eq));
        assert_eq!(FilterOp::parse(">"), Some(FilterOp::Gt));
        assert_eq!(FilterOp::parse("<"), Some(FilterOp::Lt));
        assert_eq!(FilterOp::parse(">="), Some(FilterOp::Ge));
        assert_eq!(FilterOp::parse("<="), Some(FilterOp::Le));
        assert_eq!(FilterOp::parse("like"), Some(FilterOp::Like));
    }

    #[test]
    fn filter_op_is_case_insensitive() {
        assert_eq!(FilterOp::parse("LIKE"), Some(FilterOp::Like));
        assert_eq!(FilterOp::parse("Like"), Some(FilterOp::Like));
    }

    #[test]
    fn filter_op_rejects_everything_else() {
        assert_eq!(FilterOp::parse("!="), None);
        assert_eq!(FilterOp::parse("in"), None);
        assert_eq!(FilterOp::parse(""), None);
        assert_eq!(FilterOp::parse("; DROP TABLE users"), None);
    }

    #[test]
    fn filter_op_sql_fragments() {
        assert_eq!(FilterOp::Like.sql(), "LIKE");
        assert_eq!(FilterOp::Ge.sql(), ">=");
        assert_eq!(FilterOp::Eq.sql(), "=");
    }

    #[test]
    fn data_request_defaults() {
        let request: DataRequest = serde_json::from_value(json!({ "table": "users" })).unwrap();
        assert_eq!(request.table.as_deref(), Some("users"));
        assert_eq!(request.limit, 100);
        assert!(request.filters.is_empty());
    }

    #[test]
    fn filter_defaults_to_equality() {
        let filter: Filter =
            serde_json::from_value(json!({ "column": "age", "value": 18 })).unwrap();
        assert_eq!(filter.op, "=");
        assert_eq!(filter.value, json!(18));
    }

    #[test]
    fn column_info_serializes_type_key() {
        let column = ColumnInfo {
            name: "id".to_string(),
            data_type: "integer".to_string(),
        };
        let value = serde_json::to_value(&column).unwrap();
        assert_eq!(value, json!({ "name": "id", "type": "integer" }));
    }

    #[test]
    fn cell_value_serialization_is_untagged() {
        assert_eq!(serde_json::to_value(CellValue::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(CellValue::Bool(true)).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(CellValue::Int(42)).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(CellValue::Float(1.5)).unwrap(), json!(1.5));
        assert_eq!(
            serde_json::to_value(CellValue::Text("hi".to_string())).unwrap(),
            json!("hi")
        );
    }

    #[test]
    fn row_preserves_insertion_order() {
        let mut row = Row::new();
        row.insert("z".to_string(), CellValue::Int(1));
        row.insert("a".to_string(), CellValue::Int(2));
        let serialized = serde_json::to_string(&row).unwrap();
        assert!(serialized.find("\"z\"").unwrap() < serialized.find("\"a\"").unwrap());
    }
}
