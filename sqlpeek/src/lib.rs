//! # sqlpeek
//!
//! A schema-agnostic HTTP browsing service for Postgres databases: list
//! tables, list columns, and query rows with simple filters, translated into
//! parameterized SQL against a schema discovered at request time.
//!
//! ## Endpoints
//!
//! - `GET /` - static landing page
//! - `GET /api/tables` - base tables in the public schema, alphabetical
//! - `GET /api/columns?table=name` - columns in ordinal order
//! - `GET|POST /api/data` - filtered rows (filters via POST body only)
//! - `GET /api/health` - pool connectivity probe
//!
//! ## Security Warning
//!
//! **This is an inspection tool, not a public API.** It has no
//! authentication and exposes every base table in the schema. Do not expose
//! it on public networks.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sqlpeek::SqlPeekLayer;
//! use sqlx::PgPool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = PgPool::connect("postgres://localhost/postgres")
//!         .await
//!         .unwrap();
//!
//!     let app = SqlPeekLayer::postgres(pool).into_router();
//!
//!     // Serve the application...
//! }
//! ```

pub mod api;
pub mod database;
pub mod frontend;
pub mod layer;
pub mod schema;

pub use database::postgres::PostgresProvider;
pub use database::traits::{DatabaseError, DatabaseProvider};
pub use layer::SqlPeekLayer;
pub use schema::{CellValue, ColumnInfo, DataRequest, Filter, FilterOp, Row};
