//! Database abstraction layer
//!
//! Schema discovery and filtered row fetching behind a provider trait.

pub mod postgres;
pub mod traits;

pub use postgres::PostgresProvider;
pub use traits::{DatabaseError, DatabaseProvider};
