//! Destination store: SQLite schema and per-entity queries

pub mod init;
pub mod recipes;
pub mod ssh;
pub mod users;
pub mod workspaces;

pub use init::*;
pub use recipes::*;
pub use ssh::*;
pub use users::*;
pub use workspaces::*;

use crate::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Encode an optional JSON-valued field for a TEXT column
fn encode_optional<T: Serialize>(value: &Option<T>) -> Result<Option<String>> {
    value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(Into::into)
}

/// Decode an optional TEXT column holding JSON
fn decode_optional<T: DeserializeOwned>(column: Option<String>) -> Result<Option<T>> {
    column
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(Into::into)
}

/// Single-connection in-memory database with the full schema
#[cfg(test)]
pub(crate) async fn setup_test_db() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    create_schema(&pool).await.unwrap();
    pool
}
