//! SSH key pair database operations

use crate::models::SshPair;
use crate::{Error, Result};
use sqlx::{Row, SqlitePool};

/// Load an ssh pair by its composite identity
pub async fn get_ssh_pair(
    pool: &SqlitePool,
    owner: &str,
    service: &str,
    name: &str,
) -> Result<SshPair> {
    let row = sqlx::query(
        r#"
        SELECT owner, service, name, public_key, private_key
        FROM ssh_pairs
        WHERE owner = ? AND service = ? AND name = ?
        "#,
    )
    .bind(owner)
    .bind(service)
    .bind(name)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        Error::NotFound(format!(
            "Ssh pair for owner '{}', service '{}' and name '{}'",
            owner, service, name
        ))
    })?;

    Ok(SshPair {
        owner: row.get("owner"),
        service: row.get("service"),
        name: row.get("name"),
        public_key: row.get("public_key"),
        private_key: row.get("private_key"),
    })
}

/// Insert a new ssh pair
pub async fn create_ssh_pair(pool: &SqlitePool, pair: &SshPair) -> Result<()> {
    sqlx::query(
        "INSERT INTO ssh_pairs (owner, service, name, public_key, private_key) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&pair.owner)
    .bind(&pair.service)
    .bind(&pair.name)
    .bind(&pair.public_key)
    .bind(&pair.private_key)
    .execute(pool)
    .await?;

    Ok(())
}
