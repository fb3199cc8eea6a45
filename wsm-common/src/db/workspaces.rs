//! Workspace and snapshot database operations

use super::{decode_optional, encode_optional};
use crate::models::{Snapshot, Workspace};
use crate::{Error, Result};
use sqlx::{Row, SqlitePool};

/// Load workspace by id
pub async fn get_workspace(pool: &SqlitePool, id: &str) -> Result<Workspace> {
    let row = sqlx::query(
        "SELECT id, namespace, config, attributes, is_temporary FROM workspaces WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Workspace with id '{}'", id)))?;

    let config: String = row.get("config");
    let attributes: String = row.get("attributes");

    Ok(Workspace {
        id: row.get("id"),
        namespace: row.get("namespace"),
        config: serde_json::from_str(&config)?,
        attributes: serde_json::from_str(&attributes)?,
        temporary: row.get("is_temporary"),
    })
}

/// Insert a new workspace
pub async fn create_workspace(pool: &SqlitePool, workspace: &Workspace) -> Result<()> {
    let config = serde_json::to_string(&workspace.config)?;
    let attributes = serde_json::to_string(&workspace.attributes)?;

    sqlx::query(
        r#"
        INSERT INTO workspaces (id, namespace, name, config, attributes, is_temporary)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&workspace.id)
    .bind(&workspace.namespace)
    .bind(workspace.name())
    .bind(&config)
    .bind(&attributes)
    .bind(workspace.temporary)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load snapshot by id
pub async fn get_snapshot(pool: &SqlitePool, id: &str) -> Result<Snapshot> {
    let row = sqlx::query(
        r#"
        SELECT id, workspace_id, machine_name, env_name, type, description,
               creation_date, is_dev, machine_source
        FROM snapshots
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Snapshot with id '{}'", id)))?;

    Ok(Snapshot {
        id: row.get("id"),
        workspace_id: row.get("workspace_id"),
        machine_name: row.get("machine_name"),
        env_name: row.get("env_name"),
        snapshot_type: row.get("type"),
        description: row.get("description"),
        creation_date: row.get("creation_date"),
        dev: row.get("is_dev"),
        machine_source: decode_optional(row.get("machine_source"))?,
    })
}

/// Insert a new snapshot
///
/// Fails if the referenced workspace doesn't exist.
pub async fn save_snapshot(pool: &SqlitePool, snapshot: &Snapshot) -> Result<()> {
    let machine_source = encode_optional(&snapshot.machine_source)?;

    sqlx::query(
        r#"
        INSERT INTO snapshots (
            id, workspace_id, machine_name, env_name, type, description,
            creation_date, is_dev, machine_source
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&snapshot.id)
    .bind(&snapshot.workspace_id)
    .bind(&snapshot.machine_name)
    .bind(&snapshot.env_name)
    .bind(&snapshot.snapshot_type)
    .bind(&snapshot.description)
    .bind(snapshot.creation_date)
    .bind(snapshot.dev)
    .bind(&machine_source)
    .execute(pool)
    .await?;

    Ok(())
}
