//! Recipe and stack database operations

use super::{decode_optional, encode_optional};
use crate::models::{Recipe, Stack};
use crate::{Error, Result};
use sqlx::{Row, SqlitePool};

/// Load recipe by id
pub async fn get_recipe(pool: &SqlitePool, id: &str) -> Result<Recipe> {
    let row = sqlx::query(
        "SELECT id, name, creator, type, script, tags, description FROM recipes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Recipe with id '{}'", id)))?;

    let tags: String = row.get("tags");

    Ok(Recipe {
        id: row.get("id"),
        name: row.get("name"),
        creator: row.get("creator"),
        recipe_type: row.get("type"),
        script: row.get("script"),
        tags: serde_json::from_str(&tags)?,
        description: row.get("description"),
    })
}

/// Insert a new recipe
pub async fn create_recipe(pool: &SqlitePool, recipe: &Recipe) -> Result<()> {
    let tags = serde_json::to_string(&recipe.tags)?;

    sqlx::query(
        r#"
        INSERT INTO recipes (id, name, creator, type, script, tags, description)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&recipe.id)
    .bind(&recipe.name)
    .bind(&recipe.creator)
    .bind(&recipe.recipe_type)
    .bind(&recipe.script)
    .bind(&tags)
    .bind(&recipe.description)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load stack by id
pub async fn get_stack(pool: &SqlitePool, id: &str) -> Result<Stack> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, scope, creator, tags,
               workspace_config, source, components
        FROM stacks
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Stack with id '{}'", id)))?;

    let tags: String = row.get("tags");
    let components: String = row.get("components");

    Ok(Stack {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        scope: row.get("scope"),
        creator: row.get("creator"),
        tags: serde_json::from_str(&tags)?,
        workspace_config: decode_optional(row.get("workspace_config"))?,
        source: decode_optional(row.get("source"))?,
        components: serde_json::from_str(&components)?,
    })
}

/// Insert a new stack
pub async fn create_stack(pool: &SqlitePool, stack: &Stack) -> Result<()> {
    let tags = serde_json::to_string(&stack.tags)?;
    let workspace_config = encode_optional(&stack.workspace_config)?;
    let source = encode_optional(&stack.source)?;
    let components = serde_json::to_string(&stack.components)?;

    sqlx::query(
        r#"
        INSERT INTO stacks (
            id, name, description, scope, creator, tags,
            workspace_config, source, components
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&stack.id)
    .bind(&stack.name)
    .bind(&stack.description)
    .bind(&stack.scope)
    .bind(&stack.creator)
    .bind(&tags)
    .bind(&workspace_config)
    .bind(&source)
    .bind(&components)
    .execute(pool)
    .await?;

    Ok(())
}
