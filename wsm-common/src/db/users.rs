//! User, profile and preference database operations

use crate::models::{Attributes, Profile, User};
use crate::{Error, Result};
use sqlx::{Row, SqlitePool};

/// Load user by id
///
/// Returns `Error::NotFound` if no such user exists
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    let row = sqlx::query("SELECT id, email, name, password, aliases FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User with id '{}'", id)))?;

    let aliases: String = row.get("aliases");

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password: row.get("password"),
        aliases: serde_json::from_str(&aliases)?,
    })
}

/// Insert a new user
pub async fn create_user(pool: &SqlitePool, user: &User) -> Result<()> {
    let aliases = serde_json::to_string(&user.aliases)?;

    sqlx::query("INSERT INTO users (id, email, name, password, aliases) VALUES (?, ?, ?, ?, ?)")
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password)
        .bind(&aliases)
        .execute(pool)
        .await?;

    Ok(())
}

/// Load profile by owning user id
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Profile> {
    let attributes: String =
        sqlx::query_scalar("SELECT attributes FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Profile for user '{}'", user_id)))?;

    Ok(Profile {
        user_id: user_id.to_string(),
        attributes: serde_json::from_str(&attributes)?,
    })
}

/// Insert a new profile
pub async fn create_profile(pool: &SqlitePool, profile: &Profile) -> Result<()> {
    let attributes = serde_json::to_string(&profile.attributes)?;

    sqlx::query("INSERT INTO profiles (user_id, attributes) VALUES (?, ?)")
        .bind(&profile.user_id)
        .bind(&attributes)
        .execute(pool)
        .await?;

    Ok(())
}

/// Load all preferences of a user
///
/// An unknown user has no preferences: the result is an empty map, never `NotFound`.
pub async fn get_preferences(pool: &SqlitePool, user_id: &str) -> Result<Attributes> {
    let rows = sqlx::query("SELECT name, value FROM preferences WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.get::<String, _>("name"), row.get::<String, _>("value")))
        .collect())
}

/// Replace all preferences of a user in one transaction
pub async fn set_preferences(
    pool: &SqlitePool,
    user_id: &str,
    preferences: &Attributes,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM preferences WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for (name, value) in preferences {
        sqlx::query("INSERT INTO preferences (user_id, name, value) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(name)
            .bind(value)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
