//! Destination store port
//!
//! The migrator only ever asks the destination two things per entity: "is an
//! entity with this identity already there" and "persist this entity".
//! Lookups go by natural identity, never by full value equality.

use async_trait::async_trait;
use sqlx::SqlitePool;
use wsm_common::db;
use wsm_common::models::{Attributes, Profile, Recipe, Snapshot, SshPair, Stack, User, Workspace};
use wsm_common::{Error, Result};

/// Per-entity-kind lookups and writes of the destination store
///
/// Lookups return `Error::NotFound` for a missing entity. Any other error is a
/// real destination failure.
#[async_trait]
pub trait DestinationStore: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<User>;
    async fn create_user(&self, user: &User) -> Result<()>;

    async fn get_profile(&self, user_id: &str) -> Result<Profile>;
    async fn create_profile(&self, profile: &Profile) -> Result<()>;

    /// All preferences of the user; empty if there are none
    async fn get_preferences(&self, user_id: &str) -> Result<Attributes>;
    async fn set_preferences(&self, user_id: &str, preferences: &Attributes) -> Result<()>;

    async fn get_ssh_pair(&self, owner: &str, service: &str, name: &str) -> Result<SshPair>;
    async fn create_ssh_pair(&self, pair: &SshPair) -> Result<()>;

    async fn get_workspace(&self, id: &str) -> Result<Workspace>;
    async fn create_workspace(&self, workspace: &Workspace) -> Result<()>;

    async fn get_snapshot(&self, id: &str) -> Result<Snapshot>;
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()>;

    async fn get_recipe(&self, id: &str) -> Result<Recipe>;
    async fn create_recipe(&self, recipe: &Recipe) -> Result<()>;

    async fn get_stack(&self, id: &str) -> Result<Stack>;
    async fn create_stack(&self, stack: &Stack) -> Result<()>;
}

/// Classify a lookup: found is `true`, `NotFound` is `false`, anything else propagates
///
/// An indeterminate lookup must never read as "absent", or a transient
/// destination failure would turn into a duplicate write.
pub fn present<T>(lookup: Result<T>) -> Result<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(Error::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// SQLite-backed destination store
#[derive(Debug, Clone)]
pub struct SqliteDestination {
    pool: SqlitePool,
}

impl SqliteDestination {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DestinationStore for SqliteDestination {
    async fn get_user(&self, id: &str) -> Result<User> {
        db::get_user(&self.pool, id).await
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        db::create_user(&self.pool, user).await
    }

    async fn get_profile(&self, user_id: &str) -> Result<Profile> {
        db::get_profile(&self.pool, user_id).await
    }

    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        db::create_profile(&self.pool, profile).await
    }

    async fn get_preferences(&self, user_id: &str) -> Result<Attributes> {
        db::get_preferences(&self.pool, user_id).await
    }

    async fn set_preferences(&self, user_id: &str, preferences: &Attributes) -> Result<()> {
        db::set_preferences(&self.pool, user_id, preferences).await
    }

    async fn get_ssh_pair(&self, owner: &str, service: &str, name: &str) -> Result<SshPair> {
        db::get_ssh_pair(&self.pool, owner, service, name).await
    }

    async fn create_ssh_pair(&self, pair: &SshPair) -> Result<()> {
        db::create_ssh_pair(&self.pool, pair).await
    }

    async fn get_workspace(&self, id: &str) -> Result<Workspace> {
        db::get_workspace(&self.pool, id).await
    }

    async fn create_workspace(&self, workspace: &Workspace) -> Result<()> {
        db::create_workspace(&self.pool, workspace).await
    }

    async fn get_snapshot(&self, id: &str) -> Result<Snapshot> {
        db::get_snapshot(&self.pool, id).await
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        db::save_snapshot(&self.pool, snapshot).await
    }

    async fn get_recipe(&self, id: &str) -> Result<Recipe> {
        db::get_recipe(&self.pool, id).await
    }

    async fn create_recipe(&self, recipe: &Recipe) -> Result<()> {
        db::create_recipe(&self.pool, recipe).await
    }

    async fn get_stack(&self, id: &str) -> Result<Stack> {
        db::get_stack(&self.pool, id).await
    }

    async fn create_stack(&self, stack: &Stack) -> Result<()> {
        db::create_stack(&self.pool, stack).await
    }
}
