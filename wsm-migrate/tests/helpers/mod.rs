//! Shared helpers for migration integration tests
//!
//! - `LegacyDir`: temporary legacy storage directory with typed writers
//! - `RecordingDestination`: in-memory destination that records every write
//!   and can be told to fail lookups or writes for chosen identities

#![allow(dead_code)]

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use wsm_common::models::{Attributes, Profile, Recipe, Snapshot, SshPair, Stack, User, Workspace};
use wsm_common::{Error, Result};
use wsm_migrate::{DestinationStore, EntityKind};

/// Temporary legacy storage directory
pub struct LegacyDir {
    temp_dir: TempDir,
}

impl LegacyDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, kind: EntityKind) -> PathBuf {
        self.path().join(kind.file_name())
    }

    pub fn backup(&self, kind: EntityKind) -> PathBuf {
        self.path().join(format!("{}.backup", kind.file_name()))
    }

    /// Write any serializable document as the legacy file of `kind`
    pub fn write<T: Serialize>(&self, kind: EntityKind, document: &T) {
        let json = serde_json::to_string_pretty(document).unwrap();
        std::fs::write(self.file(kind), json).unwrap();
    }

    pub fn write_raw(&self, kind: EntityKind, content: &str) {
        std::fs::write(self.file(kind), content).unwrap();
    }

    /// Map-shaped file keyed by each entity's identity
    pub fn write_map<T: Serialize>(&self, kind: EntityKind, entries: &[(&str, T)]) {
        let map: BTreeMap<&str, &T> = entries.iter().map(|(k, v)| (*k, v)).collect();
        self.write(kind, &map);
    }
}

pub fn user(id: &str) -> User {
    User::new(id, format!("{}@example.com", id), format!("name-{}", id))
}

pub fn workspace(id: &str) -> Workspace {
    Workspace {
        id: id.to_string(),
        namespace: "ns".to_string(),
        config: serde_json::json!({ "name": format!("ws-{}", id) }),
        attributes: Attributes::new(),
        temporary: false,
    }
}

pub fn snapshot(id: &str, workspace_id: &str) -> Snapshot {
    Snapshot {
        id: id.to_string(),
        workspace_id: workspace_id.to_string(),
        machine_name: Some("dev-machine".to_string()),
        env_name: Some("default".to_string()),
        snapshot_type: Some("docker".to_string()),
        description: None,
        creation_date: 1_460_000_000_000,
        dev: true,
        machine_source: None,
    }
}

/// Everything the destination holds, per kind
#[derive(Debug, Default)]
pub struct Stored {
    pub users: BTreeMap<String, User>,
    pub profiles: BTreeMap<String, Profile>,
    pub preferences: BTreeMap<String, Attributes>,
    pub ssh_pairs: BTreeMap<(String, String, String), SshPair>,
    pub workspaces: BTreeMap<String, Workspace>,
    pub snapshots: BTreeMap<String, Snapshot>,
    pub recipes: BTreeMap<String, Recipe>,
    pub stacks: BTreeMap<String, Stack>,
}

#[derive(Debug, Default)]
struct State {
    stored: Stored,
    /// Every write, as "<Kind>:<identity>", in call order
    writes: Vec<String>,
    /// Every lookup, as "<Kind>:<identity>", in call order
    lookups: Vec<String>,
    fail_lookup: HashSet<String>,
    fail_write: HashSet<String>,
}

/// In-memory destination with fault injection
#[derive(Debug, Default)]
pub struct RecordingDestination {
    state: Mutex<State>,
}

impl RecordingDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the lookup of `key` ("<Kind>:<identity>") fail with a non-NotFound error
    pub fn fail_lookup(&self, key: &str) {
        self.state.lock().unwrap().fail_lookup.insert(key.to_string());
    }

    /// Make the write of `key` ("<Kind>:<identity>") fail
    pub fn fail_write(&self, key: &str) {
        self.state.lock().unwrap().fail_write.insert(key.to_string());
    }

    /// Remove all injected failures
    pub fn heal(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_lookup.clear();
        state.fail_write.clear();
    }

    pub fn writes(&self) -> Vec<String> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.state.lock().unwrap().lookups.clone()
    }

    pub fn clear_calls(&self) {
        let mut state = self.state.lock().unwrap();
        state.writes.clear();
        state.lookups.clear();
    }

    pub fn with_stored<R>(&self, f: impl FnOnce(&mut Stored) -> R) -> R {
        f(&mut self.state.lock().unwrap().stored)
    }

    fn lookup<T: Clone>(
        &self,
        key: String,
        find: impl FnOnce(&Stored) -> Option<T>,
    ) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        state.lookups.push(key.clone());
        if state.fail_lookup.contains(&key) {
            return Err(Error::Internal(format!("injected lookup failure for {}", key)));
        }
        find(&state.stored).ok_or_else(|| Error::NotFound(key))
    }

    fn write(&self, key: String, store: impl FnOnce(&mut Stored)) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_write.contains(&key) {
            return Err(Error::Internal(format!("injected write failure for {}", key)));
        }
        state.writes.push(key);
        store(&mut state.stored);
        Ok(())
    }
}

#[async_trait]
impl DestinationStore for RecordingDestination {
    async fn get_user(&self, id: &str) -> Result<User> {
        self.lookup(format!("User:{}", id), |s| s.users.get(id).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.write(format!("User:{}", user.id), |s| {
            s.users.insert(user.id.clone(), user.clone());
        })
    }

    async fn get_profile(&self, user_id: &str) -> Result<Profile> {
        self.lookup(format!("Profile:{}", user_id), |s| s.profiles.get(user_id).cloned())
    }

    async fn create_profile(&self, profile: &Profile) -> Result<()> {
        self.write(format!("Profile:{}", profile.user_id), |s| {
            s.profiles.insert(profile.user_id.clone(), profile.clone());
        })
    }

    async fn get_preferences(&self, user_id: &str) -> Result<Attributes> {
        let key = format!("Preferences:{}", user_id);
        let mut state = self.state.lock().unwrap();
        state.lookups.push(key.clone());
        if state.fail_lookup.contains(&key) {
            return Err(Error::Internal(format!("injected lookup failure for {}", key)));
        }
        Ok(state.stored.preferences.get(user_id).cloned().unwrap_or_default())
    }

    async fn set_preferences(&self, user_id: &str, preferences: &Attributes) -> Result<()> {
        self.write(format!("Preferences:{}", user_id), |s| {
            s.preferences.insert(user_id.to_string(), preferences.clone());
        })
    }

    async fn get_ssh_pair(&self, owner: &str, service: &str, name: &str) -> Result<SshPair> {
        let id = (owner.to_string(), service.to_string(), name.to_string());
        self.lookup(format!("SshKeyPair:{}/{}/{}", owner, service, name), |s| {
            s.ssh_pairs.get(&id).cloned()
        })
    }

    async fn create_ssh_pair(&self, pair: &SshPair) -> Result<()> {
        let key = format!("SshKeyPair:{}/{}/{}", pair.owner, pair.service, pair.name);
        self.write(key, |s| {
            s.ssh_pairs.insert(
                (pair.owner.clone(), pair.service.clone(), pair.name.clone()),
                pair.clone(),
            );
        })
    }

    async fn get_workspace(&self, id: &str) -> Result<Workspace> {
        self.lookup(format!("Workspace:{}", id), |s| s.workspaces.get(id).cloned())
    }

    async fn create_workspace(&self, workspace: &Workspace) -> Result<()> {
        self.write(format!("Workspace:{}", workspace.id), |s| {
            s.workspaces.insert(workspace.id.clone(), workspace.clone());
        })
    }

    async fn get_snapshot(&self, id: &str) -> Result<Snapshot> {
        self.lookup(format!("Snapshot:{}", id), |s| s.snapshots.get(id).cloned())
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.write(format!("Snapshot:{}", snapshot.id), |s| {
            s.snapshots.insert(snapshot.id.clone(), snapshot.clone());
        })
    }

    async fn get_recipe(&self, id: &str) -> Result<Recipe> {
        self.lookup(format!("Recipe:{}", id), |s| s.recipes.get(id).cloned())
    }

    async fn create_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.write(format!("Recipe:{}", recipe.id), |s| {
            s.recipes.insert(recipe.id.clone(), recipe.clone());
        })
    }

    async fn get_stack(&self, id: &str) -> Result<Stack> {
        self.lookup(format!("Stack:{}", id), |s| s.stacks.get(id).cloned())
    }

    async fn create_stack(&self, stack: &Stack) -> Result<()> {
        self.write(format!("Stack:{}", stack.id), |s| {
            s.stacks.insert(stack.id.clone(), stack.clone());
        })
    }
}
