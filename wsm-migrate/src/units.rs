//! Migration units
//!
//! One unit per entity kind, bound to its legacy file. The table in
//! [`EntityKind::ALL`] is the migration order: later kinds may reference
//! earlier ones by identity (a snapshot names its workspace), so the order is
//! a correctness requirement.
//!
//! Kinds differ only in their legacy file, identity key and destination call,
//! which is all expressed by matching on [`EntityKind`] / [`LegacyEntity`].
//! Preferences are the irregular case: the legacy file is
//! `map<userId, map<string,string>>` and "migrated" means the destination
//! already holds a non-empty preference map for that user.

use crate::destination::{present, DestinationStore};
use crate::error::{LegacyDataError, MigrationError};
use crate::legacy;
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use wsm_common::models::{
    Attributes, Profile, Recipe, Snapshot, SshPair, Stack, User, UserPreferences, Workspace,
};

/// Suffix appended to a legacy file once its unit is fully migrated
pub const BACKUP_SUFFIX: &str = ".backup";

/// Entity kinds, in migration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Profile,
    Preferences,
    SshKeyPair,
    Workspace,
    Snapshot,
    Recipe,
    Stack,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::User,
        EntityKind::Profile,
        EntityKind::Preferences,
        EntityKind::SshKeyPair,
        EntityKind::Workspace,
        EntityKind::Snapshot,
        EntityKind::Recipe,
        EntityKind::Stack,
    ];

    /// Name used in logs and reports
    pub fn entity_name(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Profile => "Profile",
            EntityKind::Preferences => "Preferences",
            EntityKind::SshKeyPair => "SshKeyPair",
            EntityKind::Workspace => "Workspace",
            EntityKind::Snapshot => "Snapshot",
            EntityKind::Recipe => "Recipe",
            EntityKind::Stack => "Stack",
        }
    }

    /// Legacy file name inside the storage directory
    ///
    /// `ssh.json` is a `[ <pair>, ... ]` list, `preferences.json` is
    /// `{ "<userId>": { "<key>": "<value>" } }`, every other file is
    /// `{ "<identity>": <entity> }`.
    pub fn file_name(self) -> &'static str {
        match self {
            EntityKind::User => "users.json",
            EntityKind::Profile => "profiles.json",
            EntityKind::Preferences => "preferences.json",
            EntityKind::SshKeyPair => "ssh.json",
            EntityKind::Workspace => "workspaces.json",
            EntityKind::Snapshot => "snapshots.json",
            EntityKind::Recipe => "recipes.json",
            EntityKind::Stack => "stacks.json",
        }
    }

}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// One legacy entity, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyEntity {
    User(User),
    Profile(Profile),
    Preferences(UserPreferences),
    SshKeyPair(SshPair),
    Workspace(Workspace),
    Snapshot(Snapshot),
    Recipe(Recipe),
    Stack(Stack),
}

impl LegacyEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            LegacyEntity::User(_) => EntityKind::User,
            LegacyEntity::Profile(_) => EntityKind::Profile,
            LegacyEntity::Preferences(_) => EntityKind::Preferences,
            LegacyEntity::SshKeyPair(_) => EntityKind::SshKeyPair,
            LegacyEntity::Workspace(_) => EntityKind::Workspace,
            LegacyEntity::Snapshot(_) => EntityKind::Snapshot,
            LegacyEntity::Recipe(_) => EntityKind::Recipe,
            LegacyEntity::Stack(_) => EntityKind::Stack,
        }
    }

    /// Natural identity, used in logs and errors
    pub fn identity(&self) -> String {
        match self {
            LegacyEntity::User(user) => user.id.clone(),
            LegacyEntity::Profile(profile) => profile.user_id.clone(),
            LegacyEntity::Preferences(prefs) => prefs.user_id.clone(),
            LegacyEntity::SshKeyPair(pair) => {
                format!("{}/{}/{}", pair.owner, pair.service, pair.name)
            }
            LegacyEntity::Workspace(workspace) => workspace.id.clone(),
            LegacyEntity::Snapshot(snapshot) => snapshot.id.clone(),
            LegacyEntity::Recipe(recipe) => recipe.id.clone(),
            LegacyEntity::Stack(stack) => stack.id.clone(),
        }
    }

    /// Whether the destination already holds this entity
    pub async fn is_migrated<D>(&self, destination: &D) -> wsm_common::Result<bool>
    where
        D: DestinationStore + ?Sized,
    {
        match self {
            LegacyEntity::User(user) => present(destination.get_user(&user.id).await),
            LegacyEntity::Profile(profile) => {
                present(destination.get_profile(&profile.user_id).await)
            }
            // An empty map is indistinguishable from "not yet migrated"
            LegacyEntity::Preferences(prefs) => Ok(!destination
                .get_preferences(&prefs.user_id)
                .await?
                .is_empty()),
            LegacyEntity::SshKeyPair(pair) => present(
                destination
                    .get_ssh_pair(&pair.owner, &pair.service, &pair.name)
                    .await,
            ),
            LegacyEntity::Workspace(workspace) => {
                present(destination.get_workspace(&workspace.id).await)
            }
            LegacyEntity::Snapshot(snapshot) => {
                present(destination.get_snapshot(&snapshot.id).await)
            }
            LegacyEntity::Recipe(recipe) => present(destination.get_recipe(&recipe.id).await),
            LegacyEntity::Stack(stack) => present(destination.get_stack(&stack.id).await),
        }
    }

    /// Write this entity to the destination
    pub async fn migrate<D>(&self, destination: &D) -> wsm_common::Result<()>
    where
        D: DestinationStore + ?Sized,
    {
        match self {
            LegacyEntity::User(user) => destination.create_user(user).await,
            LegacyEntity::Profile(profile) => destination.create_profile(profile).await,
            LegacyEntity::Preferences(prefs) => {
                destination
                    .set_preferences(&prefs.user_id, &prefs.preferences)
                    .await
            }
            LegacyEntity::SshKeyPair(pair) => destination.create_ssh_pair(pair).await,
            LegacyEntity::Workspace(workspace) => destination.create_workspace(workspace).await,
            LegacyEntity::Snapshot(snapshot) => destination.save_snapshot(snapshot).await,
            LegacyEntity::Recipe(recipe) => destination.create_recipe(recipe).await,
            LegacyEntity::Stack(stack) => destination.create_stack(stack).await,
        }
    }
}

/// An entity kind bound to its legacy file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationUnit {
    kind: EntityKind,
    legacy_path: PathBuf,
}

impl MigrationUnit {
    pub fn new(kind: EntityKind, storage_dir: &Path) -> Self {
        Self {
            kind,
            legacy_path: storage_dir.join(kind.file_name()),
        }
    }

    /// The full unit table, in migration order
    pub fn all(storage_dir: &Path) -> Vec<MigrationUnit> {
        EntityKind::ALL
            .iter()
            .map(|&kind| MigrationUnit::new(kind, storage_dir))
            .collect()
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn entity_name(&self) -> &'static str {
        self.kind.entity_name()
    }

    pub fn legacy_path(&self) -> &Path {
        &self.legacy_path
    }

    /// Completion marker: `<legacy file name>.backup` next to the legacy file
    pub fn backup_path(&self) -> PathBuf {
        let mut file_name = self.legacy_path.as_os_str().to_owned();
        file_name.push(BACKUP_SUFFIX);
        PathBuf::from(file_name)
    }

    /// Whether this unit still has legacy data to migrate
    ///
    /// A legacy path that can't be checked (permissions, symlink loop) is an
    /// error, never "no data".
    pub fn has_legacy_data(&self) -> Result<bool, MigrationError> {
        self.legacy_path
            .try_exists()
            .map_err(|e| self.corrupt(LegacyDataError::Unreadable(e)))
    }

    /// Read every entity of this unit from the legacy file
    pub fn load_entities(&self) -> Result<Vec<LegacyEntity>, MigrationError> {
        self.read_entities().map_err(|source| self.corrupt(source))
    }

    fn corrupt(&self, source: LegacyDataError) -> MigrationError {
        MigrationError::CorruptLegacyData {
            unit: self.entity_name(),
            path: self.legacy_path.clone(),
            source,
        }
    }

    fn read_entities(&self) -> Result<Vec<LegacyEntity>, LegacyDataError> {
        let path = self.legacy_path.as_path();

        let entities = match self.kind {
            EntityKind::User => values(legacy::load_map::<User>(path)?, LegacyEntity::User),
            EntityKind::Profile => values(legacy::load_map::<Profile>(path)?, LegacyEntity::Profile),
            EntityKind::Preferences => legacy::load_map::<Attributes>(path)?
                .into_iter()
                .map(|(user_id, preferences)| {
                    LegacyEntity::Preferences(UserPreferences {
                        user_id,
                        preferences,
                    })
                })
                .collect(),
            EntityKind::SshKeyPair => legacy::load_list::<SshPair>(path)?
                .into_iter()
                .map(LegacyEntity::SshKeyPair)
                .collect(),
            EntityKind::Workspace => values(legacy::load_map::<Workspace>(path)?, LegacyEntity::Workspace),
            EntityKind::Snapshot => values(legacy::load_map::<Snapshot>(path)?, LegacyEntity::Snapshot),
            EntityKind::Recipe => values(legacy::load_map::<Recipe>(path)?, LegacyEntity::Recipe),
            EntityKind::Stack => values(legacy::load_map::<Stack>(path)?, LegacyEntity::Stack),
        };

        Ok(entities)
    }
}

/// Map-shaped files keep entities as values; the key is only the storage index
fn values<T>(
    map: IndexMap<String, T>,
    wrap: fn(T) -> LegacyEntity,
) -> Vec<LegacyEntity> {
    map.into_values().map(wrap).collect()
}
