//! Entity models
//!
//! Field names follow the legacy JSON files (camelCase keys). Keys the legacy
//! store wrote but these models don't name are ignored on read; optional keys
//! default when absent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form string attributes (profile attributes, workspace attributes, preferences)
pub type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            password: None,
            aliases: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// All preferences of one user
///
/// The legacy file is `{ "<userId>": { "<key>": "<value>" } }`, so this is
/// assembled from a map entry rather than deserialized directly.
#[derive(Debug, Clone, PartialEq)]
pub struct UserPreferences {
    pub user_id: String,
    pub preferences: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshPair {
    pub owner: String,
    pub service: String,
    pub name: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub namespace: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, alias = "isTemporary")]
    pub temporary: bool,
}

impl Workspace {
    /// Workspace name as carried by its config
    pub fn name(&self) -> Option<&str> {
        self.config.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub workspace_id: String,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub env_name: Option<String>,
    #[serde(default, rename = "type")]
    pub snapshot_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub creation_date: i64,
    #[serde(default, alias = "isDev")]
    pub dev: bool,
    #[serde(default)]
    pub machine_source: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, rename = "type")]
    pub recipe_type: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub workspace_config: Option<Value>,
    #[serde(default)]
    pub source: Option<Value>,
    #[serde(default)]
    pub components: Vec<Value>,
}
