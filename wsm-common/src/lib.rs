//! # WSM Common Library
//!
//! Shared code for the workspace-master storage tools including:
//! - Entity models (users, profiles, ssh pairs, workspaces, snapshots, recipes, stacks)
//! - SQLite destination schema and per-entity queries
//! - Configuration resolution
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
