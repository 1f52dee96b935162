use parking_lot::RwLock;
use portstory_core::{
    ConnectionFilter, ElementId, EnumConversionError, FilterKind, FilterRecord,
    LayoutConfiguration, LinkWaypoints, NodePosition, Point,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

mod configurations;
mod row_mapping;
mod schema;

const SCHEMA_VERSION: u32 = 1;

/// Longest accepted configuration name, in characters, after trimming.
pub const MAX_CONFIGURATION_NAME_LEN: usize = 128;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid identity: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("Invalid enum value: {0}")]
    EnumConversion(#[from] EnumConversionError),
    #[error("Other error: {0}")]
    Other(String),
}

/// Result of a save request. A rejected save carries the reasons in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub errors: Vec<String>,
}

impl SaveOutcome {
    pub fn accepted() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
        }
    }

    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            success: false,
            errors,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl DeleteOutcome {
    pub fn deleted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Persistence of named layout configurations, partitioned by scope.
///
/// Save and delete report problems through their outcome values so the caller
/// can show them to the user; only list and load surface storage failures as
/// errors.
pub trait ConfigurationStore {
    fn list_configuration_names(&self, scope: ElementId) -> Result<Vec<String>, StorageError>;

    fn load_configuration(
        &self,
        scope: ElementId,
        name: &str,
    ) -> Result<Option<LayoutConfiguration>, StorageError>;

    fn save_configuration(
        &self,
        scope: ElementId,
        name: &str,
        config: &LayoutConfiguration,
    ) -> SaveOutcome;

    fn delete_configuration(&self, scope: ElementId, name: &str) -> DeleteOutcome;
}

/// Trim `name` and check it is usable as a configuration name.
pub fn validate_configuration_name(name: &str) -> Result<String, Vec<String>> {
    let trimmed = name.trim();
    let mut errors = Vec::new();
    if trimmed.is_empty() {
        errors.push("Configuration name must not be empty".to_string());
    }
    let len = trimmed.chars().count();
    if len > MAX_CONFIGURATION_NAME_LEN {
        errors.push(format!(
            "Configuration name is {len} characters long (max {MAX_CONFIGURATION_NAME_LEN})"
        ));
    }
    if errors.is_empty() {
        Ok(trimmed.to_string())
    } else {
        Err(errors)
    }
}

pub struct Storage {
    conn: Connection,
    cache: StorageCache,
}

#[derive(Default)]
struct StorageCache {
    names: Arc<RwLock<HashMap<ElementId, Vec<String>>>>,
}

impl StorageCache {
    fn invalidate(&self, scope: ElementId) {
        self.names.write().remove(&scope);
    }
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let _ = conn.busy_timeout(Duration::from_millis(2_500));
        let _ = conn.pragma_update(None, "foreign_keys", "ON");
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let storage = Self {
            conn,
            cache: StorageCache::default(),
        };
        storage.init()?;
        Ok(storage)
    }

    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let _ = conn.pragma_update(None, "foreign_keys", "ON");
        let storage = Self {
            conn,
            cache: StorageCache::default(),
        };
        storage.init()?;
        Ok(storage)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM layout_filter", [])?;
        tx.execute("DELETE FROM layout_link", [])?;
        tx.execute("DELETE FROM layout_node", [])?;
        tx.execute("DELETE FROM layout_configuration", [])?;
        tx.commit()?;

        self.cache.names.write().clear();
        Ok(())
    }

    fn init(&self) -> Result<(), StorageError> {
        schema::create_tables(&self.conn)?;
        schema::create_indexes(&self.conn)?;
        schema::apply_schema_migrations(self)
    }

    fn schema_version(&self) -> Result<u32, StorageError> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version.max(0) as u32)
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StorageError> {
        self.conn
            .pragma_update(None, "user_version", version.to_string())?;
        Ok(())
    }

    pub fn configuration_names(&self, scope: ElementId) -> Result<Vec<String>, StorageError> {
        if let Some(names) = self.cache.names.read().get(&scope) {
            return Ok(names.clone());
        }
        let names = configurations::list_names(&self.conn, scope)?;
        self.cache.names.write().insert(scope, names.clone());
        Ok(names)
    }

    pub fn get_configuration(
        &self,
        scope: ElementId,
        name: &str,
    ) -> Result<Option<LayoutConfiguration>, StorageError> {
        configurations::load(&self.conn, scope, name.trim())
    }

    /// Insert or replace the configuration stored under `name`.
    pub fn put_configuration(
        &self,
        scope: ElementId,
        name: &str,
        config: &LayoutConfiguration,
    ) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        configurations::replace(&tx, scope, name, config)?;
        tx.commit()?;
        self.cache.invalidate(scope);
        Ok(())
    }

    /// Remove the configuration stored under `name`. Returns whether it existed.
    pub fn remove_configuration(&self, scope: ElementId, name: &str) -> Result<bool, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = configurations::delete(&tx, scope, name.trim())?;
        tx.commit()?;
        self.cache.invalidate(scope);
        Ok(removed)
    }
}

impl ConfigurationStore for Storage {
    fn list_configuration_names(&self, scope: ElementId) -> Result<Vec<String>, StorageError> {
        self.configuration_names(scope)
    }

    fn load_configuration(
        &self,
        scope: ElementId,
        name: &str,
    ) -> Result<Option<LayoutConfiguration>, StorageError> {
        self.get_configuration(scope, name)
    }

    fn save_configuration(
        &self,
        scope: ElementId,
        name: &str,
        config: &LayoutConfiguration,
    ) -> SaveOutcome {
        let name = match validate_configuration_name(name) {
            Ok(name) => name,
            Err(errors) => return SaveOutcome::rejected(errors),
        };
        match self.put_configuration(scope, &name, config) {
            Ok(()) => {
                tracing::info!(
                    "Saved configuration '{}' ({} nodes, {} links, {} filters)",
                    name,
                    config.nodes.len(),
                    config.links.len(),
                    config.filters.len()
                );
                SaveOutcome::accepted()
            }
            Err(e) => {
                tracing::error!("Failed to save configuration '{}': {}", name, e);
                SaveOutcome::rejected(vec![e.to_string()])
            }
        }
    }

    fn delete_configuration(&self, scope: ElementId, name: &str) -> DeleteOutcome {
        match self.remove_configuration(scope, name) {
            Ok(true) => DeleteOutcome::deleted(),
            Ok(false) => DeleteOutcome::failed(format!("Configuration '{}' not found", name.trim())),
            Err(e) => {
                tracing::error!("Failed to delete configuration '{}': {}", name, e);
                DeleteOutcome::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests;
