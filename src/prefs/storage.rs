//! Preference storage trait and SQLite implementation.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Key/value store for small per-view settings.
///
/// Values are namespaced by the storage key of the view that owns them.
pub trait PreferenceStore: Send + Sync {
  /// Read one value.
  fn get(&self, namespace: &str, name: &str) -> Result<Option<String>>;

  /// Write one value, replacing any previous value.
  fn set(&self, namespace: &str, name: &str, value: &str) -> Result<()>;

  /// Drop every value of a namespace.
  fn clear(&self, namespace: &str) -> Result<()>;
}

/// Store that remembers nothing.
/// Used when preferences are disabled or the database cannot be opened.
pub struct NoopPreferences;

impl PreferenceStore for NoopPreferences {
  fn get(&self, _namespace: &str, _name: &str) -> Result<Option<String>> {
    Ok(None)
  }

  fn set(&self, _namespace: &str, _name: &str, _value: &str) -> Result<()> {
    Ok(())
  }

  fn clear(&self, _namespace: &str) -> Result<()> {
    Ok(())
  }
}

/// SQLite-based preference storage.
pub struct SqlitePreferences {
  conn: Mutex<Connection>,
}

impl SqlitePreferences {
  /// Open the database at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the database at `path`.
  pub fn open_at(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create preferences directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open preferences at {}: {}", path.display(), e))?;
    Self::with_connection(conn)
  }

  /// Database that lives as long as the process.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory preferences: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(PREFS_SCHEMA)
      .map_err(|e| eyre!("Failed to run preference migrations: {}", e))?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("entab").join("prefs.db"))
  }

  fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))
  }
}

const PREFS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS view_preferences (
    namespace TEXT NOT NULL,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (namespace, name)
);
"#;

impl PreferenceStore for SqlitePreferences {
  fn get(&self, namespace: &str, name: &str) -> Result<Option<String>> {
    let conn = self.conn()?;
    conn
      .query_row(
        "SELECT value FROM view_preferences WHERE namespace = ? AND name = ?",
        params![namespace, name],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read preference {}.{}: {}", namespace, name, e))
  }

  fn set(&self, namespace: &str, name: &str, value: &str) -> Result<()> {
    let conn = self.conn()?;
    conn
      .execute(
        "INSERT OR REPLACE INTO view_preferences (namespace, name, value, updated_at)
         VALUES (?, ?, ?, datetime('now'))",
        params![namespace, name, value],
      )
      .map_err(|e| eyre!("Failed to store preference {}.{}: {}", namespace, name, e))?;
    Ok(())
  }

  fn clear(&self, namespace: &str) -> Result<()> {
    let conn = self.conn()?;
    conn
      .execute(
        "DELETE FROM view_preferences WHERE namespace = ?",
        params![namespace],
      )
      .map_err(|e| eyre!("Failed to clear preferences for {}: {}", namespace, e))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_set_get_replace() {
    let store = SqlitePreferences::open_in_memory().unwrap();
    assert_eq!(store.get("doctors", "view_mode").unwrap(), None);

    store.set("doctors", "view_mode", "table").unwrap();
    store.set("doctors", "view_mode", "kanban").unwrap();
    assert_eq!(store.get("doctors", "view_mode").unwrap().as_deref(), Some("kanban"));
  }

  #[test]
  fn test_namespaces_are_isolated() {
    let store = SqlitePreferences::open_in_memory().unwrap();
    store.set("doctors", "view_mode", "card").unwrap();
    store.set("tariffs", "view_mode", "table").unwrap();

    store.clear("doctors").unwrap();
    assert_eq!(store.get("doctors", "view_mode").unwrap(), None);
    assert_eq!(store.get("tariffs", "view_mode").unwrap().as_deref(), Some("table"));
  }

  #[test]
  fn test_noop_forgets() {
    let store = NoopPreferences;
    store.set("doctors", "view_mode", "card").unwrap();
    assert_eq!(store.get("doctors", "view_mode").unwrap(), None);
  }
}
