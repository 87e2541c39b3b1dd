use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{AppError, Result};

/// Document holding the credential store.
pub const USERS_KEY: &str = "users";
/// Document holding the active session; absent while logged out.
pub const SESSION_KEY: &str = "session";
/// Document holding the metadata-only media manifest.
pub const MANIFEST_KEY: &str = "media-manifest";

/// The DocumentStore keeps one JSON document per key in a SQLite table.
/// Every save overwrites the whole document in a single statement.
///
/// Cloning is cheap; all clones share one connection.
#[derive(Clone)]
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
}

impl DocumentStore {
    /// Open (or create) the store at `db_path`, creating parent directories.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;

        tracing::info!("Document store opened at: {}", db_path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: Some(db_path.to_path_buf()),
        })
    }

    /// A store that lives only as long as the process.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: None,
        })
    }

    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                key             TEXT PRIMARY KEY,
                body            TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Path to the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        let conn = self.conn.lock().map_err(|_| AppError::LockPoisoned)?;
        Ok(f(&conn)?)
    }

    /// Raw JSON text stored under `key`.
    pub fn load_json(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT body FROM documents WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
        })
    }

    /// Replace the document under `key`.
    pub fn save_json(&self, key: &str, body: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (key, body, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
                params![key, body, now],
            )
        })?;
        Ok(())
    }

    /// Remove the document under `key`. Missing keys are fine.
    pub fn delete_json(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| conn.execute("DELETE FROM documents WHERE key = ?1", [key]))?;
        Ok(())
    }

    /// Load and deserialize a document.
    ///
    /// A document that no longer parses is treated as absent and logged.
    pub fn load_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.load_json(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable document '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    /// Serialize (pretty JSON) and save a document.
    pub fn save_typed<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string_pretty(value)?;
        self.save_json(key, &raw)
    }
}

#[cfg(test)]
impl DocumentStore {
    /// Make every later read and write fail.
    pub(crate) fn drop_documents_table(&self) -> Result<()> {
        self.with_conn(|conn| conn.execute("DROP TABLE documents", []))?;
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}
