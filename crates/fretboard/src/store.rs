use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Snapshot format version. Rows written under any other version are
/// ignored on load.
pub const SNAPSHOT_VERSION: u32 = 1;

pub const CHORDIE_KEY: &str = "chordie";
pub const PREFERENCES_KEY: &str = "preferences";
pub const CUSTOM_TUNING_KEY: &str = "custom_tuning";

/// Durable key/value storage for JSON snapshots.
pub trait SnapshotStore: Send + Sync {
    fn load(&self, key: &str, version: u32) -> Result<Option<String>>;

    fn save(&self, key: &str, version: u32, json: &str) -> Result<()>;
}

/// SQLite-backed snapshot store, one row per `(key, version)`.
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating snapshot dir {}", parent.display()))?;
        }
        let connection = Connection::open(db_path).context("opening snapshot db")?;

        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS snapshots (
                    key        TEXT NOT NULL,
                    version    INTEGER NOT NULL,
                    updated_at TEXT NOT NULL,
                    value_json TEXT NOT NULL,
                    PRIMARY KEY (key, version)
                );",
            )
            .context("creating snapshots table")?;

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl SnapshotStore for SqliteStore {
    fn load(&self, key: &str, version: u32) -> Result<Option<String>> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot store mutex poisoned"))?;

        let mut stmt = conn
            .prepare_cached("SELECT value_json FROM snapshots WHERE key = ?1 AND version = ?2")?;

        match stmt.query_row(rusqlite::params![key, version], |row| row.get::<_, String>(0)) {
            Ok(json) => Ok(Some(json)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("loading snapshot {key}")),
        }
    }

    fn save(&self, key: &str, version: u32, json: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let conn = self
            .connection
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot store mutex poisoned"))?;

        conn.execute(
            "INSERT OR REPLACE INTO snapshots (key, version, updated_at, value_json)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![key, version, now, json],
        )
        .with_context(|| format!("saving snapshot {key}"))?;

        Ok(())
    }
}

/// In-process store for tests and embedders that keep nothing on disk.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<(String, u32), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str, version: u32) -> Result<Option<String>> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot store mutex poisoned"))?;
        Ok(rows.get(&(key.to_string(), version)).cloned())
    }

    fn save(&self, key: &str, version: u32, json: &str) -> Result<()> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| anyhow::anyhow!("snapshot store mutex poisoned"))?;
        rows.insert((key.to_string(), version), json.to_string());
        Ok(())
    }
}
