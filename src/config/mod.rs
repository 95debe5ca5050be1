//! Key-value configuration storage backed by SQLite.
//!
//! Shares a database with [`AuthStorage`](crate::auth::AuthStorage) —
//! pass the same path to both. Holds the API base URL override, the
//! environment label, and the active-team pointer.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::consts::DEFAULT_BASE_URL;

const TEAM_KEY: &str = "current_team";

/// Pointer to the remote team the CLI acts as. Not an owned copy: the
/// server is authoritative, and staleness is the caller's problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTeam {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get a config value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a config key.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }

    /// API base URL: the stored override, else the production default.
    pub fn base_url(&self) -> Result<String> {
        Ok(self
            .get("base_url")?
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
    }

    /// Environment label shown by `whoami`.
    pub fn environment(&self) -> Result<String> {
        Ok(self
            .get("environment")?
            .unwrap_or_else(|| "production".to_string()))
    }

    /// The active team, if one is set.
    pub fn team(&self) -> Result<Option<ActiveTeam>> {
        match self.get(TEAM_KEY)? {
            Some(json) => Ok(Some(
                serde_json::from_str(&json).context("corrupt team pointer in config")?,
            )),
            None => Ok(None),
        }
    }

    /// Point the CLI at a team. Set by team-create and team-switch.
    pub fn set_team(&self, team: &ActiveTeam) -> Result<()> {
        self.set(TEAM_KEY, &serde_json::to_string(team)?)
    }

    /// Back to the personal account.
    pub fn clear_team(&self) -> Result<()> {
        self.remove(TEAM_KEY)
    }
}
