//! Persisted credential storage.
//!
//! One credential is active at a time: logging in with a session token
//! replaces a stored API key and vice versa. The single-row table plus
//! SQLite's transactional writes give atomic replace-on-write; an
//! interrupted write cannot leave a half-written credential behind.
//!
//! Shares a database with [`Config`](crate::config::Config) — pass the
//! same path to both.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use rusqlite::Connection;

use super::device::TokenResponse;
use crate::consts::TEST_KEY_PREFIX;

/// The active credential. Exactly one variant is stored at a time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Credential {
    #[serde(rename = "session")]
    Session {
        access: String,
        refresh: String,
        /// Expiration timestamp in milliseconds since epoch.
        expires: u64,
        user_id: String,
        email: String,
    },
    #[serde(rename = "api_key")]
    ApiKey { key: String },
}

/// Whether an API key is a test or live key, judged by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Test,
    Live,
}

impl KeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Test => "test",
            KeyKind::Live => "live",
        }
    }
}

impl Credential {
    /// Session tokens expire; API keys do not. Expiry is advisory: the
    /// store itself never drops an expired credential.
    pub fn is_expired(&self) -> bool {
        match self {
            Credential::Session { expires, .. } => now_ms() >= *expires,
            Credential::ApiKey { .. } => false,
        }
    }

    /// The string that goes in the `Authorization: Bearer` header.
    pub fn bearer(&self) -> &str {
        match self {
            Credential::Session { access, .. } => access,
            Credential::ApiKey { key } => key,
        }
    }

    /// Key classification for API keys, `None` for session tokens.
    pub fn key_kind(&self) -> Option<KeyKind> {
        match self {
            Credential::ApiKey { key } => Some(if key.starts_with(TEST_KEY_PREFIX) {
                KeyKind::Test
            } else {
                KeyKind::Live
            }),
            Credential::Session { .. } => None,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_millis() as u64
}

/// Manages the single stored credential in SQLite.
pub struct AuthStorage {
    conn: Mutex<Connection>,
}

impl AuthStorage {
    /// Open or create the credential table in the given database path.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS credential (
                id   INTEGER PRIMARY KEY CHECK (id = 0),
                data TEXT NOT NULL
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get the stored credential, if any. A `None` means "not logged in";
    /// an expired session still comes back `Some`.
    pub fn get(&self) -> Result<Option<Credential>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT data FROM credential WHERE id = 0")?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => {
                let json: String = row.get(0)?;
                let cred: Credential = serde_json::from_str(&json)?;
                Ok(Some(cred))
            }
            None => Ok(None),
        }
    }

    /// Store a credential, replacing whichever variant was active before.
    pub fn set(&self, credential: &Credential) -> Result<()> {
        let json = serde_json::to_string(credential)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO credential (id, data) VALUES (0, ?1)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
            [json.as_str()],
        )?;
        Ok(())
    }

    /// Store the token pair from a successful browser login.
    pub fn set_session_tokens(&self, tokens: &TokenResponse) -> Result<()> {
        self.set(&Credential::Session {
            access: tokens.access_token.clone(),
            refresh: tokens.refresh_token.clone(),
            expires: now_ms() + tokens.expires_in * 1000,
            user_id: tokens.user_id.clone(),
            email: tokens.email.clone(),
        })
    }

    /// Store an API key from a direct key login.
    pub fn set_api_key(&self, key: &str) -> Result<()> {
        self.set(&Credential::ApiKey {
            key: key.to_string(),
        })
    }

    /// Remove the stored credential.
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM credential WHERE id = 0", [])?;
        Ok(())
    }

    /// Bearer string for the `Authorization` header, whichever variant
    /// is active.
    pub fn bearer_token(&self) -> Result<Option<String>> {
        Ok(self.get()?.map(|c| c.bearer().to_string()))
    }
}
