//! Login failure taxonomy.
//!
//! Terminal poll outcomes (`Denied`, `Expired`, `TimedOut`) are reported
//! once and never retried; a fresh attempt must be user-initiated.
//! Transient poll failures never appear here; they only advance the
//! attempt counter inside the poll loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Device-code registration failed. Fatal before any polling.
    #[error("could not start login: {0}")]
    Registration(String),

    /// The user rejected the login in the browser.
    #[error("login was denied in the browser")]
    Denied,

    /// The server declared the login attempt expired.
    #[error("login request expired; run `sendly login` to try again")]
    Expired,

    /// The local attempt ceiling was reached without a server resolution.
    #[error("timed out waiting for authorization; run `sendly login` to try again")]
    TimedOut,

    /// The server rejected the candidate API key.
    #[error("{0}")]
    InvalidApiKey(String),

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
