//! Subcommand implementations. Each module exposes `run` functions that
//! `main` dispatches to after argument parsing.

pub mod campaigns;
pub mod keys;
pub mod login;
pub mod logout;
pub mod onboarding;
pub mod teams;
pub mod verify;
pub mod webhooks;
pub mod whoami;

use anyhow::Result;

use crate::api::ApiClient;
use crate::auth::AuthStorage;
use crate::config::Config;
use crate::consts::default_db_path;

/// Open the shared config/credential database at the default location,
/// creating `~/.sendly/` on first use.
pub fn open_stores() -> Result<(Config, AuthStorage)> {
    let path = default_db_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let path = path.to_string_lossy();
    Ok((Config::open(&path)?, AuthStorage::open(&path)?))
}

/// Stores plus an authenticated API client, for commands that need one.
pub fn authenticated() -> Result<(Config, AuthStorage, ApiClient)> {
    let (config, storage) = open_stores()?;
    let client = ApiClient::from_stores(&config, &storage)?;
    Ok((config, storage, client))
}

/// Read one line from stdin after printing a prompt.
pub(crate) fn prompt_line(prompt: &str) -> Result<String> {
    use std::io::Write;
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Ask a yes/no question, defaulting to yes.
pub(crate) fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{question} [Y/n] "))?.to_lowercase();
    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}
