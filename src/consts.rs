//! Project-wide constants.

use std::path::PathBuf;

pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// API base URL when the config store has no `base_url` override.
pub const DEFAULT_BASE_URL: &str = "https://sendly.live";

/// Session tokens issued to the CLI carry this prefix. Only these are
/// revoked server-side on logout.
pub const CLI_TOKEN_PREFIX: &str = "cli_";

/// Test-mode API keys carry this prefix; everything else is live.
pub const TEST_KEY_PREFIX: &str = "sk_test_";

/// Default database path: `~/.sendly/sendly.db`.
/// Single DB for credentials and config.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .expect("cannot determine home directory")
        .join(".sendly")
        .join("sendly.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consts_are_non_empty() {
        assert!(!HOMEPAGE.is_empty());
        assert!(!REPO.is_empty());
        assert!(!DEFAULT_BASE_URL.is_empty());
    }

    #[test]
    fn consts_from_cargo_toml() {
        assert!(HOMEPAGE.contains("sendly.live"));
        assert!(REPO.contains("github.com/sendly-live"));
    }

    #[test]
    fn key_prefixes_are_distinct() {
        assert!(!CLI_TOKEN_PREFIX.starts_with(TEST_KEY_PREFIX));
        assert!(!TEST_KEY_PREFIX.starts_with(CLI_TOKEN_PREFIX));
    }
}
