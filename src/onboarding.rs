//! First-time setup offered after a fresh browser login.
//!
//! The hook runs after the credential write commits. Whatever it does
//! (decline, fail, hang up), the login stays logged in.

use std::io::{self, IsTerminal, Write};

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::Deserialize;

use crate::output;

/// Post-login setup hook. Invoked once with the fresh session token.
#[async_trait]
pub trait OnboardingHook: Send + Sync {
    /// Returns whether an interactive setup actually ran.
    async fn offer(&self, access_token: &str) -> Result<bool>;
}

/// Hook that never offers setup. For non-interactive callers and tests.
pub struct NoOnboarding;

#[async_trait]
impl OnboardingHook for NoOnboarding {
    async fn offer(&self, _access_token: &str) -> Result<bool> {
        Ok(false)
    }
}

/// The real quick-start: asks the server whether the account still needs
/// setup, and when it does, offers to mint a first test API key.
pub struct QuickStart {
    base_url: String,
}

impl QuickStart {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OnboardingStatus {
    needs_setup: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedKey {
    key: String,
}

#[async_trait]
impl OnboardingHook for QuickStart {
    async fn offer(&self, access_token: &str) -> Result<bool> {
        let client = reqwest::Client::new();

        // The status probe is best-effort; an account that can't be
        // checked just skips the offer.
        let resp = client
            .get(format!("{}/api/cli/onboarding/status", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Ok(false);
        }
        let status: OnboardingStatus = resp.json().await?;
        if !status.needs_setup || !io::stdin().is_terminal() {
            return Ok(false);
        }

        println!();
        println!("{}", output::bold("Quick start"));
        print!("Create your first test API key now? [Y/n] ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        if !answer.is_empty() && answer != "y" && answer != "yes" {
            return Ok(false);
        }

        let resp = client
            .post(format!("{}/api/v1/account/keys", self.base_url))
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "name": "CLI quick start", "type": "test" }))
            .send()
            .await?;
        if !resp.status().is_success() {
            bail!("could not create a key (status {})", resp.status());
        }
        let created: CreatedKey = resp.json().await?;

        println!();
        output::success("Test API key created");
        println!();
        println!("  {}", output::bold(&created.key));
        println!();
        println!(
            "{}",
            output::dim("Store it somewhere safe. It is only shown once.")
        );
        println!(
            "See your keys any time with {}",
            output::primary("sendly keys list")
        );

        Ok(true)
    }
}
