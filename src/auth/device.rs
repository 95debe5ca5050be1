//! Client side of the device-authorization endpoints.
//!
//! [`DeviceAuthApi`] is the network seam: the poll loop and the login
//! commands talk to it, and tests swap in a scripted implementation.
//! [`HttpDeviceAuth`] is the production implementation over reqwest.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::codes::{SessionCode, UserCode};
use super::error::AuthError;

/// What the server hands back when a device-code pair is registered.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCodeGrant {
    pub verification_url: String,
    /// Seconds until the server considers the attempt expired.
    pub expires_in: u64,
    /// Requested poll interval in seconds. Zero or absent means the
    /// client falls back to its own default.
    #[serde(default)]
    pub interval: u64,
}

/// Token payload returned once the user approves in the browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user_id: String,
    pub email: String,
}

/// One poll result, already classified.
#[derive(Debug, Clone)]
pub enum PollReply {
    Authorized(TokenResponse),
    /// The user has not finished the browser step yet.
    Pending,
    /// The user explicitly rejected the login.
    Denied,
    /// The server declared the attempt expired.
    Expired,
    /// Unrecognized server error; retried like a network failure.
    Retry,
}

/// The four auth endpoints the CLI talks to.
#[async_trait]
pub trait DeviceAuthApi: Send + Sync {
    /// Register a session/user code pair. A failure here aborts the login
    /// attempt; no retries at this layer.
    async fn register(
        &self,
        session: &SessionCode,
        user: &UserCode,
    ) -> Result<DeviceCodeGrant, AuthError>;

    /// Ask whether the session has been authorized. Transport errors are
    /// transient by contract: the poll loop absorbs them and retries.
    async fn poll(&self, session: &SessionCode) -> Result<PollReply>;

    /// Best-effort server-side revocation of a CLI session token.
    async fn revoke(&self, access_token: &str) -> Result<()>;

    /// Validate an API key as a bearer credential.
    async fn verify_key(&self, key: &str) -> Result<(), AuthError>;
}

/// Production implementation against the Sendly auth server.
pub struct HttpDeviceAuth {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDeviceAuth {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl DeviceAuthApi for HttpDeviceAuth {
    async fn register(
        &self,
        session: &SessionCode,
        user: &UserCode,
    ) -> Result<DeviceCodeGrant, AuthError> {
        let resp = self
            .client
            .post(format!("{}/api/cli/auth/device-code", self.base_url))
            .json(&serde_json::json!({
                "deviceCode": session.as_str(),
                "userCode": user.as_str(),
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            let message = body
                .message
                .unwrap_or_else(|| "failed to initiate login".to_string());
            return Err(AuthError::Registration(message));
        }

        Ok(resp.json().await?)
    }

    async fn poll(&self, session: &SessionCode) -> Result<PollReply> {
        let resp = self
            .client
            .post(format!("{}/api/cli/auth/token", self.base_url))
            .json(&serde_json::json!({ "deviceCode": session.as_str() }))
            .send()
            .await?;

        if resp.status().is_success() {
            let tokens: TokenResponse = resp.json().await?;
            return Ok(PollReply::Authorized(tokens));
        }

        let body: ErrorBody = resp.json().await.unwrap_or_default();
        Ok(match body.error.as_deref() {
            Some("authorization_pending") => PollReply::Pending,
            Some("expired_token") => PollReply::Expired,
            Some("access_denied") => PollReply::Denied,
            _ => PollReply::Retry,
        })
    }

    async fn revoke(&self, access_token: &str) -> Result<()> {
        self.client
            .post(format!("{}/api/cli/auth/logout", self.base_url))
            .bearer_auth(access_token)
            .json(&serde_json::json!({}))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn verify_key(&self, key: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(format!("{}/api/cli/auth/verify-key", self.base_url))
            .bearer_auth(key)
            .send()
            .await?;

        if !resp.status().is_success() {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            let message = body
                .message
                .unwrap_or_else(|| "invalid API key".to_string());
            return Err(AuthError::InvalidApiKey(message));
        }

        Ok(())
    }
}
