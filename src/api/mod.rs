//! Authenticated HTTP client for the Sendly REST API.
//!
//! Every authenticated subcommand builds one of these from the stores:
//! it attaches the bearer credential and, when a team is active, the
//! team header, so server-side scoping follows the local team pointer.

use anyhow::{Result, bail};
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::auth::AuthStorage;
use crate::config::Config;

/// Header carrying the active team ID.
const TEAM_HEADER: &str = "X-Sendly-Team";

/// A non-success response from the API, with the server message when the
/// body carried one.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    token: String,
    team: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, team: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            team,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from the persisted stores. Fails with a login hint
    /// when no credential is stored or the session has expired.
    pub fn from_stores(config: &Config, storage: &AuthStorage) -> Result<Self> {
        let Some(credential) = storage.get()? else {
            bail!("not logged in; run `sendly login` first");
        };
        if credential.is_expired() {
            bail!("session expired; run `sendly login` again");
        }
        let team = config.team()?.map(|t| t.id);
        Ok(Self::new(config.base_url()?, credential.bearer(), team))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token);
        if let Some(team) = &self.team {
            req = req.header(TEAM_HEADER, team);
        }
        req
    }

    async fn handle<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let body: ErrorBody = resp.json().await.unwrap_or_default();
        let message = body
            .message
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Err(ApiError {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.request(Method::GET, path).send().await?;
        Self::handle(resp).await
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let resp = self.request(Method::GET, path).query(query).send().await?;
        Self::handle(resp).await
    }

    pub async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        Self::handle(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let resp = self.request(Method::DELETE, path).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body: ErrorBody = resp.json().await.unwrap_or_default();
        let message = body
            .message
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Err(ApiError {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}
