//! The polling state machine.
//!
//! After registration the flow sleeps for the server interval, then asks
//! once whether the session was authorized, and repeats until a terminal
//! state: authorized, denied, expired, or the local attempt ceiling.
//!
//! The error asymmetry is deliberate and load-bearing: network failures
//! and unrecognized errors are absorbed (the user may still be mid-flow
//! in the browser), while explicit denial and expiry abort immediately.

use std::time::Duration;

use super::codes::SessionCode;
use super::device::{DeviceAuthApi, DeviceCodeGrant, PollReply, TokenResponse};
use super::error::AuthError;

/// Poll interval used when the server omits one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Attempt ceiling: ~5 minutes at the default interval. Bounds the flow
/// even when the server never reports expiry.
pub const MAX_POLL_ATTEMPTS: u32 = 150;

/// Tunable knobs of the poll loop. Self-hosted servers with different
/// SLAs can deviate from the defaults.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub fallback_interval: Duration,
    pub max_attempts: u32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            fallback_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// Interval to poll at: the server value wins, the fallback covers a
/// zero or missing one.
pub fn poll_interval(grant: &DeviceCodeGrant, config: &FlowConfig) -> Duration {
    if grant.interval > 0 {
        Duration::from_secs(grant.interval)
    } else {
        config.fallback_interval
    }
}

/// Drive the poll loop to a terminal state.
///
/// Issues at most `config.max_attempts` poll requests, sleeping `interval`
/// before each one. Returns the token payload on authorization; every
/// other terminal state maps to an [`AuthError`] variant.
pub async fn poll_until_resolved(
    api: &dyn DeviceAuthApi,
    session: &SessionCode,
    interval: Duration,
    config: &FlowConfig,
) -> Result<TokenResponse, AuthError> {
    for _ in 0..config.max_attempts {
        tokio::time::sleep(interval).await;

        match api.poll(session).await {
            Ok(PollReply::Authorized(tokens)) => return Ok(tokens),
            Ok(PollReply::Denied) => return Err(AuthError::Denied),
            Ok(PollReply::Expired) => return Err(AuthError::Expired),
            // Still waiting, or a transient failure. Keep polling.
            Ok(PollReply::Pending) | Ok(PollReply::Retry) | Err(_) => continue,
        }
    }

    Err(AuthError::TimedOut)
}
