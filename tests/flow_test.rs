//! Poll-loop state machine tests against a scripted auth server.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use sendly::auth::codes::{SessionCode, UserCode};
use sendly::auth::device::{DeviceAuthApi, DeviceCodeGrant, PollReply, TokenResponse};
use sendly::auth::error::AuthError;
use sendly::auth::flow::FlowConfig;
use sendly::auth;
use sendly::auth::storage::{AuthStorage, Credential};
use sendly::onboarding::{NoOnboarding, OnboardingHook};

/// One scripted poll outcome.
enum Step {
    Pending,
    NetworkError,
    Authorized,
    Denied,
    Expired,
}

fn tokens(access: &str) -> TokenResponse {
    TokenResponse {
        access_token: access.to_string(),
        refresh_token: "cli_refresh_1".to_string(),
        expires_in: 3600,
        user_id: "usr_123".to_string(),
        email: "ada@example.com".to_string(),
    }
}

/// Scripted server: pops one step per poll; an exhausted script keeps
/// answering `authorization_pending`.
struct ScriptedApi {
    script: Mutex<VecDeque<Step>>,
    polls: AtomicU32,
    revocations: AtomicU32,
    registered: Mutex<Option<(String, String)>>,
    access_token: String,
    fail_register: bool,
    fail_revoke: bool,
    reject_key: bool,
}

impl ScriptedApi {
    fn new(script: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            polls: AtomicU32::new(0),
            revocations: AtomicU32::new(0),
            registered: Mutex::new(None),
            access_token: "cli_access_1".to_string(),
            fail_register: false,
            fail_revoke: false,
            reject_key: false,
        }
    }

    fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    fn revocations(&self) -> u32 {
        self.revocations.load(Ordering::SeqCst)
    }

    fn registered_user_code(&self) -> String {
        self.registered.lock().unwrap().as_ref().unwrap().1.clone()
    }
}

#[async_trait]
impl DeviceAuthApi for ScriptedApi {
    async fn register(
        &self,
        session: &SessionCode,
        user: &UserCode,
    ) -> Result<DeviceCodeGrant, AuthError> {
        if self.fail_register {
            return Err(AuthError::Registration("server unavailable".to_string()));
        }
        *self.registered.lock().unwrap() =
            Some((session.as_str().to_string(), user.as_str().to_string()));
        Ok(DeviceCodeGrant {
            verification_url: format!("https://sendly.live/cli/verify?code={}", session.as_str()),
            expires_in: 300,
            interval: 0,
        })
    }

    async fn poll(&self, _session: &SessionCode) -> Result<PollReply> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(Step::Pending) | None => Ok(PollReply::Pending),
            Some(Step::NetworkError) => Err(anyhow!("connection reset")),
            Some(Step::Authorized) => Ok(PollReply::Authorized(tokens(&self.access_token))),
            Some(Step::Denied) => Ok(PollReply::Denied),
            Some(Step::Expired) => Ok(PollReply::Expired),
        }
    }

    async fn revoke(&self, _access_token: &str) -> Result<()> {
        self.revocations.fetch_add(1, Ordering::SeqCst);
        if self.fail_revoke {
            return Err(anyhow!("offline"));
        }
        Ok(())
    }

    async fn verify_key(&self, _key: &str) -> Result<(), AuthError> {
        if self.reject_key {
            return Err(AuthError::InvalidApiKey("key was revoked".to_string()));
        }
        Ok(())
    }
}

/// Hook that records every token it is offered.
#[derive(Default)]
struct RecordingHook {
    offers: Mutex<Vec<String>>,
}

#[async_trait]
impl OnboardingHook for RecordingHook {
    async fn offer(&self, access_token: &str) -> Result<bool> {
        self.offers.lock().unwrap().push(access_token.to_string());
        Ok(true)
    }
}

/// Hook that always blows up.
struct FailingHook;

#[async_trait]
impl OnboardingHook for FailingHook {
    async fn offer(&self, _access_token: &str) -> Result<bool> {
        Err(anyhow!("onboarding service is down"))
    }
}

fn mem_storage() -> AuthStorage {
    AuthStorage::open(":memory:").unwrap()
}

/// Zero-sleep config so scripted runs finish instantly.
fn fast(max_attempts: u32) -> FlowConfig {
    FlowConfig {
        fallback_interval: Duration::ZERO,
        max_attempts,
    }
}

fn no_launch(_url: &str) -> Result<()> {
    Ok(())
}

// ── Poll loop terminal states ─────────────────────────────────────

#[tokio::test]
async fn pending_n_times_then_authorized_polls_n_plus_one() {
    let api = ScriptedApi::new(vec![
        Step::Pending,
        Step::Pending,
        Step::Pending,
        Step::Authorized,
    ]);
    let storage = mem_storage();

    let result = auth::browser_login(&api, &storage, &fast(150), no_launch, &NoOnboarding)
        .await
        .unwrap();

    assert_eq!(api.polls(), 4);
    assert_eq!(result.email, "ada@example.com");
    match storage.get().unwrap().unwrap() {
        Credential::Session { access, .. } => assert_eq!(access, "cli_access_1"),
        _ => panic!("expected Session"),
    }
}

#[tokio::test]
async fn always_pending_times_out_at_the_ceiling() {
    let api = ScriptedApi::new(vec![]);
    let storage = mem_storage();

    let err = auth::browser_login(&api, &storage, &fast(7), no_launch, &NoOnboarding)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::TimedOut));
    assert_eq!(api.polls(), 7);
    assert!(storage.get().unwrap().is_none());
}

#[tokio::test]
async fn denied_aborts_after_exactly_one_poll() {
    let api = ScriptedApi::new(vec![Step::Denied]);
    let storage = mem_storage();

    let err = auth::browser_login(&api, &storage, &fast(150), no_launch, &NoOnboarding)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Denied));
    assert_eq!(api.polls(), 1);
    assert!(storage.get().unwrap().is_none());
}

#[tokio::test]
async fn expired_aborts_immediately() {
    let api = ScriptedApi::new(vec![Step::Pending, Step::Expired]);
    let storage = mem_storage();

    let err = auth::browser_login(&api, &storage, &fast(150), no_launch, &NoOnboarding)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Expired));
    assert_eq!(api.polls(), 2);
    assert!(storage.get().unwrap().is_none());
}

#[tokio::test]
async fn network_errors_are_absorbed_not_fatal() {
    let api = ScriptedApi::new(vec![
        Step::NetworkError,
        Step::NetworkError,
        Step::Pending,
        Step::NetworkError,
        Step::Authorized,
    ]);
    let storage = mem_storage();

    auth::browser_login(&api, &storage, &fast(150), no_launch, &NoOnboarding)
        .await
        .unwrap();

    assert_eq!(api.polls(), 5);
    assert!(storage.get().unwrap().is_some());
}

#[tokio::test]
async fn registration_failure_aborts_before_any_polling() {
    let mut api = ScriptedApi::new(vec![]);
    api.fail_register = true;
    let storage = mem_storage();

    let err = auth::browser_login(&api, &storage, &fast(150), no_launch, &NoOnboarding)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Registration(_)));
    assert_eq!(api.polls(), 0);
    assert!(storage.get().unwrap().is_none());
}

// ── Dual-code security model ──────────────────────────────────────

#[tokio::test]
async fn launcher_never_sees_the_user_code() {
    let api = ScriptedApi::new(vec![Step::Authorized]);
    let storage = mem_storage();
    let launched: Mutex<Option<String>> = Mutex::new(None);

    auth::browser_login(
        &api,
        &storage,
        &fast(150),
        |url| {
            *launched.lock().unwrap() = Some(url.to_string());
            Ok(())
        },
        &NoOnboarding,
    )
    .await
    .unwrap();

    let url = launched.lock().unwrap().clone().unwrap();
    let user_code = api.registered_user_code();
    assert!(!url.contains(&user_code), "user code leaked into the URL");
    // The session code is the one that belongs there.
    let (session_code, _) = api.registered.lock().unwrap().clone().unwrap();
    assert!(url.contains(&session_code));
}

#[tokio::test]
async fn launcher_failure_does_not_abort_the_flow() {
    let api = ScriptedApi::new(vec![Step::Pending, Step::Authorized]);
    let storage = mem_storage();

    auth::browser_login(
        &api,
        &storage,
        &fast(150),
        |_url| Err(anyhow!("no display")),
        &NoOnboarding,
    )
    .await
    .unwrap();

    assert!(storage.get().unwrap().is_some());
}

// ── Cancellation ──────────────────────────────────────────────────

#[tokio::test]
async fn interrupting_mid_poll_leaves_the_store_untouched() {
    let api = ScriptedApi::new(vec![]);
    let storage = mem_storage();
    let config = FlowConfig {
        fallback_interval: Duration::from_millis(5),
        max_attempts: 1000,
    };

    let login = auth::browser_login(&api, &storage, &config, no_launch, &NoOnboarding);
    tokio::select! {
        _ = login => panic!("login should still be pending"),
        _ = tokio::time::sleep(Duration::from_millis(40)) => {}
    }

    assert!(storage.get().unwrap().is_none());
}

// ── Onboarding hook ───────────────────────────────────────────────

#[tokio::test]
async fn hook_runs_once_with_the_fresh_token() {
    let api = ScriptedApi::new(vec![Step::Authorized]);
    let storage = mem_storage();
    let hook = RecordingHook::default();

    auth::browser_login(&api, &storage, &fast(150), no_launch, &hook)
        .await
        .unwrap();

    let offers = hook.offers.lock().unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0], "cli_access_1");
}

#[tokio::test]
async fn hook_is_skipped_for_non_cli_tokens() {
    let mut api = ScriptedApi::new(vec![Step::Authorized]);
    api.access_token = "tok_browser_session".to_string();
    let storage = mem_storage();
    let hook = RecordingHook::default();

    auth::browser_login(&api, &storage, &fast(150), no_launch, &hook)
        .await
        .unwrap();

    assert!(hook.offers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn hook_failure_never_unwinds_the_login() {
    let api = ScriptedApi::new(vec![Step::Authorized]);
    let storage = mem_storage();

    let result = auth::browser_login(&api, &storage, &fast(150), no_launch, &FailingHook).await;

    assert!(result.is_ok());
    assert!(storage.get().unwrap().is_some(), "credential was unwound");
}

// ── API-key login ─────────────────────────────────────────────────

#[tokio::test]
async fn api_key_login_verifies_then_stores() {
    let api = ScriptedApi::new(vec![]);
    let storage = mem_storage();

    auth::api_key_login(&api, &storage, "sk_test_abc")
        .await
        .unwrap();

    match storage.get().unwrap().unwrap() {
        Credential::ApiKey { key } => assert_eq!(key, "sk_test_abc"),
        _ => panic!("expected ApiKey"),
    }
}

#[tokio::test]
async fn rejected_api_key_is_not_stored() {
    let mut api = ScriptedApi::new(vec![]);
    api.reject_key = true;
    let storage = mem_storage();

    let err = auth::api_key_login(&api, &storage, "sk_test_abc")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidApiKey(_)));
    assert!(storage.get().unwrap().is_none());
}

// ── Logout ────────────────────────────────────────────────────────

#[tokio::test]
async fn logout_revokes_cli_tokens_then_clears() {
    let api = ScriptedApi::new(vec![]);
    let storage = mem_storage();
    storage.set_session_tokens(&tokens("cli_access_1")).unwrap();

    auth::logout(&api, &storage).await.unwrap();

    assert_eq!(api.revocations(), 1);
    assert!(storage.get().unwrap().is_none());
}

#[tokio::test]
async fn logout_clears_even_when_revocation_fails() {
    let mut api = ScriptedApi::new(vec![]);
    api.fail_revoke = true;
    let storage = mem_storage();
    storage.set_session_tokens(&tokens("cli_access_1")).unwrap();

    auth::logout(&api, &storage).await.unwrap();

    assert_eq!(api.revocations(), 1);
    assert!(storage.get().unwrap().is_none(), "store must be empty");
}

#[tokio::test]
async fn logout_skips_revocation_for_api_keys() {
    let api = ScriptedApi::new(vec![]);
    let storage = mem_storage();
    storage.set_api_key("sk_live_abc").unwrap();

    auth::logout(&api, &storage).await.unwrap();

    assert_eq!(api.revocations(), 0);
    assert!(storage.get().unwrap().is_none());
}

#[tokio::test]
async fn logout_skips_revocation_for_foreign_session_tokens() {
    let api = ScriptedApi::new(vec![]);
    let storage = mem_storage();
    storage
        .set_session_tokens(&tokens("tok_browser_session"))
        .unwrap();

    auth::logout(&api, &storage).await.unwrap();

    assert_eq!(api.revocations(), 0);
    assert!(storage.get().unwrap().is_none());
}
