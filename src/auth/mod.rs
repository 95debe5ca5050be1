//! Browser-based device-authorization login, API-key login, and logout.
//!
//! The browser flow coordinates three parties: this process, the auth
//! server, and a human in a browser. Two unrelated codes keep it safe.
//! The session code rides in the verification URL; the user code is
//! shown only in the terminal. Someone who intercepts the URL cannot
//! approve the login without also seeing the terminal.

pub mod codes;
pub mod device;
pub mod error;
pub mod flow;
pub mod storage;

pub use error::AuthError;
pub use storage::{AuthStorage, Credential};

use anyhow::Result;

use crate::consts::CLI_TOKEN_PREFIX;
use crate::onboarding::OnboardingHook;
use crate::output;
use crate::spinner::Spinner;
use codes::{SessionCode, UserCode};
use device::{DeviceAuthApi, TokenResponse};
use flow::FlowConfig;

/// Run the full browser login: generate codes, register them, open the
/// browser, poll until resolved, persist the tokens.
///
/// The credential store is written exactly once, on authorization;
/// interrupting the flow at any earlier point leaves it untouched.
/// `launch` receives only the verification URL; its failure is non-fatal
/// since the URL is printed for manual copy either way. The onboarding
/// hook runs after the store write commits, and its failure never
/// unwinds a login that already succeeded.
pub async fn browser_login(
    api: &dyn DeviceAuthApi,
    storage: &AuthStorage,
    config: &FlowConfig,
    launch: impl FnOnce(&str) -> Result<()>,
    hook: &dyn OnboardingHook,
) -> Result<TokenResponse, AuthError> {
    let session = SessionCode::generate();
    let user = UserCode::generate();

    let grant = api.register(&session, &user).await?;

    println!();
    println!("{}", output::bold("Login to Sendly"));
    println!();
    println!("Open this URL in your browser:");
    println!("  {}", output::primary(&grant.verification_url));
    println!();
    println!("And enter this code:");
    println!("  {}", output::bold(&output::primary(&user.display())));
    println!();

    // Only the verification URL crosses this boundary, never the user code.
    if launch(&grant.verification_url).is_ok() {
        println!("{}", output::dim("Browser opened automatically"));
    } else {
        println!("{}", output::dim("Please open the URL manually"));
    }
    println!();

    let spinner = Spinner::start("Waiting for authorization...");
    let interval = flow::poll_interval(&grant, config);
    let tokens = match flow::poll_until_resolved(api, &session, interval, config).await {
        Ok(tokens) => {
            spinner.succeed("Authorized").await;
            tokens
        }
        Err(e) => {
            spinner.stop().await;
            return Err(e);
        }
    };

    storage.set_session_tokens(&tokens)?;

    // First-time setup is offered only for CLI session tokens.
    if tokens.access_token.starts_with(CLI_TOKEN_PREFIX)
        && let Err(e) = hook.offer(&tokens.access_token).await
    {
        output::warn(&format!("first-time setup skipped: {e}"));
    }

    Ok(tokens)
}

/// Log in with an API key: one verification round-trip, then persist the
/// key. No codes, no polling.
pub async fn api_key_login(
    api: &dyn DeviceAuthApi,
    storage: &AuthStorage,
    key: &str,
) -> Result<(), AuthError> {
    api.verify_key(key).await?;
    storage.set_api_key(key)?;
    Ok(())
}

/// Log out in two phases: best-effort server-side revocation for CLI
/// session tokens, then unconditionally clear local storage. Revocation
/// failures (offline, server error) are swallowed so the user can
/// always log out.
pub async fn logout(api: &dyn DeviceAuthApi, storage: &AuthStorage) -> Result<()> {
    if let Some(Credential::Session { access, .. }) = storage.get()?
        && access.starts_with(CLI_TOKEN_PREFIX)
    {
        let _ = api.revoke(&access).await;
    }
    storage.clear()
}
