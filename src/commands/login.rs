use anyhow::Result;

use super::open_stores;
use crate::auth;
use crate::auth::device::HttpDeviceAuth;
use crate::auth::flow::FlowConfig;
use crate::consts::TEST_KEY_PREFIX;
use crate::onboarding::QuickStart;
use crate::output;

/// `sendly login [--api-key <key>]`
pub async fn run(api_key: Option<String>, json: bool) -> Result<()> {
    let (config, storage) = open_stores()?;
    let base_url = config.base_url()?;
    let api = HttpDeviceAuth::new(&base_url);

    if let Some(key) = api_key {
        let key = key.trim();
        auth::api_key_login(&api, &storage, key).await?;

        let kind = if key.starts_with(TEST_KEY_PREFIX) {
            "test"
        } else {
            "live"
        };
        if json {
            output::print_json(&serde_json::json!({
                "authenticated": true,
                "method": "api_key",
                "keyType": kind,
            }))?;
        } else {
            output::success(&format!("Logged in with {kind} API key"));
        }
        return Ok(());
    }

    let flow = FlowConfig::default();
    let hook = QuickStart::new(&base_url);
    let tokens = auth::browser_login(
        &api,
        &storage,
        &flow,
        |url| open::that(url).map_err(Into::into),
        &hook,
    )
    .await?;

    if json {
        output::print_json(&serde_json::json!({
            "authenticated": true,
            "method": "browser",
            "email": tokens.email,
            "userId": tokens.user_id,
        }))?;
    } else {
        output::success(&format!("Logged in as {}", tokens.email));
    }
    Ok(())
}
