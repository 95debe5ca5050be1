use anyhow::Result;

use super::open_stores;
use crate::auth::{self, device::HttpDeviceAuth};
use crate::output;

/// `sendly logout`
///
/// Revokes a CLI session token server-side when it can, then clears
/// local credentials either way.
pub async fn run(json: bool) -> Result<()> {
    let (config, storage) = open_stores()?;

    if storage.get()?.is_none() {
        if json {
            output::print_json(&serde_json::json!({ "loggedOut": false }))?;
        } else {
            output::info("Not currently logged in");
        }
        return Ok(());
    }

    let api = HttpDeviceAuth::new(config.base_url()?);
    auth::logout(&api, &storage).await?;

    if json {
        output::print_json(&serde_json::json!({ "loggedOut": true }))?;
    } else {
        output::success("Logged out successfully");
    }
    Ok(())
}
