use anyhow::Result;

use super::open_stores;
use crate::auth::Credential;
use crate::auth::storage::KeyKind;
use crate::output;

/// `sendly whoami`: show auth status from local state, no server call.
pub fn run(json: bool) -> Result<()> {
    let (config, storage) = open_stores()?;
    let environment = config.environment()?;
    let team = config.team()?;

    let Some(credential) = storage.get()? else {
        if json {
            output::print_json(&serde_json::json!({
                "authenticated": false,
                "environment": environment,
            }))?;
        } else {
            output::info("Not logged in");
            println!();
            println!("  Run {} to authenticate", output::primary("sendly login"));
        }
        return Ok(());
    };

    match &credential {
        Credential::Session {
            email,
            user_id,
            ..
        } => {
            let expired = credential.is_expired();
            if json {
                output::print_json(&serde_json::json!({
                    "authenticated": true,
                    "method": "session",
                    "email": email,
                    "userId": user_id,
                    "expired": expired,
                    "environment": environment,
                    "team": team,
                }))?;
                return Ok(());
            }

            println!();
            let mut pairs = vec![
                ("Email", email.clone()),
                ("User ID", output::dim(user_id)),
                ("Environment", environment),
            ];
            if let Some(team) = &team {
                pairs.push(("Team", output::primary(&team.name)));
            }
            if expired {
                pairs.push(("Session", output::red("expired")));
            }
            output::key_value(&pairs);
            if expired {
                println!();
                println!("  Run {} to refresh", output::primary("sendly login"));
            }
        }
        Credential::ApiKey { .. } => {
            let kind = credential.key_kind().expect("api key has a kind");
            if json {
                output::print_json(&serde_json::json!({
                    "authenticated": true,
                    "method": "api_key",
                    "keyType": kind.as_str(),
                    "environment": environment,
                    "team": team,
                }))?;
                return Ok(());
            }

            println!();
            let key_display = match kind {
                KeyKind::Test => output::yellow("test"),
                KeyKind::Live => output::green("live"),
            };
            let mut pairs = vec![
                ("Auth", "API key".to_string()),
                ("Key type", key_display),
                ("Environment", environment),
            ];
            if let Some(team) = &team {
                pairs.push(("Team", output::primary(&team.name)));
            }
            output::key_value(&pairs);
        }
    }
    Ok(())
}
