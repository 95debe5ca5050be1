use anyhow::{Result, bail};
use serde::Deserialize;

use super::{authenticated, confirm, prompt_line};
use crate::config::ActiveTeam;
use crate::output;

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Organization {
    id: String,
    name: String,
    slug: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_personal: bool,
    #[serde(default)]
    role: String,
    #[serde(default)]
    member_count: Option<u64>,
    #[serde(default)]
    created_at: Option<String>,
}

impl Organization {
    fn pointer(&self) -> ActiveTeam {
        ActiveTeam {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// `sendly teams list`
pub async fn list(json: bool) -> Result<()> {
    let (config, _storage, client) = authenticated()?;
    let orgs: Vec<Organization> = client.get("/api/organizations").await?;

    if json {
        return output::print_json(&orgs);
    }

    if orgs.is_empty() {
        output::info("No teams found");
        println!();
        println!(
            "  Create one with {}",
            output::primary("sendly teams create --name \"My Team\"")
        );
        return Ok(());
    }

    let current = config.team()?;
    println!();

    let rows: Vec<Vec<String>> = orgs
        .iter()
        .map(|org| {
            let marker = if current.as_ref().is_some_and(|c| c.id == org.id) {
                "→".to_string()
            } else {
                " ".to_string()
            };
            vec![
                marker,
                org.name.clone(),
                org.role.clone(),
                org.member_count.map_or(String::new(), |n| n.to_string()),
                org.slug.clone(),
                if org.is_personal {
                    "personal".to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect();

    output::table(&["", "Name", "Role", "Members", "Slug", ""], &rows);
    Ok(())
}

/// `sendly teams current`
pub fn current(json: bool) -> Result<()> {
    let (config, _storage) = super::open_stores()?;
    let team = config.team()?;

    if json {
        return match team {
            Some(team) => output::print_json(&team),
            None => output::print_json(&serde_json::json!({ "message": "No active team" })),
        };
    }

    let Some(team) = team else {
        output::info("No active team set");
        println!();
        println!(
            "  Run {} to select a team",
            output::primary("sendly teams switch")
        );
        return Ok(());
    };

    println!();
    output::key_value(&[
        ("Team", output::primary(&team.name)),
        ("ID", output::dim(&team.id)),
        ("Slug", output::dim(&team.slug)),
    ]);
    Ok(())
}

/// `sendly teams switch [TEAM]`: by ID, slug, or name. `personal`,
/// `clear`, or `none` drops back to the personal account.
pub async fn switch(target: Option<String>, json: bool) -> Result<()> {
    let (config, _storage, client) = authenticated()?;

    if let Some(t) = &target
        && matches!(t.as_str(), "personal" | "clear" | "none")
    {
        config.clear_team()?;
        if json {
            return output::print_json(&serde_json::json!({ "cleared": true }));
        }
        output::success("Switched to personal account");
        return Ok(());
    }

    let orgs: Vec<Organization> = client.get("/api/organizations").await?;

    let selected = match target {
        Some(wanted) => orgs
            .iter()
            .find(|o| {
                o.id == wanted || o.slug == wanted || o.name.eq_ignore_ascii_case(&wanted)
            })
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("team not found: {wanted}"))?,
        None => pick_interactively(&config, &orgs)?,
    };

    if selected.is_personal {
        config.clear_team()?;
        if json {
            return output::print_json(&serde_json::json!({ "cleared": true }));
        }
        output::success("Switched to personal account");
        return Ok(());
    }

    config.set_team(&selected.pointer())?;

    if json {
        return output::print_json(&selected.pointer());
    }
    output::success(&format!("Switched to {}", output::primary(&selected.name)));
    Ok(())
}

fn pick_interactively(
    config: &crate::config::Config,
    orgs: &[Organization],
) -> Result<Organization> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() {
        bail!("interactive mode needs a terminal; pass a team ID or slug as argument");
    }
    if orgs.is_empty() {
        bail!("no teams to switch to");
    }

    let current = config.team()?;
    println!();
    println!("Select a team:");
    for (i, org) in orgs.iter().enumerate() {
        let marker = if current.as_ref().is_some_and(|c| c.id == org.id) {
            output::primary("→")
        } else {
            " ".to_string()
        };
        let suffix = if org.is_personal { " — personal" } else { "" };
        println!(
            "  {marker} {}. {} ({}){}",
            i + 1,
            org.name,
            org.role,
            output::dim(suffix)
        );
    }
    println!();

    let answer = prompt_line(&format!("Team number [1-{}]: ", orgs.len()))?;
    let index: usize = answer
        .parse()
        .map_err(|_| anyhow::anyhow!("not a number: {answer}"))?;
    if index == 0 || index > orgs.len() {
        bail!("out of range: {index}");
    }
    Ok(orgs[index - 1].clone())
}

/// `sendly teams create --name <name> [--description <text>]`
pub async fn create(name: String, description: Option<String>, json: bool) -> Result<()> {
    let (config, _storage, client) = authenticated()?;

    let mut body = serde_json::json!({ "name": name });
    if let Some(description) = description {
        body["description"] = serde_json::Value::String(description);
    }

    let org: Organization = client.post("/api/organizations", &body).await?;

    if json {
        return output::print_json(&org);
    }

    output::success("Team created");
    output::key_value(&[
        ("Name", org.name.clone()),
        ("ID", output::dim(&org.id)),
        ("Slug", output::dim(&org.slug)),
    ]);

    use std::io::IsTerminal;
    if std::io::stdin().is_terminal() && confirm("Switch to this team now?")? {
        config.set_team(&org.pointer())?;
        println!();
        output::success(&format!("Switched to {}", output::primary(&org.name)));
    }
    Ok(())
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Member {
    id: String,
    user_id: String,
    role: String,
    joined_at: String,
    user_name: Option<String>,
    user_email: Option<String>,
}

/// `sendly teams members`: list members of the current team.
pub async fn members(json: bool) -> Result<()> {
    let (config, _storage, client) = authenticated()?;
    let Some(team) = config.team()? else {
        bail!("no active team; run `sendly teams switch` to select one");
    };

    let members: Vec<Member> = client
        .get(&format!("/api/organizations/{}/members", team.id))
        .await?;

    if json {
        return output::print_json(&members);
    }

    if members.is_empty() {
        output::info("No members found");
        return Ok(());
    }

    println!();
    let plural = if members.len() == 1 { "member" } else { "members" };
    output::info(&format!(
        "{} — {} {plural}",
        output::primary(&team.name),
        members.len()
    ));
    println!();

    let rows: Vec<Vec<String>> = members
        .iter()
        .map(|m| {
            vec![
                m.user_name.clone().unwrap_or_else(|| "—".to_string()),
                m.user_email.clone().unwrap_or_else(|| "—".to_string()),
                m.role.clone(),
                output::format_relative(&m.joined_at),
            ]
        })
        .collect();
    output::table(&["Name", "Email", "Role", "Joined"], &rows);
    Ok(())
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Invitation {
    id: String,
    email: String,
    role: String,
    status: String,
    expires_at: String,
    created_at: String,
}

/// `sendly teams invite <email> [--role <role>]`
pub async fn invite(email: String, role: String, json: bool) -> Result<()> {
    let (config, _storage, client) = authenticated()?;
    let Some(team) = config.team()? else {
        bail!("no active team; run `sendly teams switch` to select one");
    };

    let invitation: Invitation = client
        .post(
            &format!("/api/organizations/{}/invitations", team.id),
            &serde_json::json!({ "email": email, "role": role }),
        )
        .await?;

    if json {
        return output::print_json(&invitation);
    }

    output::success(&format!(
        "Invitation sent to {}",
        output::primary(&email)
    ));
    output::key_value(&[
        ("Team", team.name),
        ("Role", invitation.role),
        ("Expires", output::format_relative(&invitation.expires_at)),
    ]);
    Ok(())
}
