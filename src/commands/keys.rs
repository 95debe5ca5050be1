use anyhow::Result;
use serde::Deserialize;

use super::authenticated;
use crate::output;

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiKey {
    id: String,
    name: String,
    prefix: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    scopes: Vec<String>,
    is_active: bool,
    #[serde(default)]
    last_used_at: Option<String>,
    created_at: String,
    #[serde(default)]
    expires_at: Option<String>,
    #[serde(default)]
    revoked_at: Option<String>,
}

#[derive(Deserialize)]
struct KeysResponse {
    keys: Vec<ApiKey>,
}

/// `sendly keys list`
pub async fn list(json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;
    let response: KeysResponse = client.get("/api/v1/account/keys").await?;
    let keys = response.keys;

    if json {
        return output::print_json(&keys);
    }

    if keys.is_empty() {
        output::info("No API keys found");
        return Ok(());
    }

    println!();
    let rows: Vec<Vec<String>> = keys
        .iter()
        .map(|k| {
            vec![
                k.name.clone(),
                k.id.chars().take(16).collect(),
                k.prefix.clone(),
                k.kind.clone(),
                if k.is_active { "active" } else { "revoked" }.to_string(),
                k.last_used_at
                    .as_deref()
                    .map_or("never".to_string(), output::format_relative),
            ]
        })
        .collect();
    output::table(
        &["Name", "Key ID", "Prefix", "Type", "Status", "Last Used"],
        &rows,
    );
    Ok(())
}

/// `sendly keys get <id>`
pub async fn get(id: String, json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;
    let key: ApiKey = client.get(&format!("/api/v1/account/keys/{id}")).await?;

    if json {
        return output::print_json(&key);
    }

    let kind = if key.kind == "test" {
        output::yellow("test")
    } else {
        output::green("live")
    };
    let status = if key.is_active {
        output::green("active")
    } else {
        output::red("revoked")
    };

    output::success("API Key Details");
    println!();
    let mut pairs = vec![
        ("ID", key.id.clone()),
        ("Name", key.name.clone()),
        ("Prefix", key.prefix.clone()),
        ("Type", kind),
        ("Status", status),
        (
            "Scopes",
            if key.scopes.is_empty() {
                "all".to_string()
            } else {
                key.scopes.join(", ")
            },
        ),
        ("Created", output::format_relative(&key.created_at)),
        (
            "Last Used",
            key.last_used_at
                .as_deref()
                .map_or_else(|| output::dim("never"), output::format_relative),
        ),
    ];
    if let Some(expires) = &key.expires_at {
        pairs.push(("Expires", output::format_relative(expires)));
    }
    if let Some(revoked) = &key.revoked_at {
        pairs.push(("Revoked At", output::format_relative(revoked)));
    }
    output::key_value(&pairs);
    Ok(())
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageSummary {
    total_requests: u64,
    total_credits: u64,
    last_used: Option<String>,
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentRequest {
    endpoint: String,
    method: String,
    status_code: u16,
    #[serde(default)]
    credits_used: u64,
    created_at: String,
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct EndpointBreakdown {
    endpoint: String,
    count: u64,
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageResponse {
    key_id: String,
    key_name: String,
    summary: UsageSummary,
    #[serde(default)]
    recent_requests: Vec<RecentRequest>,
    #[serde(default)]
    endpoint_breakdown: Vec<EndpointBreakdown>,
}

/// `sendly keys usage <id>`
pub async fn usage(id: String, json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;
    let usage: UsageResponse = client
        .get(&format!("/api/v1/account/keys/{id}/usage"))
        .await?;

    if json {
        return output::print_json(&usage);
    }

    println!();
    println!("{}", output::bold(&format!("Usage for \"{}\"", usage.key_name)));
    println!();
    output::key_value(&[
        ("Total Requests", usage.summary.total_requests.to_string()),
        ("Total Credits", usage.summary.total_credits.to_string()),
        (
            "Last Used",
            usage
                .summary
                .last_used
                .as_deref()
                .map_or_else(|| output::dim("never"), output::format_relative),
        ),
    ]);

    if !usage.endpoint_breakdown.is_empty() {
        println!();
        println!("{}", output::bold("Endpoint Breakdown"));
        println!();
        let rows: Vec<Vec<String>> = usage
            .endpoint_breakdown
            .iter()
            .take(10)
            .map(|e| vec![e.endpoint.clone(), e.count.to_string()])
            .collect();
        output::table(&["Endpoint", "Requests"], &rows);
    }

    if !usage.recent_requests.is_empty() {
        println!();
        println!("{}", output::bold("Recent Requests"));
        println!();
        let rows: Vec<Vec<String>> = usage
            .recent_requests
            .iter()
            .take(10)
            .map(|r| {
                vec![
                    r.endpoint.clone(),
                    r.method.clone(),
                    r.status_code.to_string(),
                    r.credits_used.to_string(),
                    output::format_relative(&r.created_at),
                ]
            })
            .collect();
        output::table(&["Endpoint", "Method", "Status", "Credits", "Time"], &rows);
    }

    if usage.summary.total_requests == 0 {
        output::info("No usage recorded yet for this key");
    }
    Ok(())
}
