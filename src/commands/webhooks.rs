use anyhow::Result;
use serde::Deserialize;

use super::{authenticated, confirm};
use crate::output;
use crate::spinner::Spinner;

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Webhook {
    id: String,
    url: String,
    #[serde(default)]
    events: Vec<String>,
    #[serde(default)]
    is_active: bool,
    created_at: String,
    #[serde(default)]
    last_delivery_at: Option<String>,
}

/// `sendly webhooks get <id>`
pub async fn get(id: String, json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;
    let webhook: Webhook = client.get(&format!("/api/v1/webhooks/{id}")).await?;

    if json {
        return output::print_json(&webhook);
    }

    println!();
    output::key_value(&[
        ("ID", webhook.id.clone()),
        ("URL", webhook.url.clone()),
        (
            "Events",
            if webhook.events.is_empty() {
                "all".to_string()
            } else {
                webhook.events.join(", ")
            },
        ),
        (
            "Status",
            if webhook.is_active {
                output::green("active")
            } else {
                output::dim("disabled")
            },
        ),
        ("Created", output::format_relative(&webhook.created_at)),
        (
            "Last Delivery",
            webhook
                .last_delivery_at
                .as_deref()
                .map_or_else(|| output::dim("never"), output::format_relative),
        ),
    ]);
    Ok(())
}

/// `sendly webhooks delete <id> [--yes]`
pub async fn delete(id: String, yes: bool, json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;

    if !yes {
        let webhook: Webhook = client.get(&format!("/api/v1/webhooks/{id}")).await?;
        println!("About to delete webhook {}", output::bold(&webhook.url));
        if !confirm("Delete it?")? {
            output::info("Cancelled");
            return Ok(());
        }
    }

    client.delete(&format!("/api/v1/webhooks/{id}")).await?;

    if json {
        return output::print_json(&serde_json::json!({ "deleted": true, "id": id }));
    }
    output::success("Webhook deleted");
    Ok(())
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct TestResult {
    delivery_id: String,
    webhook_url: String,
    event_type: String,
    status: String,
    response_time: u64,
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    response_body: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    delivered_at: Option<String>,
}

/// `sendly webhooks test <id>`: send a test event and report delivery.
pub async fn test(id: String, json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;

    let spinner = Spinner::start("Sending test event...");
    let result: Result<TestResult> = client
        .post(&format!("/api/v1/webhooks/{id}/test"), &serde_json::json!({}))
        .await;
    let result = match result {
        Ok(result) => {
            spinner.stop().await;
            result
        }
        Err(e) => {
            spinner.stop().await;
            return Err(e);
        }
    };

    if json {
        return output::print_json(&result);
    }

    let mut pairs = vec![
        ("Delivery ID", result.delivery_id.clone()),
        ("Webhook URL", result.webhook_url.clone()),
        ("Event Type", result.event_type.clone()),
        ("Response Time", format!("{}ms", result.response_time)),
    ];

    if result.status == "delivered" {
        if let Some(code) = result.status_code {
            pairs.push(("Status Code", code.to_string()));
        }
        output::success("Test event delivered");
        output::key_value(&pairs);
        if let Some(body) = &result.response_body {
            println!();
            println!("{}", output::dim("Response Body:"));
            let truncated: String = body.chars().take(200).collect();
            let ellipsis = if body.chars().count() > 200 { "..." } else { "" };
            println!("{truncated}{ellipsis}");
        }
    } else {
        if let Some(error) = &result.error {
            pairs.push(("Error", output::red(error)));
        }
        output::error_line("Test event failed");
        output::key_value(&pairs);
    }
    Ok(())
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Delivery {
    id: String,
    event_type: String,
    status: String,
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    response_time: Option<u64>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    next_retry_at: Option<String>,
    created_at: String,
    #[serde(default)]
    delivered_at: Option<String>,
}

/// `sendly webhooks deliveries <id> [--limit N] [--failed-only]`
pub async fn deliveries(id: String, limit: u32, failed_only: bool, json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;

    let mut query = vec![("limit", limit.to_string())];
    if failed_only {
        query.push(("status", "failed".to_string()));
    }

    let deliveries: Vec<Delivery> = client
        .get_query(&format!("/api/v1/webhooks/{id}/deliveries"), &query)
        .await?;

    if json {
        return output::print_json(&deliveries);
    }

    if deliveries.is_empty() {
        output::info("No deliveries found");
        return Ok(());
    }

    println!();
    let rows: Vec<Vec<String>> = deliveries
        .iter()
        .map(|d| {
            vec![
                d.event_type.clone(),
                d.status.clone(),
                d.status_code.map_or("—".to_string(), |c| c.to_string()),
                d.response_time.map_or("—".to_string(), |t| format!("{t}ms")),
                output::format_relative(&d.created_at),
            ]
        })
        .collect();
    output::table(&["Event", "Status", "Code", "Time", "Created"], &rows);

    for delivery in &deliveries {
        if let Some(error) = &delivery.error_message {
            println!();
            output::warn(&format!("{}: {error}", delivery.id));
        }
    }
    Ok(())
}
