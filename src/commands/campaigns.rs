use anyhow::Result;
use serde::Deserialize;

use super::authenticated;
use crate::output;

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Campaign {
    id: String,
    name: String,
    message_text: String,
    status: String,
    total_recipients: u64,
    #[serde(default)]
    sent_count: u64,
    #[serde(default)]
    delivered_count: u64,
    #[serde(default)]
    failed_count: u64,
    #[serde(default)]
    estimated_credits: u64,
    #[serde(default)]
    credits_used: u64,
    #[serde(default)]
    scheduled_at: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    sent_at: Option<String>,
    #[serde(default)]
    completed_at: Option<String>,
    created_at: String,
    #[serde(default)]
    target_list_id: Option<String>,
}

fn format_status(status: &str) -> String {
    match status {
        "draft" => output::dim("Draft"),
        "scheduled" => output::yellow("Scheduled"),
        "sending" => output::primary("Sending"),
        "completed" => output::green("Completed"),
        "cancelled" => output::dim("Cancelled"),
        "failed" => output::red("Failed"),
        other => other.to_string(),
    }
}

/// `sendly campaigns get <id>`
pub async fn get(id: String, json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;
    let campaign: Campaign = client.get(&format!("/api/v1/campaigns/{id}")).await?;

    if json {
        return output::print_json(&campaign);
    }

    println!();
    println!("{}", output::bold(&format!("Campaign: {}", campaign.name)));
    println!();

    let mut pairs = vec![
        ("ID", campaign.id.clone()),
        ("Status", format_status(&campaign.status)),
        ("Recipients", campaign.total_recipients.to_string()),
    ];
    if campaign.status == "completed" || campaign.status == "sending" {
        pairs.push(("Sent", campaign.sent_count.to_string()));
        pairs.push((
            "Delivered",
            output::green(&campaign.delivered_count.to_string()),
        ));
        pairs.push((
            "Failed",
            if campaign.failed_count > 0 {
                output::red(&campaign.failed_count.to_string())
            } else {
                "0".to_string()
            },
        ));
    }
    pairs.push(("Estimated Credits", campaign.estimated_credits.to_string()));
    if campaign.credits_used > 0 {
        pairs.push(("Credits Used", campaign.credits_used.to_string()));
    }
    if let Some(scheduled) = &campaign.scheduled_at {
        pairs.push(("Scheduled For", output::format_relative(scheduled)));
    }
    if let Some(timezone) = &campaign.timezone {
        pairs.push(("Timezone", timezone.clone()));
    }
    pairs.push(("Created", output::format_relative(&campaign.created_at)));
    if let Some(sent) = &campaign.sent_at {
        pairs.push(("Started", output::format_relative(sent)));
    }
    if let Some(completed) = &campaign.completed_at {
        pairs.push(("Completed", output::format_relative(completed)));
    }
    output::key_value(&pairs);

    println!();
    println!("{}", output::dim("Message:"));
    println!("  {}", campaign.message_text);

    if let Some(list) = &campaign.target_list_id {
        println!();
        println!("{}", output::dim("Contact List:"));
        println!("  {list}");
    }
    Ok(())
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CountryBreakdown {
    country: String,
    count: u64,
    credits_per_message: u64,
    total_credits: u64,
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignPreview {
    id: String,
    recipient_count: u64,
    estimated_segments: u64,
    estimated_credits: u64,
    current_balance: u64,
    has_enough_credits: bool,
    #[serde(default)]
    breakdown: Vec<CountryBreakdown>,
    #[serde(default)]
    blocked_count: Option<u64>,
    #[serde(default)]
    sendable_count: Option<u64>,
    #[serde(default)]
    warnings: Vec<String>,
}

/// `sendly campaigns preview <id>`: cost and recipients before sending.
pub async fn preview(id: String, json: bool) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;
    let preview: CampaignPreview = client
        .get(&format!("/api/v1/campaigns/{id}/preview"))
        .await?;

    if json {
        return output::print_json(&preview);
    }

    println!();
    println!("{}", output::bold("Campaign Preview"));
    println!();

    let mut pairs = vec![
        ("Recipients", preview.recipient_count.to_string()),
        ("Segments", preview.estimated_segments.to_string()),
        ("Estimated Credits", preview.estimated_credits.to_string()),
        ("Current Balance", preview.current_balance.to_string()),
    ];
    if let Some(blocked) = preview.blocked_count
        && blocked > 0
    {
        pairs.push(("Blocked", output::red(&blocked.to_string())));
    }
    if let Some(sendable) = preview.sendable_count {
        pairs.push(("Sendable", sendable.to_string()));
    }
    output::key_value(&pairs);

    if !preview.breakdown.is_empty() {
        println!();
        let rows: Vec<Vec<String>> = preview
            .breakdown
            .iter()
            .map(|b| {
                vec![
                    b.country.clone(),
                    b.count.to_string(),
                    b.credits_per_message.to_string(),
                    b.total_credits.to_string(),
                ]
            })
            .collect();
        output::table(&["Country", "Recipients", "Credits/msg", "Total"], &rows);
    }

    for warning in &preview.warnings {
        output::warn(warning);
    }

    println!();
    if preview.has_enough_credits {
        output::success("Enough credits to send");
    } else {
        output::error_line("Not enough credits. Top up before sending");
    }
    Ok(())
}
