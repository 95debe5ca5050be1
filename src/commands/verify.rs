use anyhow::Result;
use serde::Deserialize;

use super::authenticated;
use crate::output;
use crate::spinner::Spinner;

#[derive(Deserialize, serde::Serialize)]
struct Verification {
    id: String,
    status: String,
    phone: String,
    #[serde(default)]
    delivery_status: String,
    attempts: u32,
    max_attempts: u32,
    expires_at: String,
    verified_at: Option<String>,
    created_at: String,
    #[serde(default)]
    sandbox: bool,
}

#[derive(Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    total: u64,
    page: u64,
    total_pages: u64,
    has_more: bool,
}

#[derive(Deserialize, serde::Serialize)]
struct ListResponse {
    verifications: Vec<Verification>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// `sendly verify list [--limit N] [--page N] [--status S]`
pub async fn list(
    limit: u32,
    page: Option<u32>,
    status: Option<String>,
    json: bool,
) -> Result<()> {
    let (_config, _storage, client) = authenticated()?;

    let mut query = vec![("limit", limit.to_string())];
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }
    if let Some(status) = &status {
        query.push(("status", status.clone()));
    }

    let spinner = if json {
        None
    } else {
        Some(Spinner::start("Fetching verifications..."))
    };
    let response: Result<ListResponse> = client.get_query("/api/v1/verify", &query).await;
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }
    let response = response?;

    if json {
        return output::print_json(&response);
    }

    if response.verifications.is_empty() {
        println!("{}", output::dim("No verifications found."));
        return Ok(());
    }

    if let Some(p) = &response.pagination {
        println!();
        println!(
            "{}",
            output::dim(&format!(
                "Showing {} verifications (page {} of {}, {} total)",
                response.verifications.len(),
                p.page,
                p.total_pages,
                p.total
            ))
        );
    }
    println!();

    let rows: Vec<Vec<String>> = response
        .verifications
        .iter()
        .map(|v| {
            vec![
                v.id.chars().take(16).collect(),
                v.phone.clone(),
                v.status.clone(),
                format!("{}/{}", v.attempts, v.max_attempts),
                if v.sandbox { "yes".to_string() } else { String::new() },
                output::format_relative(&v.created_at),
            ]
        })
        .collect();
    output::table(
        &["ID", "Phone", "Status", "Attempts", "Sandbox", "Created"],
        &rows,
    );

    if let Some(p) = &response.pagination
        && p.has_more
    {
        println!();
        println!(
            "{}",
            output::dim(&format!("  Use --page {} to see more", p.page + 1))
        );
    }
    Ok(())
}
