//! Terminal output helpers: colors, status lines, key-value blocks, and
//! simple column tables.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

pub fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

/// Brand accent (cyan).
pub fn primary(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}

pub fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}

pub fn success(message: &str) {
    println!("{} {}", green("✓"), message);
}

pub fn info(message: &str) {
    println!("{message}");
}

pub fn warn(message: &str) {
    eprintln!("{} {}", yellow("!"), message);
}

pub fn error_line(message: &str) {
    eprintln!("{} {}", red("✗"), message);
}

/// Pretty-print any serializable value as JSON (for `--json` mode).
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an aligned label/value block:
///
/// ```text
///   Email        ada@example.com
///   Environment  production
/// ```
pub fn key_value(pairs: &[(&str, String)]) {
    let max_width = pairs.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in pairs {
        println!("  {:<max_width$}  {}", label, value);
    }
}

/// Print a column-aligned table with dimmed headers. Cells are plain
/// text: column widths are computed from raw lengths, so callers color
/// whole lines, not cells.
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    println!("  {}", dim(&header_line));

    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {line}");
    }
}

/// Humanize an RFC 3339 timestamp relative to now: `just now`, `5m ago`,
/// `3h ago`, `2d ago`, then the plain date. Unparseable input is shown
/// as-is.
pub fn format_relative(timestamp: &str) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    let then = parsed.with_timezone(&Utc);
    let elapsed = Utc::now().signed_duration_since(then);

    if elapsed.num_seconds() < 0 {
        return then.format("%Y-%m-%d").to_string();
    }
    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }
    if elapsed.num_minutes() < 60 {
        return format!("{}m ago", elapsed.num_minutes());
    }
    if elapsed.num_hours() < 24 {
        return format!("{}h ago", elapsed.num_hours());
    }
    if elapsed.num_days() < 30 {
        return format!("{}d ago", elapsed.num_days());
    }
    then.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn relative_just_now() {
        let ts = Utc::now().to_rfc3339();
        assert_eq!(format_relative(&ts), "just now");
    }

    #[test]
    fn relative_minutes() {
        let ts = (Utc::now() - Duration::minutes(5)).to_rfc3339();
        assert_eq!(format_relative(&ts), "5m ago");
    }

    #[test]
    fn relative_hours() {
        let ts = (Utc::now() - Duration::hours(3)).to_rfc3339();
        assert_eq!(format_relative(&ts), "3h ago");
    }

    #[test]
    fn relative_days() {
        let ts = (Utc::now() - Duration::days(2)).to_rfc3339();
        assert_eq!(format_relative(&ts), "2d ago");
    }

    #[test]
    fn relative_old_dates_show_plain_date() {
        let ts = (Utc::now() - Duration::days(90)).to_rfc3339();
        let shown = format_relative(&ts);
        assert!(shown.contains('-'), "expected a date, got {shown}");
        assert!(!shown.ends_with("ago"));
    }

    #[test]
    fn relative_garbage_passes_through() {
        assert_eq!(format_relative("not-a-date"), "not-a-date");
    }

    #[test]
    fn color_helpers_wrap_input() {
        assert!(bold("x").contains('x'));
        assert!(dim("x").starts_with("\x1b["));
        assert!(primary("x").ends_with("\x1b[0m"));
    }
}
