//! Diagnostic sections printed alongside the report.
//!
//! These go to stderr so stdout carries only the postable report.

use itemtally_core::{CountObservation, OwnerRow, Record};

const NOT_AVAILABLE: &str = "N/A";

// ── Thread mode ──

/// Every counted entry, in input order.
pub fn entries_found(observations: &[CountObservation], noun: &str) -> String {
    let mut lines = vec!["All entries found:".to_string()];
    for obs in observations {
        let suffix = if obs.count == 1 { "" } else { "s" };
        lines.push(format!("@{}: {} {noun}{suffix}", obs.entity, obs.count));
    }
    lines.join("\n")
}

/// Records that mention the noun but carry no usable count.
pub fn needs_attention(records: &[Record]) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let mut lines = vec!["Entries that might need attention:".to_string()];
    for record in records {
        lines.push(format!(
            "Possible missing count: @{}: {}",
            record.entity,
            record.fragment.trim()
        ));
    }
    Some(lines.join("\n"))
}

/// Mentions with nothing after them.
pub fn without_count(records: &[Record]) -> Option<String> {
    let names: Vec<String> = records
        .iter()
        .filter(|r| r.fragment.trim().is_empty())
        .map(|r| format!("@{}", r.entity))
        .collect();
    if names.is_empty() {
        return None;
    }
    Some(format!("Mentions without a count: {}", names.join(", ")))
}

// ── Owner mode ──

/// Rows with no owner, with whatever context the row carries.
pub fn missing_owners(rows: &[OwnerRow]) -> String {
    if rows.is_empty() {
        return "No rows with missing owners found.".to_string();
    }
    let mut lines = vec!["Found rows with missing owners:".to_string()];
    for row in rows {
        lines.push(format!("Row {}:", row.row));
        lines.push(format!("  {:<24} {}", "Business Service Name:", or_na(row.business_service.as_deref())));
        lines.push(format!("  {:<24} {}", "Proxy:", or_na(row.proxy.as_deref())));
        lines.push(format!("  {:<24} {}", "Proxy Repo:", or_na(row.proxy_repo.as_deref())));
    }
    lines.join("\n")
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}
