//! Text rendering of an [`AggregateReport`] for chat posting and console checks.
//!
//! The chat layout uses Slack-style `*bold*` markers and `•` bullets:
//!
//! ```text
//! *Item Ownership Distribution*
//! Total Items: *6*
//!
//! *5 items:*
//! • @A
//!
//! *1 item:*
//! • @B
//!
//! *Summary Statistics:*
//! • Total unique owners: 2
//! • Average items per owner: 3.0
//!
//! *Distribution:*
//! • 5 items: 1 person
//! • 1 item: 1 person
//! ```

use crate::aggregate::AggregateReport;
use crate::extract::DEFAULT_NOUN;
use crate::record::OwnerRow;

const BULLET: &str = "•";
const NOT_AVAILABLE: &str = "n/a";

/// Wording used when rendering a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub title: String,
    /// Singular counted noun; the plural appends `s`.
    pub noun: String,
    /// Singular word for an entity in the statistics lines.
    pub entity_label: String,
    /// Prefix placed before every entity name.
    pub mention_prefix: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            title: "Item Ownership Distribution".to_string(),
            noun: DEFAULT_NOUN.to_string(),
            entity_label: "owner".to_string(),
            mention_prefix: "@".to_string(),
        }
    }
}

impl FormatOptions {
    fn count_label(&self, count: u64) -> String {
        format!("{count} {}", plural(&self.noun, count == 1))
    }

    fn mention(&self, entity: &str) -> String {
        format!("{}{entity}", self.mention_prefix)
    }
}

/// Render the chat report: groups by count, summary statistics, distribution.
pub fn format_report(report: &AggregateReport, opts: &FormatOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("*{}*", opts.title));
    lines.push(format!(
        "Total {}: *{}*",
        capitalize(&plural(&opts.noun, false)),
        report.total()
    ));
    lines.push(String::new());

    for group in report.groups() {
        let label = opts.count_label(group.count);
        if group.entities.len() == 1 {
            lines.push(format!("*{label}:*"));
        } else {
            lines.push(format!("*{label}: {}*", people(group.entities.len())));
        }
        for entity in &group.entities {
            lines.push(format!("{BULLET} {}", opts.mention(entity)));
        }
        lines.push(String::new());
    }

    lines.push("*Summary Statistics:*".to_string());
    lines.push(format!(
        "{BULLET} Total unique {}: {}",
        plural(&opts.entity_label, false),
        report.unique_entities()
    ));
    lines.push(format!(
        "{BULLET} Average {} per {}: {}",
        plural(&opts.noun, false),
        opts.entity_label,
        average_text(report)
    ));

    lines.push(String::new());
    lines.push("*Distribution:*".to_string());
    for (count, holders) in report.distribution().into_iter().rev() {
        lines.push(format!(
            "{BULLET} {}: {}",
            opts.count_label(count),
            people(holders)
        ));
    }

    lines.join("\n")
}

/// Wrap rendered text in a fenced code block for pasting as a snippet.
pub fn snippet(text: &str) -> String {
    format!("```\n{text}\n```")
}

/// Render the detailed console check: per-entity lines with a running
/// total, headline statistics, and the distribution with subtotals.
pub fn format_verification(report: &AggregateReport, opts: &FormatOptions) -> String {
    let nouns = plural(&opts.noun, false);
    let entities = plural(&opts.entity_label, false);
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("{} counts (with verification):", capitalize(&opts.entity_label)));
    let mut running_total = 0u64;
    for (entity, &count) in report.totals() {
        running_total = running_total.saturating_add(count);
        lines.push(format!("{}: {}", opts.mention(entity), opts.count_label(count)));
    }
    lines.push(String::new());
    lines.push(format!("Running total of all {nouns}: {running_total}"));

    lines.push(String::new());
    lines.push("Summary:".to_string());
    lines.push(format!("Total {nouns}: {}", report.total()));
    lines.push(format!("Unique {entities}: {}", report.unique_entities()));
    lines.push(format!(
        "Average {nouns} per {}: {}",
        opts.entity_label,
        average_text(report)
    ));
    match report.max_holders() {
        Some((max, holders)) => {
            let holders: Vec<String> = holders.iter().map(|h| opts.mention(h)).collect();
            lines.push(format!("Most {nouns}: {max} (owned by: {})", holders.join(", ")));
        }
        None => lines.push(format!("Most {nouns}: {NOT_AVAILABLE}")),
    }

    lines.push(String::new());
    lines.push(format!("Distribution of {nouns}:"));
    let mut distribution_total = 0u64;
    for (count, holders) in report.distribution().into_iter().rev() {
        let subtotal = count.saturating_mul(holders as u64);
        distribution_total = distribution_total.saturating_add(subtotal);
        lines.push(format!(
            "{}: {} (subtotal: {subtotal})",
            opts.count_label(count),
            people(holders)
        ));
    }
    lines.push(format!("Distribution total: {distribution_total}"));

    lines.join("\n")
}

/// Render the per-row check for an owner export: row counts, then every
/// owned row as `Row N: owner`.
pub fn format_row_listing(rows: &[OwnerRow], opts: &FormatOptions) -> String {
    let owned: Vec<(usize, &str)> = rows
        .iter()
        .filter_map(|r| r.owner.as_deref().map(|owner| (r.row, owner)))
        .collect();

    let entities = plural(&opts.entity_label, false);
    let mut lines = vec![
        format!("Total rows: {}", rows.len()),
        format!("Rows with {entities}: {}", owned.len()),
        String::new(),
        format!("All rows with {entities} (row number: {}):", opts.entity_label),
    ];
    for (row, owner) in owned {
        lines.push(format!("Row {row}: {owner}"));
    }
    lines.join("\n")
}

fn average_text(report: &AggregateReport) -> String {
    match report.average() {
        Some(avg) => format!("{avg:.1}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn plural(noun: &str, singular: bool) -> String {
    if singular {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

fn people(n: usize) -> String {
    if n == 1 {
        "1 person".to_string()
    } else {
        format!("{n} people")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
