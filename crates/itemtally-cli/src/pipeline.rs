//! Tally pipelines: read input → records → observations → report.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use itemtally_core::{
    AggregateReport, CountObservation, CountPattern, OwnerRow, Record, aggregate, owner_rows,
    parse_thread, tally_owners,
};
use tracing::info;

/// Everything one run produced, for rendering.
#[derive(Debug, Default)]
pub struct TallyRun {
    pub report: AggregateReport,
    /// Observations in input order.
    pub observations: Vec<CountObservation>,
    pub needs_attention: Vec<Record>,
    /// Mentions that carried no count and no mention of the noun.
    pub skipped: Vec<Record>,
    pub missing_owners: Vec<OwnerRow>,
    /// Every parsed row, owner mode only.
    pub owner_rows: Option<Vec<OwnerRow>>,
    pub input_rows: usize,
}

/// Read the whole input from `path`, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// Tally a pasted thread of `@Name` lines followed by `N items` lines.
pub fn run_thread(text: &str, pattern: &CountPattern) -> TallyRun {
    let records = parse_thread(text);
    let batch = pattern.extract_all(&records);
    let report = aggregate(&batch.observations);
    info!(
        records = records.len(),
        entities = report.unique_entities(),
        total = report.total(),
        needs_attention = batch.needs_attention.len(),
        "thread tallied"
    );
    TallyRun {
        report,
        observations: batch.observations,
        needs_attention: batch.needs_attention,
        skipped: batch.skipped,
        missing_owners: Vec::new(),
        owner_rows: None,
        input_rows: records.len(),
    }
}

/// Tally an owner column, one cell per line.
pub fn run_owners(text: &str) -> TallyRun {
    let rows = owner_rows(text);
    let tally = tally_owners(&rows);
    let report = aggregate(&tally.observations);
    info!(
        rows = rows.len(),
        entities = report.unique_entities(),
        total = report.total(),
        missing = tally.missing.len(),
        "owners tallied"
    );
    TallyRun {
        report,
        observations: tally.observations,
        needs_attention: Vec::new(),
        skipped: Vec::new(),
        missing_owners: tally.missing,
        input_rows: rows.len(),
        owner_rows: Some(rows),
    }
}
