//! Loader for owner columns exported from a spreadsheet.
//!
//! Owner cells are either plain names or hyperlink formulas such as
//! `=HYPERLINK("https://directory/jdoe";"Jane Doe")`. Each non-empty cell is
//! one item owned by that person.
//!
//! A line is either a bare owner cell or tab-separated columns in export
//! order, with the owner last:
//!
//! ```text
//! proxy <TAB> proxy repo <TAB> business service <TAB> owner
//! ```
//!
//! Missing leading columns are left empty.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::{debug, info};

use crate::record::{CountObservation, OwnerRow};

static HYPERLINK: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r#"=HYPERLINK\(\s*"[^"]+"\s*[;,]\s*"([^"]+)"\s*\)"#)
        .case_insensitive(true)
        .build()
        .expect("hyperlink pattern is valid")
});

/// Observations from owner rows, plus the rows that had no owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerTally {
    pub observations: Vec<CountObservation>,
    pub missing: Vec<OwnerRow>,
}

/// Display name of an owner cell.
///
/// Returns the label of a hyperlink formula (either `;` or `,` as argument
/// separator), or the trimmed cell otherwise.
pub fn owner_from_cell(cell: &str) -> String {
    match HYPERLINK.captures(cell) {
        Some(caps) => caps[1].trim().to_string(),
        None => cell.trim().to_string(),
    }
}

const COLUMN_SEPARATOR: char = '\t';

impl OwnerRow {
    /// Build a row from one input line. Blank cells become `None`.
    pub fn from_line(row: usize, line: &str) -> Self {
        let mut cells: Vec<&str> = line.split(COLUMN_SEPARATOR).collect();
        let owner = cells.pop().map(owner_from_cell).and_then(non_empty);
        let mut context = cells.into_iter().map(|c| non_empty(c.trim().to_string()));
        Self {
            row,
            owner,
            proxy: context.next().flatten(),
            proxy_repo: context.next().flatten(),
            business_service: context.next().flatten(),
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// One row per line, numbered from 1.
pub fn owner_rows(text: &str) -> Vec<OwnerRow> {
    text.lines()
        .enumerate()
        .map(|(i, line)| OwnerRow::from_line(i + 1, line))
        .collect()
}

/// Count one item per row with an owner.
pub fn tally_owners(rows: &[OwnerRow]) -> OwnerTally {
    let mut tally = OwnerTally::default();
    for row in rows {
        match &row.owner {
            Some(owner) => tally.observations.push(CountObservation::new(owner.clone(), 1)),
            None => {
                info!(row = row.row, "row has no owner");
                tally.missing.push(row.clone());
            }
        }
    }
    debug!(
        rows = rows.len(),
        owned = tally.observations.len(),
        missing = tally.missing.len(),
        "tallied owners"
    );
    tally
}
