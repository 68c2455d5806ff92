//! Count extraction, per-entity aggregation, and report formatting.

mod error;
pub use error::TallyError;

pub mod aggregate;
pub mod extract;
pub mod format;
pub mod owners;
pub mod record;
pub mod thread;

pub use aggregate::{AggregateReport, CountGroup, ReportSummary, aggregate};
pub use extract::{CountPattern, Extraction, ExtractionBatch, extract};
pub use format::{
    FormatOptions, format_report, format_row_listing, format_verification, snippet,
};
pub use owners::{OwnerTally, owner_from_cell, owner_rows, tally_owners};
pub use record::{CountObservation, OwnerRow, Record};
pub use thread::parse_thread;
