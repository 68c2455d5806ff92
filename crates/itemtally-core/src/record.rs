//! Input and observation types shared by the loaders and the aggregator.

use serde::{Deserialize, Serialize};

/// One raw text fragment attributed to an entity.
///
/// Produced by a loader (pasted thread, owner column) and consumed by
/// [`extract`](crate::extract::extract).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub entity: String,
    pub fragment: String,
}

impl Record {
    pub fn new(entity: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            fragment: fragment.into(),
        }
    }
}

/// A single extracted `(entity, count)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountObservation {
    pub entity: String,
    pub count: u64,
}

impl CountObservation {
    pub fn new(entity: impl Into<String>, count: u64) -> Self {
        Self {
            entity: entity.into(),
            count,
        }
    }
}

/// One row of an owner export.
///
/// Only `owner` takes part in counting. The context columns are carried so
/// rows with a missing owner can be reported with enough detail to fix them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRow {
    /// 1-based row number in the source.
    pub row: usize,
    pub owner: Option<String>,
    pub business_service: Option<String>,
    pub proxy: Option<String>,
    pub proxy_repo: Option<String>,
}
