//! Per-entity aggregation and derived statistics.
//!
//! Totals are keyed by entity name in a `BTreeMap<String, _>`, so name order is
//! byte-wise (ordinal, case-sensitive): `"Zoe" < "adam"`. Every ranking below
//! sorts by total descending and then by that name order.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::record::CountObservation;

/// Per-entity totals built from one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    totals: BTreeMap<String, u64>,
}

/// Entities sharing one total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountGroup<'a> {
    pub count: u64,
    /// Names in ascending order.
    pub entities: Vec<&'a str>,
}

/// Serialisable snapshot of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary<'a> {
    pub totals: Vec<EntityTotal<'a>>,
    pub total: u64,
    pub unique_entities: usize,
    pub average: Option<f64>,
    pub max_count: Option<u64>,
    pub max_holders: Vec<&'a str>,
    /// `(count, entities with that count)`, largest count first.
    pub distribution: Vec<(u64, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityTotal<'a> {
    pub entity: &'a str,
    pub count: u64,
}

/// Sum observations per entity. Repeated names accumulate.
pub fn aggregate<'a, I>(observations: I) -> AggregateReport
where
    I: IntoIterator<Item = &'a CountObservation>,
{
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    let mut seen = 0usize;
    for obs in observations {
        let slot = totals.entry(obs.entity.clone()).or_insert(0);
        *slot = slot.saturating_add(obs.count);
        seen += 1;
    }
    debug!(observations = seen, entities = totals.len(), "aggregated");
    AggregateReport { totals }
}

impl AggregateReport {
    /// Totals keyed by entity, in name order.
    pub fn totals(&self) -> &BTreeMap<String, u64> {
        &self.totals
    }

    pub fn get(&self, entity: &str) -> Option<u64> {
        self.totals.get(entity).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn unique_entities(&self) -> usize {
        self.totals.len()
    }

    pub fn total(&self) -> u64 {
        self.totals.values().fold(0u64, |acc, &n| acc.saturating_add(n))
    }

    /// Mean total per entity, `None` when there are no entities.
    pub fn average(&self) -> Option<f64> {
        if self.totals.is_empty() {
            return None;
        }
        Some(self.total() as f64 / self.totals.len() as f64)
    }

    /// `(entity, total)` sorted by total descending, then name ascending.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .totals
            .iter()
            .map(|(name, &count)| (name.as_str(), count))
            .collect();
        // Stable sort over name-ordered input keeps names ascending within a count.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Entities grouped by identical total, largest total first.
    pub fn groups(&self) -> Vec<CountGroup<'_>> {
        let mut by_count: BTreeMap<u64, Vec<&str>> = BTreeMap::new();
        for (name, &count) in &self.totals {
            by_count.entry(count).or_default().push(name.as_str());
        }
        by_count
            .into_iter()
            .rev()
            .map(|(count, entities)| CountGroup { count, entities })
            .collect()
    }

    /// The largest total and every entity holding it.
    pub fn max_holders(&self) -> Option<(u64, Vec<&str>)> {
        let max = self.totals.values().copied().max()?;
        let holders = self
            .totals
            .iter()
            .filter(|&(_, &count)| count == max)
            .map(|(name, _)| name.as_str())
            .collect();
        Some((max, holders))
    }

    /// How many entities hold each total, keyed by total.
    pub fn distribution(&self) -> BTreeMap<u64, usize> {
        let mut dist = BTreeMap::new();
        for &count in self.totals.values() {
            *dist.entry(count).or_insert(0) += 1;
        }
        dist
    }

    pub fn summary(&self) -> ReportSummary<'_> {
        let (max_count, max_holders) = match self.max_holders() {
            Some((max, holders)) => (Some(max), holders),
            None => (None, Vec::new()),
        };
        ReportSummary {
            totals: self
                .ranked()
                .into_iter()
                .map(|(entity, count)| EntityTotal { entity, count })
                .collect(),
            total: self.total(),
            unique_entities: self.unique_entities(),
            average: self.average(),
            max_count,
            max_holders,
            distribution: self.distribution().into_iter().rev().collect(),
        }
    }
}
