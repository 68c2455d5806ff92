//! Count extraction from free-text fragments.
//!
//! A count is an integer immediately followed by whitespace and the counted
//! noun, singular or plural: `3 items`, `: 8 items`, `:2 items`, ` 1 item`.
//! The integer must sit at the start of the fragment or after whitespace or
//! punctuation, so text before the separator (`Lazarev: 2 items`) is ignored
//! and digits glued to a word (`v2 items`) are not counts. `.` and `,` do not
//! qualify as a separator, so the tail of `1,000 items` or `2.5 items` is
//! never read as a count; such fragments are flagged for review instead.
//! Only ASCII digits form a count.
//!
//! Matching is case-insensitive. Only the first count in a fragment is used.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::{debug, info};

use crate::TallyError;
use crate::record::{CountObservation, Record};

pub const DEFAULT_NOUN: &str = "item";

static DEFAULT_PATTERN: LazyLock<CountPattern> =
    LazyLock::new(|| CountPattern::new(DEFAULT_NOUN).expect("default noun is valid"));

/// Compiled count pattern for one noun.
#[derive(Debug, Clone)]
pub struct CountPattern {
    noun: String,
    count: Regex,
    mention: Regex,
}

/// Outcome of extracting a count from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Counted(CountObservation),
    /// The fragment mentions the noun but carries no usable count.
    NeedsAttention,
    /// Neither a count nor a mention of the noun.
    NoMention,
}

/// Observations from a batch of records, plus the records flagged for review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionBatch {
    pub observations: Vec<CountObservation>,
    pub needs_attention: Vec<Record>,
    /// Records that neither counted nor mentioned the noun.
    pub skipped: Vec<Record>,
}

impl CountPattern {
    /// Build the pattern for `noun`; the plural is `noun` + `s`.
    pub fn new(noun: &str) -> Result<Self, TallyError> {
        let noun = noun.trim();
        if noun.is_empty() {
            return Err(TallyError::EmptyNoun);
        }
        if !noun.chars().all(char::is_alphabetic) {
            return Err(TallyError::InvalidNoun(noun.to_string()));
        }

        let escaped = regex::escape(noun);
        let count = RegexBuilder::new(&format!(r"(?:^|[\s\p{{P}}--[.,]])([0-9]+)\s+{escaped}s?\b"))
            .case_insensitive(true)
            .build()?;
        let mention = RegexBuilder::new(&escaped).case_insensitive(true).build()?;

        Ok(Self {
            noun: noun.to_string(),
            count,
            mention,
        })
    }

    pub fn noun(&self) -> &str {
        &self.noun
    }

    /// Classify a record as counted, flagged, or unrelated.
    pub fn classify(&self, record: &Record) -> Extraction {
        if let Some(caps) = self.count.captures(&record.fragment) {
            // Overflow past u64 is unusable, not fatal.
            return match caps[1].parse::<u64>() {
                Ok(count) => Extraction::Counted(CountObservation::new(record.entity.clone(), count)),
                Err(_) => Extraction::NeedsAttention,
            };
        }
        if self.mention.is_match(&record.fragment) {
            Extraction::NeedsAttention
        } else {
            Extraction::NoMention
        }
    }

    /// Extract the count from one record, if it has one.
    pub fn extract(&self, record: &Record) -> Option<CountObservation> {
        match self.classify(record) {
            Extraction::Counted(obs) => Some(obs),
            _ => None,
        }
    }

    /// Extract every record, keeping flagged and skipped records in input order.
    pub fn extract_all<'a, I>(&self, records: I) -> ExtractionBatch
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut batch = ExtractionBatch::default();
        for record in records {
            match self.classify(record) {
                Extraction::Counted(obs) => batch.observations.push(obs),
                Extraction::NeedsAttention => {
                    info!(entity = %record.entity, fragment = %record.fragment.trim(), "possible missing count");
                    batch.needs_attention.push(record.clone());
                }
                Extraction::NoMention => batch.skipped.push(record.clone()),
            }
        }
        debug!(
            observations = batch.observations.len(),
            needs_attention = batch.needs_attention.len(),
            skipped = batch.skipped.len(),
            noun = %self.noun,
            "extraction complete"
        );
        batch
    }
}

impl Default for CountPattern {
    fn default() -> Self {
        DEFAULT_PATTERN.clone()
    }
}

/// Extract a count using the default `item`/`items` pattern.
pub fn extract(record: &Record) -> Option<CountObservation> {
    DEFAULT_PATTERN.extract(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_of(fragment: &str) -> Option<u64> {
        extract(&Record::new("X", fragment)).map(|o| o.count)
    }

    #[test]
    fn separator_styles() {
        assert_eq!(count_of("3 items"), Some(3));
        assert_eq!(count_of(" 3 items"), Some(3));
        assert_eq!(count_of(": 8 items"), Some(8));
        assert_eq!(count_of(":2 items"), Some(2));
        assert_eq!(count_of(": 1 item"), Some(1));
    }

    #[test]
    fn text_before_number_is_ignored() {
        assert_eq!(count_of("Lazarev: 2 items"), Some(2));
        assert_eq!(count_of(" Shashi Sahu: 1 item"), Some(1));
    }

    #[test]
    fn multi_digit_counts() {
        assert_eq!(count_of(" 14 items"), Some(14));
    }

    #[test]
    fn explicit_zero_is_a_count() {
        assert_eq!(count_of(": 0 items"), Some(0));
    }

    #[test]
    fn first_count_wins() {
        assert_eq!(count_of("2 items, later 5 items"), Some(2));
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(count_of(": 4 Items"), Some(4));
    }

    #[test]
    fn digits_glued_to_word_are_not_counts() {
        let pattern = CountPattern::default();
        assert_eq!(
            pattern.classify(&Record::new("X", "v2 items")),
            Extraction::NeedsAttention
        );
    }

    #[test]
    fn noun_must_be_a_whole_word() {
        let pattern = CountPattern::default();
        // "itemised" still mentions the noun, so it is flagged rather than counted.
        assert_eq!(
            pattern.classify(&Record::new("X", "3 itemised")),
            Extraction::NeedsAttention
        );
    }

    #[test]
    fn mention_without_number_needs_attention() {
        let pattern = CountPattern::default();
        assert_eq!(
            pattern.classify(&Record::new("X", "has item but no number")),
            Extraction::NeedsAttention
        );
        assert_eq!(count_of("has item but no number"), None);
    }

    #[test]
    fn unrelated_fragment_is_no_mention() {
        let pattern = CountPattern::default();
        assert_eq!(pattern.classify(&Record::new("X", "")), Extraction::NoMention);
        assert_eq!(
            pattern.classify(&Record::new("X", "thanks all")),
            Extraction::NoMention
        );
    }

    #[test]
    fn overflowing_count_needs_attention() {
        let pattern = CountPattern::default();
        assert_eq!(
            pattern.classify(&Record::new("X", ": 99999999999999999999999 items")),
            Extraction::NeedsAttention
        );
    }

    #[test]
    fn grouped_or_decimal_numbers_need_attention() {
        let pattern = CountPattern::default();
        for fragment in [": 1,000 items", ": 2.5 items", "about 0.5 item"] {
            assert_eq!(
                pattern.classify(&Record::new("X", fragment)),
                Extraction::NeedsAttention,
                "{fragment:?}"
            );
        }
    }

    #[test]
    fn non_ascii_digits_are_not_counts() {
        let pattern = CountPattern::default();
        assert_eq!(count_of(": \u{663} items"), None);
        assert_eq!(
            pattern.classify(&Record::new("X", ": \u{663} items")),
            Extraction::NeedsAttention
        );
    }

    #[test]
    fn other_punctuation_still_separates() {
        assert_eq!(count_of("(3 items)"), Some(3));
        assert_eq!(count_of("-2 items"), Some(2));
    }

    #[test]
    fn observation_keeps_entity() {
        let obs = extract(&Record::new("Alvin Ho", ": 8 items")).unwrap();
        assert_eq!(obs, CountObservation::new("Alvin Ho", 8));
    }

    #[test]
    fn custom_noun() {
        let pattern = CountPattern::new("proxy").unwrap();
        assert_eq!(pattern.noun(), "proxy");
        assert_eq!(
            pattern.extract(&Record::new("X", ": 3 proxys")).map(|o| o.count),
            Some(3)
        );
        assert_eq!(pattern.extract(&Record::new("X", ": 3 items")), None);
    }

    #[test]
    fn invalid_nouns_rejected() {
        assert!(matches!(CountPattern::new("  "), Err(TallyError::EmptyNoun)));
        assert!(matches!(
            CountPattern::new("it3m"),
            Err(TallyError::InvalidNoun(_))
        ));
    }

    #[test]
    fn extract_all_partitions_records() {
        let records = vec![
            Record::new("A", "3 items"),
            Record::new("B", "has item but no number"),
            Record::new("C", ""),
            Record::new("A", ": 2 items"),
        ];
        let batch = CountPattern::default().extract_all(&records);
        assert_eq!(
            batch.observations,
            vec![CountObservation::new("A", 3), CountObservation::new("A", 2)]
        );
        assert_eq!(batch.needs_attention, vec![records[1].clone()]);
        assert_eq!(batch.skipped, vec![records[2].clone()]);
    }
}
