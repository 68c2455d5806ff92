//! Loader for a pasted chat thread.
//!
//! The thread alternates mention lines and count lines:
//!
//! ```text
//! @Alvin Ho
//! : 8 items
//! @Greg Keech
//!  Lazarev: 2 items
//! ```
//!
//! Mention lines start a new entity. Everything else is attributed to the most
//! recent mention. A count written on the mention line itself
//! (`@Alvin Ho: 8 items`) is split off at the first `:`.

use tracing::debug;

use crate::record::Record;

const MENTION: char = '@';
const SEPARATOR: char = ':';

/// Split a pasted thread into records.
///
/// - Each non-blank line after a mention becomes one record for that entity.
/// - A mention followed by no text yields a single record with an empty
///   fragment, so the entity is visible downstream as having no count.
/// - Text before the first mention belongs to the entity `""`.
pub fn parse_thread(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut current: Option<String> = None;
    let mut current_has_fragment = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(mention) = trimmed.strip_prefix(MENTION) {
            flush_bare_mention(&mut records, current.take(), current_has_fragment);
            let (name, inline) = split_mention(mention);
            current_has_fragment = inline.is_some();
            if let Some(fragment) = inline {
                records.push(Record::new(name.clone(), fragment));
            }
            current = Some(name);
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        let entity = current.clone().unwrap_or_default();
        records.push(Record::new(entity, line));
        current_has_fragment = true;
    }
    flush_bare_mention(&mut records, current, current_has_fragment);

    debug!(records = records.len(), "parsed thread");
    records
}

/// Split `Name: 8 items` into the name and an inline fragment (`: 8 items`).
/// A trailing colon with nothing after it yields no fragment.
fn split_mention(mention: &str) -> (String, Option<String>) {
    match mention.split_once(SEPARATOR) {
        Some((name, rest)) if !rest.trim().is_empty() => {
            (name.trim().to_string(), Some(format!("{SEPARATOR}{rest}")))
        }
        Some((name, _)) => (name.trim().to_string(), None),
        None => (mention.trim().to_string(), None),
    }
}

fn flush_bare_mention(records: &mut Vec<Record>, entity: Option<String>, had_fragment: bool) {
    if let Some(entity) = entity
        && !had_fragment
    {
        records.push(Record::new(entity, ""));
    }
}
