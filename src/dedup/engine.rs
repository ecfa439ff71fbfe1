//! Groups raw crawled records into canonical merged places.

use std::fmt;

use tracing::warn;

use super::matcher::is_same_place;
use crate::place::{CanonicalPlace, RawPlaceRecord, SourceAttribution};

/// Per-record failure during a dedup pass. The batch itself never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupError {
    /// The record had no usable name (missing or whitespace-only).
    MissingName { index: usize, source: String },
}

impl fmt::Display for DedupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName { index, source } => {
                write!(f, "record #{} from '{}' has no name", index, source)
            }
        }
    }
}

impl std::error::Error for DedupError {}

/// Result of one dedup pass: canonical places in group creation order,
/// plus the records that could not participate.
#[derive(Debug, Default)]
pub struct DedupOutcome {
    pub places: Vec<CanonicalPlace>,
    pub errors: Vec<DedupError>,
}

/// Fold records, in input order, into canonical groups.
///
/// Each record is compared against existing groups in creation order and
/// merged into the first match; otherwise it seeds a new group. The scan
/// is O(n²) in distinct groups, which is fine for crawl batches of tens
/// to low hundreds of records.
pub fn deduplicate(records: &[RawPlaceRecord]) -> DedupOutcome {
    let mut outcome = DedupOutcome::default();

    for (index, record) in records.iter().enumerate() {
        if record.name.trim().is_empty() {
            warn!(index, source = %record.source, "dropping crawled record without a name");
            outcome.errors.push(DedupError::MissingName {
                index,
                source: record.source.clone(),
            });
            continue;
        }

        match outcome
            .places
            .iter()
            .position(|group| is_same_place(group, record))
        {
            Some(i) => merge_into(&mut outcome.places[i], record),
            None => outcome.places.push(CanonicalPlace::from_record(record)),
        }
    }

    outcome
}

/// Merge a record into an existing group: add unseen provenance, then
/// gap-fill. Existing non-empty values are never overwritten; empty means
/// absent, blank, or numerically zero, matching what the scrapers emit
/// for "unknown".
fn merge_into(group: &mut CanonicalPlace, record: &RawPlaceRecord) {
    if !group.sources.iter().any(|s| s.source == record.source) {
        group.sources.push(SourceAttribution::from_record(record));
    }

    // Coordinates move as a pair so lat/lng never split across records.
    if !(present_num(group.lat) && present_num(group.lng))
        && present_num(record.lat)
        && present_num(record.lng)
    {
        group.lat = record.lat;
        group.lng = record.lng;
    }

    fill_str(&mut group.address, &record.address);
    fill_str(&mut group.category, &record.category);
    fill_str(&mut group.tags, &record.tags);

    if !present_num(group.rating) && present_num(record.rating) {
        group.rating = record.rating;
    }
}

fn present_str(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn present_num(value: Option<f64>) -> bool {
    value.is_some_and(|n| n != 0.0)
}

fn fill_str(slot: &mut Option<String>, incoming: &Option<String>) {
    if !present_str(slot) && present_str(incoming) {
        *slot = incoming.clone();
    }
}
