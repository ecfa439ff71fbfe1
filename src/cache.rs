//! File-based place store at ~/.matjip/places.json, the persistence
//! collaborator behind the pipeline.
//!
//! `save` is an upsert-by-name: incoming fields replace, missing fields
//! keep what the store already has, and attributions upsert per
//! (place, source). `find` hands rows back shaped as raw records so a
//! later pass can re-feed them to the dedup engine.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::place::{Bounds, CanonicalPlace, PlaceType, RawPlaceRecord, SourceAttribution};

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct StoredSource {
    #[serde(default)]
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<String>,
    crawled_at: i64,
}

impl StoredSource {
    fn from_attribution(attribution: &SourceAttribution, now: i64) -> Self {
        Self {
            source: attribution.source.clone(),
            source_url: attribution.source_url.clone(),
            rating: attribution.rating,
            review_count: attribution.review_count,
            snippet: attribution.snippet.clone(),
            metadata: attribution.metadata.clone(),
            crawled_at: now,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct StoredPlace {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    place_type: Option<PlaceType>,
    updated_at: i64,
    #[serde(default)]
    sources: Vec<StoredSource>,
}

/// The place store. Keys are lowercased names.
pub struct PlaceCache {
    path: PathBuf,
    entries: HashMap<String, StoredPlace>,
}

impl PlaceCache {
    /// Load from the default location (~/.matjip/places.json).
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load from a specific path (tests, CLI override).
    pub fn load_from(path: PathBuf) -> Self {
        let entries = Self::read_file(&path).unwrap_or_default();
        Self { path, entries }
    }

    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".matjip")
            .join("places.json")
    }

    fn read_file(path: &PathBuf) -> Option<HashMap<String, StoredPlace>> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    /// Rows updated within `max_age_hours`, carrying coordinates, inside
    /// `bounds` when given, shaped as raw records for re-dedup. The
    /// first attribution supplies the per-source fields; rows that
    /// somehow lost all provenance read as source "cache". Sorted by
    /// name so batch output stays deterministic.
    pub fn find(&self, bounds: Option<&Bounds>, max_age_hours: i64) -> Vec<RawPlaceRecord> {
        let cutoff = chrono::Utc::now().timestamp_millis() - max_age_hours * 3_600_000;

        let mut rows = Vec::new();
        for place in self.entries.values() {
            let (Some(lat), Some(lng)) = (place.lat, place.lng) else {
                continue;
            };
            if place.updated_at < cutoff {
                continue;
            }
            if let Some(b) = bounds {
                if !b.contains(lat, lng) {
                    continue;
                }
            }

            let first = place.sources.first();
            rows.push(RawPlaceRecord {
                name: place.name.clone(),
                category: place.category.clone(),
                description: place.description.clone(),
                address: place.address.clone(),
                lat: Some(lat),
                lng: Some(lng),
                rating: first.and_then(|s| s.rating),
                review_count: first.and_then(|s| s.review_count),
                source: first
                    .map(|s| s.source.clone())
                    .unwrap_or_else(|| "cache".to_string()),
                source_url: first.and_then(|s| s.source_url.clone()),
                snippet: first.and_then(|s| s.snippet.clone()),
                tags: place.tags.clone(),
                metadata: first.and_then(|s| s.metadata.clone()),
            });
        }

        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    /// Upsert a batch of canonical places. A record that fails its own
    /// validation is logged and skipped; the rest of the batch goes
    /// through. Returns how many records were stored. The file is
    /// written once, after the batch.
    pub fn save(&mut self, places: &[CanonicalPlace]) -> usize {
        let now = chrono::Utc::now().timestamp_millis();
        let mut stored = 0;

        for place in places {
            if place.name.trim().is_empty() {
                error!("refusing to store a place without a name");
                continue;
            }
            if place.sources.is_empty() {
                error!(name = %place.name, "refusing to store a place without provenance");
                continue;
            }

            let key = place.name.to_lowercase();
            match self.entries.get_mut(&key) {
                Some(entry) => upsert(entry, place, now),
                None => {
                    self.entries.insert(
                        key,
                        StoredPlace {
                            name: place.name.clone(),
                            category: place.category.clone(),
                            description: place.description.clone(),
                            address: place.address.clone(),
                            lat: place.lat,
                            lng: place.lng,
                            rating: place.rating,
                            tags: place.tags.clone(),
                            place_type: place.place_type,
                            updated_at: now,
                            sources: place
                                .sources
                                .iter()
                                .map(|s| StoredSource::from_attribution(s, now))
                                .collect(),
                        },
                    );
                }
            }
            stored += 1;
        }

        self.persist();
        stored
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!(path = ?parent, error = %e, "cannot create place cache directory");
                return;
            }
        }
        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    error!(path = ?self.path, error = %e, "failed to persist place cache");
                }
            }
            Err(e) => error!(error = %e, "failed to serialize place cache"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merge an incoming canonical place over a stored row: present incoming
/// fields replace, absent ones keep the stored value. Attributions
/// upsert by source, refreshing `crawled_at`.
fn upsert(entry: &mut StoredPlace, place: &CanonicalPlace, now: i64) {
    replace_if_present(&mut entry.category, &place.category);
    replace_if_present(&mut entry.description, &place.description);
    replace_if_present(&mut entry.address, &place.address);
    replace_if_present(&mut entry.tags, &place.tags);
    if place.lat.is_some() {
        entry.lat = place.lat;
    }
    if place.lng.is_some() {
        entry.lng = place.lng;
    }
    if place.rating.is_some() {
        entry.rating = place.rating;
    }
    if place.place_type.is_some() {
        entry.place_type = place.place_type;
    }

    for attribution in &place.sources {
        match entry
            .sources
            .iter_mut()
            .find(|s| s.source == attribution.source)
        {
            Some(existing) => {
                existing.source_url = attribution.source_url.clone();
                existing.rating = attribution.rating;
                existing.review_count = attribution.review_count;
                existing.snippet = attribution.snippet.clone();
                existing.metadata = attribution.metadata.clone();
                existing.crawled_at = now;
            }
            None => entry
                .sources
                .push(StoredSource::from_attribution(attribution, now)),
        }
    }

    entry.updated_at = now;
}

fn replace_if_present(slot: &mut Option<String>, incoming: &Option<String>) {
    if incoming.is_some() {
        *slot = incoming.clone();
    }
}
