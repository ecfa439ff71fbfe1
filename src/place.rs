//! Core data model for the place aggregation pipeline.
//!
//! A `RawPlaceRecord` is one observation of a venue from one source
//! (a scraper hit or a cached row). The dedup engine folds raw records
//! into `CanonicalPlace`s, each carrying per-source provenance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One observation of a place from a single source. Immutable once
/// produced by the scraper/cache layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlaceRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    /// Identifier of the originating source ("diningcode", "naver-place", …).
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Comma-separated tags, e.g. "청국장, 주물럭".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Opaque source payload, e.g. serialized score JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

/// Provenance tying a canonical place back to one originating source.
/// A canonical place holds at most one attribution per `source` value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAttribution {
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl SourceAttribution {
    pub fn from_record(record: &RawPlaceRecord) -> Self {
        Self {
            source: record.source.clone(),
            source_url: record.source_url.clone(),
            rating: record.rating,
            review_count: record.review_count,
            snippet: record.snippet.clone(),
            metadata: record.metadata.clone(),
        }
    }
}

/// Broad venue class, filled best-effort by the classification collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Restaurant,
    Cafe,
    Bar,
    Bakery,
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restaurant => write!(f, "restaurant"),
            Self::Cafe => write!(f, "cafe"),
            Self::Bar => write!(f, "bar"),
            Self::Bakery => write!(f, "bakery"),
        }
    }
}

/// The deduplicated, merged record for one real-world venue.
///
/// `name` belongs to the record that created the group and is never
/// overwritten by later merges. `sources` is non-empty and ordered by
/// first observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPlace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_type: Option<PlaceType>,
    pub sources: Vec<SourceAttribution>,
}

impl CanonicalPlace {
    /// Seed a new canonical group from its first observation.
    pub fn from_record(record: &RawPlaceRecord) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category.clone(),
            description: record.description.clone(),
            address: record.address.clone(),
            lat: record.lat,
            lng: record.lng,
            rating: record.rating,
            tags: record.tags.clone(),
            place_type: None,
            sources: vec![SourceAttribution::from_record(record)],
        }
    }

    pub fn has_coords(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}

/// Name + optional position view shared by raw records and canonical
/// groups, so the matcher can compare either against either.
pub trait PlaceIdentity {
    fn name(&self) -> &str;
    fn coords(&self) -> Option<(f64, f64)>;
}

impl PlaceIdentity for RawPlaceRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn coords(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

impl PlaceIdentity for CanonicalPlace {
    fn name(&self) -> &str {
        &self.name
    }

    fn coords(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// A map-viewport rectangle (SW and NE corners).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub sw_lat: f64,
    pub sw_lng: f64,
    pub ne_lat: f64,
    pub ne_lng: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.sw_lat && lat <= self.ne_lat && lng >= self.sw_lng && lng <= self.ne_lng
    }
}

impl FromStr for Bounds {
    type Err = String;

    /// Parse "swLat,swLng,neLat,neLng", e.g. "37.51,126.95,37.56,127.02".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!("expected 4 comma-separated numbers, got '{}'", s));
        }
        let mut nums = [0.0f64; 4];
        for (i, p) in parts.iter().enumerate() {
            nums[i] = p
                .parse()
                .map_err(|_| format!("invalid coordinate '{}' in bounds '{}'", p, s))?;
        }
        Ok(Bounds {
            sw_lat: nums[0],
            sw_lng: nums[1],
            ne_lat: nums[2],
            ne_lng: nums[3],
        })
    }
}
