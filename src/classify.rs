//! Venue classification, the LLM collaborator seam.
//!
//! The chat-completion client lives outside this crate; it plugs in
//! through [`Classifier`]. Labels are best-effort: a failed or partial
//! classification leaves `place_type` unset and the pipeline moves on.
//! [`KeywordClassifier`] is the built-in, network-free implementation.

use std::collections::HashMap;
use std::fmt;

use crate::place::{CanonicalPlace, PlaceType};

/// The descriptive fields a classifier gets to look at.
#[derive(Debug, Clone, Default)]
pub struct PlaceDescriptor {
    pub name: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub description: Option<String>,
}

impl PlaceDescriptor {
    pub fn from_place(place: &CanonicalPlace) -> Self {
        Self {
            name: place.name.clone(),
            category: place.category.clone(),
            tags: place.tags.clone(),
            description: place.description.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ClassifyError {
    Upstream(String),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream(msg) => write!(f, "classification upstream error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Maps place names to venue types. Implementations may call out to an
/// LLM; whatever they return is applied best-effort.
pub trait Classifier {
    fn classify(
        &self,
        places: &[PlaceDescriptor],
    ) -> Result<HashMap<String, PlaceType>, ClassifyError>;
}

/// Keyword-hint classifier. Mirrors the hints the LLM prompt encodes, so
/// batches can be labeled without a network round trip: name markers
/// beat category markers beat tag markers, and anything unmatched is a
/// plain restaurant.
pub struct KeywordClassifier;

const BAKERY_NAME_HINTS: &[&str] = &["빵", "베이글", "베이커리", "제과", "bakery"];
const CAFE_NAME_HINTS: &[&str] = &["커피", "카페", "coffee"];
const BAR_NAME_HINTS: &[&str] = &["포차", "주점", "이자카야", "펍", "호프", "bar"];

const CAFE_TAG_HINTS: &[&str] = &["혼카페", "혼커", "차모임"];
const BAR_TAG_HINTS: &[&str] = &["술모임", "혼술"];

impl Classifier for KeywordClassifier {
    fn classify(
        &self,
        places: &[PlaceDescriptor],
    ) -> Result<HashMap<String, PlaceType>, ClassifyError> {
        Ok(places
            .iter()
            .map(|p| (p.name.clone(), label(p)))
            .collect())
    }
}

fn label(place: &PlaceDescriptor) -> PlaceType {
    let name = place.name.to_lowercase();
    if contains_any(&name, BAKERY_NAME_HINTS) {
        return PlaceType::Bakery;
    }
    if contains_any(&name, CAFE_NAME_HINTS) {
        return PlaceType::Cafe;
    }
    if contains_any(&name, BAR_NAME_HINTS) {
        return PlaceType::Bar;
    }

    if let Some(category) = place.category.as_deref() {
        let category = category.to_lowercase();
        if contains_any(&category, BAKERY_NAME_HINTS) {
            return PlaceType::Bakery;
        }
        if contains_any(&category, CAFE_NAME_HINTS) {
            return PlaceType::Cafe;
        }
        if contains_any(&category, BAR_NAME_HINTS) {
            return PlaceType::Bar;
        }
    }

    if let Some(tags) = place.tags.as_deref() {
        if contains_any(tags, CAFE_TAG_HINTS) {
            return PlaceType::Cafe;
        }
        if contains_any(tags, BAR_TAG_HINTS) {
            return PlaceType::Bar;
        }
    }

    PlaceType::Restaurant
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
