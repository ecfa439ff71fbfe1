//! Matjip — dining-place aggregation core.
//!
//! Raw place records crawled from multiple untrusted sources are folded
//! into canonical deduplicated places, enriched with coordinates through
//! a cascading geocoding chain (landmark gazetteer → Naver → Nominatim),
//! and upserted into a local place store.

pub mod cache;
pub mod classify;
pub mod dedup;
pub mod geocode;
pub mod pipeline;
pub mod place;

pub use cache::PlaceCache;
pub use classify::{Classifier, KeywordClassifier};
pub use dedup::{deduplicate, DedupError, DedupOutcome};
pub use geocode::{Geocoder, GeocodeResult};
pub use pipeline::{Pipeline, PipelineOutput};
pub use place::{Bounds, CanonicalPlace, PlaceType, RawPlaceRecord, SourceAttribution};
