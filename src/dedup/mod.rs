//! Deduplication subsystem.
//!
//! Folds raw crawled records into canonical places: normalized-name
//! equality plus a 200 m proximity check decide group membership, and a
//! gap-fill merge combines partial data without ever overwriting.

pub mod distance;
pub mod engine;
pub mod matcher;
pub mod normalize;

pub use distance::distance_m;
pub use engine::{deduplicate, DedupError, DedupOutcome};
pub use matcher::is_same_place;
pub use normalize::normalize_name;
