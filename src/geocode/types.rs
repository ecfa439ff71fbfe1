//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates plus a display address, produced by exactly one
/// resolution stage. Ephemeral, never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// Why a single geocoding stage produced nothing. These are expected
/// outcomes that trigger fallthrough; callers of the full chain only
/// ever see `Option<GeocodeResult>`.
#[derive(Debug)]
pub enum GeocodeError {
    Network(String),
    InvalidResponse(String),
    NoResults,
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "invalid provider response: {}", msg),
            Self::NoResults => write!(f, "provider returned no results"),
        }
    }
}

impl std::error::Error for GeocodeError {}
