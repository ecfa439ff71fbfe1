//! Geocoding resolver — orchestrates the fallback chain.
//!
//! Chain: landmark gazetteer → Naver (requires credentials) → Nominatim.
//! First success wins; a stage that fails is logged and skipped, never
//! retried. Total failure is an ordinary `None`, not an error.

use tracing::{debug, warn};

use super::landmarks;
use super::providers::{self, NaverCredentials};
use super::types::GeocodeResult;

/// The geocoder with its fallback pipeline.
pub struct Geocoder {
    agent: ureq::Agent,
    credentials: Option<NaverCredentials>,
    offline: bool,
}

impl Geocoder {
    /// Build a geocoder with Naver credentials read from the environment.
    pub fn new() -> Self {
        Self::with_credentials(NaverCredentials::from_env())
    }

    /// Build a geocoder with explicit (or deliberately absent) credentials.
    pub fn with_credentials(credentials: Option<NaverCredentials>) -> Self {
        Self {
            agent: providers::build_agent(),
            credentials,
            offline: false,
        }
    }

    /// Offline mode: only the gazetteer stage runs. Used by tests and
    /// airgapped batch runs.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Resolve a free-text query to coordinates, or `None` when every
    /// stage comes up empty. Callers must treat `None` as a normal
    /// outcome; plenty of crawled strings simply don't geocode.
    pub fn geocode(&self, query: &str) -> Option<GeocodeResult> {
        if let Some(hit) = landmarks::lookup_landmark(query) {
            debug!(query, "landmark gazetteer hit");
            return Some(hit);
        }

        if !self.offline {
            match &self.credentials {
                Some(credentials) => {
                    match providers::naver_geocode(&self.agent, credentials, query) {
                        Ok(result) => return Some(result),
                        Err(e) => debug!(query, error = %e, "naver stage fell through"),
                    }
                }
                None => debug!(query, "naver credentials not configured, stage skipped"),
            }

            match providers::nominatim_geocode(&self.agent, query) {
                Ok(result) => return Some(result),
                Err(e) => debug!(query, error = %e, "nominatim stage fell through"),
            }
        }

        warn!(query, "geocoding exhausted every stage");
        None
    }
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}
