//! The aggregation pass over one crawl batch.
//!
//! dedup → geocode coordinate gaps → classify → viewport filter → save.
//! Every enrichment step is best-effort; only records without a name are
//! reported back as errors.

use tracing::{debug, info, warn};

use crate::cache::PlaceCache;
use crate::classify::{Classifier, PlaceDescriptor};
use crate::dedup::{deduplicate, DedupError, DedupOutcome};
use crate::geocode::Geocoder;
use crate::place::{Bounds, CanonicalPlace, PlaceIdentity, RawPlaceRecord};

/// One configured aggregation pass.
pub struct Pipeline<'a> {
    geocoder: &'a Geocoder,
    classifier: Option<&'a dyn Classifier>,
}

/// Canonical places that survived the pass, plus per-record failures.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub places: Vec<CanonicalPlace>,
    pub errors: Vec<DedupError>,
}

impl<'a> Pipeline<'a> {
    pub fn new(geocoder: &'a Geocoder) -> Self {
        Self {
            geocoder,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: &'a dyn Classifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Run the full pass. `search_terms` seeds the geocoding query for
    /// places that carry no address; `bounds`, when given, drops places
    /// outside the viewport. Survivors are upserted into `cache`.
    pub fn run(
        &self,
        search_terms: &str,
        bounds: Option<&Bounds>,
        records: &[RawPlaceRecord],
        cache: &mut PlaceCache,
    ) -> PipelineOutput {
        let DedupOutcome { mut places, errors } = deduplicate(records);
        info!(
            raw = records.len(),
            groups = places.len(),
            dropped = errors.len(),
            "deduplicated crawl batch"
        );

        for place in &mut places {
            if place.has_coords() {
                continue;
            }
            self.fill_coordinates(search_terms, place);
        }

        if let Some(classifier) = self.classifier {
            apply_labels(&mut places, classifier);
        }

        // Places that never got coordinates can't go on the map; places
        // outside the viewport don't belong to this pass.
        places.retain(|p| match p.coords() {
            Some((lat, lng)) => bounds.is_none_or(|b| b.contains(lat, lng)),
            None => false,
        });

        let stored = cache.save(&places);
        debug!(stored, "persisted canonical places");

        PipelineOutput { places, errors }
    }

    /// Geocode the place's address when it has one, otherwise the search
    /// terms plus its name. Failure leaves the place coordinate-less.
    fn fill_coordinates(&self, search_terms: &str, place: &mut CanonicalPlace) {
        let query = match place.address.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(address) => address.to_string(),
            None => format!("{} {}", search_terms, place.name).trim().to_string(),
        };

        if let Some(geo) = self.geocoder.geocode(&query) {
            place.lat = Some(geo.lat);
            place.lng = Some(geo.lng);
            if place.address.as_deref().is_none_or(|a| a.trim().is_empty()) {
                place.address = Some(geo.address);
            }
        }
    }
}

fn apply_labels(places: &mut [CanonicalPlace], classifier: &dyn Classifier) {
    let unlabeled: Vec<PlaceDescriptor> = places
        .iter()
        .filter(|p| p.place_type.is_none())
        .map(PlaceDescriptor::from_place)
        .collect();
    if unlabeled.is_empty() {
        return;
    }

    match classifier.classify(&unlabeled) {
        Ok(labels) => {
            for place in places.iter_mut() {
                if place.place_type.is_none() {
                    place.place_type = labels.get(&place.name).copied();
                }
            }
        }
        Err(e) => warn!(error = %e, "classification unavailable, leaving place types unset"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::KeywordClassifier;
    use crate::place::PlaceType;
    use tempfile::TempDir;

    fn offline_geocoder() -> Geocoder {
        let mut geocoder = Geocoder::with_credentials(None);
        geocoder.set_offline(true);
        geocoder
    }

    fn temp_cache() -> (PlaceCache, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("places.json");
        (PlaceCache::load_from(path), dir)
    }

    fn record(name: &str, source: &str) -> RawPlaceRecord {
        RawPlaceRecord {
            name: name.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    fn record_at(name: &str, source: &str, lat: f64, lng: f64) -> RawPlaceRecord {
        RawPlaceRecord {
            lat: Some(lat),
            lng: Some(lng),
            ..record(name, source)
        }
    }

    #[test]
    fn test_two_source_crawl_merges_and_saves() {
        let geocoder = offline_geocoder();
        let (mut cache, _dir) = temp_cache();
        let records = vec![
            record_at("스타벅스 강남점", "a", 37.50, 127.03),
            record_at("스타벅스 강남점", "b", 37.501, 127.031),
        ];

        let output = Pipeline::new(&geocoder).run("", None, &records, &mut cache);

        assert_eq!(output.places.len(), 1);
        assert_eq!(output.places[0].name, "스타벅스 강남점");
        assert_eq!(output.places[0].sources.len(), 2);
        assert!(output.errors.is_empty());

        // The pass also upserted the merged place into the store.
        let rows = cache.find(None, 24);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "스타벅스 강남점");
    }

    #[test]
    fn test_landmark_backfills_missing_coordinates() {
        let geocoder = offline_geocoder();
        let (mut cache, _dir) = temp_cache();
        let records = vec![record("파스타집", "a")];

        let output = Pipeline::new(&geocoder).run("한남동 맛집", None, &records, &mut cache);

        // "한남동 맛집 파스타집" resolves via the 한남동 gazetteer entry.
        assert_eq!(output.places.len(), 1);
        assert_eq!(output.places[0].lat, Some(37.5340));
        assert_eq!(output.places[0].address.as_deref(), Some("서울특별시 용산구 한남동"));
    }

    #[test]
    fn test_address_is_the_preferred_geocode_query() {
        let geocoder = offline_geocoder();
        let (mut cache, _dir) = temp_cache();
        let records = vec![RawPlaceRecord {
            address: Some("이태원".into()),
            ..record("어딘가 식당", "a")
        }];

        let output = Pipeline::new(&geocoder).run("부산 맛집", None, &records, &mut cache);

        assert_eq!(output.places[0].lat, Some(37.5345));
        // The crawled address is kept, not replaced by the gazetteer's.
        assert_eq!(output.places[0].address.as_deref(), Some("이태원"));
    }

    #[test]
    fn test_ungeocodable_places_fall_out() {
        let geocoder = offline_geocoder();
        let (mut cache, _dir) = temp_cache();
        let records = vec![record("정체불명 식당", "a")];

        let output = Pipeline::new(&geocoder).run("", None, &records, &mut cache);

        assert!(output.places.is_empty());
        assert!(output.errors.is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_bounds_filter_drops_outsiders() {
        let geocoder = offline_geocoder();
        let (mut cache, _dir) = temp_cache();
        let bounds: Bounds = "37.51,126.95,37.56,127.02".parse().unwrap();
        let records = vec![
            record_at("안쪽집", "a", 37.534, 126.994),
            record_at("바깥집", "a", 37.498, 127.028),
        ];

        let output = Pipeline::new(&geocoder).run("", Some(&bounds), &records, &mut cache);

        assert_eq!(output.places.len(), 1);
        assert_eq!(output.places[0].name, "안쪽집");
    }

    #[test]
    fn test_nameless_records_surface_as_errors() {
        let geocoder = offline_geocoder();
        let (mut cache, _dir) = temp_cache();
        let records = vec![record("", "broken"), record_at("성한집", "a", 37.53, 126.99)];

        let output = Pipeline::new(&geocoder).run("", None, &records, &mut cache);

        assert_eq!(output.places.len(), 1);
        assert_eq!(output.errors.len(), 1);
    }

    #[test]
    fn test_classifier_fills_place_types() {
        let geocoder = offline_geocoder();
        let (mut cache, _dir) = temp_cache();
        let classifier = KeywordClassifier;
        let records = vec![
            record_at("연남 베이글", "a", 37.566, 126.925),
            record_at("할매국밥", "a", 37.534, 126.994),
        ];

        let output = Pipeline::new(&geocoder)
            .with_classifier(&classifier)
            .run("", None, &records, &mut cache);

        assert_eq!(output.places[0].place_type, Some(PlaceType::Bakery));
        assert_eq!(output.places[1].place_type, Some(PlaceType::Restaurant));
    }

    #[test]
    fn test_empty_batch_is_fine() {
        let geocoder = offline_geocoder();
        let (mut cache, _dir) = temp_cache();
        let output = Pipeline::new(&geocoder).run("", None, &[], &mut cache);
        assert!(output.places.is_empty());
        assert!(output.errors.is_empty());
    }
}
