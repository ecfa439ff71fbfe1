//! Decides whether two records denote the same real-world place.

use super::distance::distance_m;
use super::normalize::normalize_name;
use crate::place::PlaceIdentity;

/// Maximum separation for two same-named observations to count as one
/// venue. Absorbs geocoding noise without swallowing a different branch.
const SAME_PLACE_RADIUS_M: i64 = 200;

/// Same place iff normalized names match exactly and, when both sides
/// carry coordinates, they lie within 200 m. A name match alone wins when
/// either side has no position. Symmetric in its arguments.
pub fn is_same_place<A, B>(a: &A, b: &B) -> bool
where
    A: PlaceIdentity + ?Sized,
    B: PlaceIdentity + ?Sized,
{
    if normalize_name(a.name()) != normalize_name(b.name()) {
        return false;
    }

    if let (Some((lat_a, lng_a)), Some((lat_b, lng_b))) = (a.coords(), b.coords()) {
        return distance_m(lat_a, lng_a, lat_b, lng_b) <= SAME_PLACE_RADIUS_M;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::RawPlaceRecord;

    fn record(name: &str, coords: Option<(f64, f64)>) -> RawPlaceRecord {
        RawPlaceRecord {
            name: name.into(),
            lat: coords.map(|c| c.0),
            lng: coords.map(|c| c.1),
            source: "test".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_different_names_never_match() {
        let a = record("을지로 골뱅이", Some((37.566, 126.991)));
        let b = record("을지로 노가리", Some((37.566, 126.991)));
        assert!(!is_same_place(&a, &b));
    }

    #[test]
    fn test_branch_suffix_folds_into_same_name() {
        let a = record("스타벅스 강남점", None);
        let b = record("스타벅스 강남", None);
        assert!(is_same_place(&a, &b));
    }

    #[test]
    fn test_nearby_same_name_matches() {
        // ~142 m apart, inside the 200 m radius.
        let a = record("스타벅스 강남점", Some((37.50, 127.03)));
        let b = record("스타벅스 강남점", Some((37.501, 127.031)));
        assert!(is_same_place(&a, &b));
    }

    #[test]
    fn test_distant_same_name_does_not_match() {
        // Same franchise name, different neighborhoods: two venues.
        let a = record("스타벅스", Some((37.4979, 127.0276)));
        let b = record("스타벅스", Some((37.5345, 126.9945)));
        assert!(!is_same_place(&a, &b));
    }

    #[test]
    fn test_missing_coords_on_either_side_matches_by_name() {
        let with = record("한남동 브런치", Some((37.534, 127.002)));
        let without = record("한남동 브런치", None);
        assert!(is_same_place(&with, &without));
        assert!(is_same_place(&without, &with));
        assert!(is_same_place(&without, &without));
    }

    #[test]
    fn test_symmetric() {
        let cases = [
            (record("국밥", Some((37.50, 127.03))), record("국밥", Some((37.51, 127.04)))),
            (record("국밥", Some((37.50, 127.03))), record("국밥", None)),
            (record("국밥", None), record("만두", None)),
        ];
        for (a, b) in &cases {
            assert_eq!(is_same_place(a, b), is_same_place(b, a));
        }
    }
}
