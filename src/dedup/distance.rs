//! Great-circle distance between two coordinates.

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in whole meters.
///
/// Symmetric, zero for identical inputs. The haversine intermediate is
/// clamped to [0, 1] so rounding noise near antipodal points cannot
/// escape the domain of the square roots.
pub fn distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> i64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    (2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())).round() as i64
}
