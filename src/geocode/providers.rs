//! Network geocoding stages: Naver Cloud Platform and Nominatim.
//!
//! Both stages share a fail-soft contract: transport errors, non-200
//! statuses, unparseable payloads, and empty result lists all surface as
//! a `GeocodeError` for the resolver to log and fall through on.

use std::time::Duration;

use serde::Deserialize;

use super::types::{GeocodeError, GeocodeResult};

/// Per-call timeout for the blocking HTTP stages.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const NAVER_GEOCODE_URL: &str = "https://naveropenapi.apigw.ntruss.com/map-geocode/v2/geocode";
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = "Matjip/0.4 (dining-place-pipeline)";

/// Appended to Nominatim queries. The gazetteer and the primary provider
/// are Seoul-specific; the global fallback needs the hint.
const REGION_SUFFIX: &str = "서울";

/// API key pair for the Naver geocoding service. Half a pair is no pair:
/// the primary stage is skipped unless both values are configured.
#[derive(Debug, Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl NaverCredentials {
    /// Read `NAVER_MAP_CLIENT_ID` / `NAVER_MAP_CLIENT_SECRET` from the
    /// environment. Missing or empty values yield `None`.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("NAVER_MAP_CLIENT_ID")
            .ok()
            .filter(|v| !v.is_empty())?;
        let client_secret = std::env::var("NAVER_MAP_CLIENT_SECRET")
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self {
            client_id,
            client_secret,
        })
    }
}

pub fn build_agent() -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build()
}

// ─── Naver (primary) ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct NaverResponse {
    #[serde(default)]
    addresses: Vec<NaverAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaverAddress {
    /// Longitude, serialized as a string.
    #[serde(default)]
    x: String,
    /// Latitude, serialized as a string.
    #[serde(default)]
    y: String,
    #[serde(default)]
    road_address: String,
    #[serde(default)]
    jibun_address: String,
}

/// Query the Naver geocoding API. First address wins; the road address is
/// preferred over the parcel (jibun) address, with the query itself as the
/// last resort display string.
pub fn naver_geocode(
    agent: &ureq::Agent,
    credentials: &NaverCredentials,
    query: &str,
) -> Result<GeocodeResult, GeocodeError> {
    let response = agent
        .get(NAVER_GEOCODE_URL)
        .query("query", query)
        .set("X-NCP-APIGW-API-KEY-ID", &credentials.client_id)
        .set("X-NCP-APIGW-API-KEY", &credentials.client_secret)
        .call()
        .map_err(|e| GeocodeError::Network(e.to_string()))?;

    let data: NaverResponse = response
        .into_json()
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    parse_naver(data, query)
}

fn parse_naver(data: NaverResponse, query: &str) -> Result<GeocodeResult, GeocodeError> {
    let addr = data.addresses.first().ok_or(GeocodeError::NoResults)?;

    let lat: f64 = addr
        .y
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude '{}'", addr.y)))?;
    let lng: f64 = addr
        .x
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude '{}'", addr.x)))?;

    let address = if !addr.road_address.is_empty() {
        addr.road_address.clone()
    } else if !addr.jibun_address.is_empty() {
        addr.jibun_address.clone()
    } else {
        query.to_string()
    };

    Ok(GeocodeResult { lat, lng, address })
}

// ─── Nominatim (fallback) ───────────────────────────────────────

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Query Nominatim for a single best match, restricted to Korea and
/// suffixed with the region hint.
pub fn nominatim_geocode(agent: &ureq::Agent, query: &str) -> Result<GeocodeResult, GeocodeError> {
    let response = agent
        .get(NOMINATIM_URL)
        .query("q", &format!("{} {}", query, REGION_SUFFIX))
        .query("format", "json")
        .query("limit", "1")
        .query("countrycodes", "kr")
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| GeocodeError::Network(e.to_string()))?;

    let results: Vec<NominatimResult> = response
        .into_json()
        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    parse_nominatim(results, query)
}

fn parse_nominatim(
    results: Vec<NominatimResult>,
    query: &str,
) -> Result<GeocodeResult, GeocodeError> {
    let top = results.first().ok_or(GeocodeError::NoResults)?;

    let lat: f64 = top
        .lat
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude '{}'", top.lat)))?;
    let lng: f64 = top
        .lon
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude '{}'", top.lon)))?;

    let address = if top.display_name.is_empty() {
        query.to_string()
    } else {
        top.display_name.clone()
    };

    Ok(GeocodeResult { lat, lng, address })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_naver_prefers_road_address() {
        let data: NaverResponse = serde_json::from_str(
            r#"{"addresses": [{
                "x": "126.9945", "y": "37.5345",
                "roadAddress": "서울특별시 용산구 이태원로 153",
                "jibunAddress": "서울특별시 용산구 이태원동 34-2"
            }]}"#,
        )
        .unwrap();
        let result = parse_naver(data, "이태원로 153").unwrap();
        assert_relative_eq!(result.lat, 37.5345);
        assert_relative_eq!(result.lng, 126.9945);
        assert_eq!(result.address, "서울특별시 용산구 이태원로 153");
    }

    #[test]
    fn test_parse_naver_falls_back_to_jibun_then_query() {
        let data: NaverResponse = serde_json::from_str(
            r#"{"addresses": [{"x": "127.0", "y": "37.5",
                "roadAddress": "", "jibunAddress": "용산동2가 1-1"}]}"#,
        )
        .unwrap();
        assert_eq!(parse_naver(data, "q").unwrap().address, "용산동2가 1-1");

        let data: NaverResponse =
            serde_json::from_str(r#"{"addresses": [{"x": "127.0", "y": "37.5"}]}"#).unwrap();
        assert_eq!(parse_naver(data, "해방촌 맛집").unwrap().address, "해방촌 맛집");
    }

    #[test]
    fn test_parse_naver_empty_list_is_no_results() {
        let data: NaverResponse = serde_json::from_str(r#"{"addresses": []}"#).unwrap();
        assert!(matches!(parse_naver(data, "q"), Err(GeocodeError::NoResults)));

        // A payload without the field at all behaves the same.
        let data: NaverResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(matches!(parse_naver(data, "q"), Err(GeocodeError::NoResults)));
    }

    #[test]
    fn test_parse_naver_bad_coordinate_is_invalid_response() {
        let data: NaverResponse = serde_json::from_str(
            r#"{"addresses": [{"x": "not-a-number", "y": "37.5"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            parse_naver(data, "q"),
            Err(GeocodeError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_nominatim_top_result() {
        let results: Vec<NominatimResult> = serde_json::from_str(
            r#"[{"lat": "37.5563", "lon": "126.9220",
                 "display_name": "홍대, 마포구, 서울특별시, 대한민국"},
                {"lat": "0", "lon": "0", "display_name": "ignored"}]"#,
        )
        .unwrap();
        let result = parse_nominatim(results, "홍대").unwrap();
        assert_relative_eq!(result.lat, 37.5563);
        assert_eq!(result.address, "홍대, 마포구, 서울특별시, 대한민국");
    }

    #[test]
    fn test_parse_nominatim_empty_is_no_results() {
        assert!(matches!(
            parse_nominatim(Vec::new(), "q"),
            Err(GeocodeError::NoResults)
        ));
    }

    #[test]
    fn test_parse_nominatim_blank_display_name_uses_query() {
        let results: Vec<NominatimResult> =
            serde_json::from_str(r#"[{"lat": "37.5", "lon": "127.0"}]"#).unwrap();
        assert_eq!(parse_nominatim(results, "성수동 카페").unwrap().address, "성수동 카페");
    }
}
