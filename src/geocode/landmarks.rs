//! Static Seoul landmark gazetteer, the fast offline first stage.

use super::types::GeocodeResult;

/// A well-known location. Read-only reference data, shared freely.
pub struct Landmark {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub address: &'static str,
}

/// Neighborhood and subway-station landmarks, in lookup order.
pub const LANDMARKS: &[Landmark] = &[
    Landmark { name: "용산구청", lat: 37.5324, lng: 126.9906, address: "서울특별시 용산구 녹사평대로 150" },
    Landmark { name: "이태원", lat: 37.5345, lng: 126.9945, address: "서울특별시 용산구 이태원동" },
    Landmark { name: "이태원역", lat: 37.5345, lng: 126.9945, address: "서울특별시 용산구 이태원동" },
    Landmark { name: "한남동", lat: 37.5340, lng: 127.0020, address: "서울특별시 용산구 한남동" },
    Landmark { name: "경리단길", lat: 37.5390, lng: 126.9875, address: "서울특별시 용산구 회나무로" },
    Landmark { name: "녹사평", lat: 37.5345, lng: 126.9870, address: "서울특별시 용산구 녹사평대로" },
    Landmark { name: "녹사평역", lat: 37.5345, lng: 126.9870, address: "서울특별시 용산구 녹사평대로" },
    Landmark { name: "해방촌", lat: 37.5420, lng: 126.9870, address: "서울특별시 용산구 용산동2가" },
    Landmark { name: "강남역", lat: 37.4979, lng: 127.0276, address: "서울특별시 강남구 강남대로 396" },
    Landmark { name: "강남", lat: 37.4979, lng: 127.0276, address: "서울특별시 강남구" },
    Landmark { name: "홍대", lat: 37.5563, lng: 126.9220, address: "서울특별시 마포구 와우산로" },
    Landmark { name: "홍대입구", lat: 37.5563, lng: 126.9220, address: "서울특별시 마포구 양화로" },
    Landmark { name: "홍대입구역", lat: 37.5563, lng: 126.9220, address: "서울특별시 마포구 양화로" },
    Landmark { name: "명동", lat: 37.5636, lng: 126.9860, address: "서울특별시 중구 명동" },
    Landmark { name: "잠실", lat: 37.5133, lng: 127.1001, address: "서울특별시 송파구 잠실동" },
    Landmark { name: "여의도", lat: 37.5219, lng: 126.9245, address: "서울특별시 영등포구 여의도동" },
    Landmark { name: "신촌", lat: 37.5551, lng: 126.9368, address: "서울특별시 서대문구 신촌동" },
    Landmark { name: "건대", lat: 37.5404, lng: 127.0699, address: "서울특별시 광진구 능동로" },
    Landmark { name: "건대입구", lat: 37.5404, lng: 127.0699, address: "서울특별시 광진구 능동로" },
    Landmark { name: "성수", lat: 37.5445, lng: 127.0557, address: "서울특별시 성동구 성수동" },
    Landmark { name: "성수동", lat: 37.5445, lng: 127.0557, address: "서울특별시 성동구 성수동" },
    Landmark { name: "을지로", lat: 37.5660, lng: 126.9910, address: "서울특별시 중구 을지로" },
    Landmark { name: "종로", lat: 37.5700, lng: 126.9920, address: "서울특별시 종로구 종로" },
    Landmark { name: "압구정", lat: 37.5270, lng: 127.0280, address: "서울특별시 강남구 압구정동" },
    Landmark { name: "청담", lat: 37.5255, lng: 127.0470, address: "서울특별시 강남구 청담동" },
    Landmark { name: "서울역", lat: 37.5547, lng: 126.9707, address: "서울특별시 용산구 한강대로" },
    Landmark { name: "용산역", lat: 37.5298, lng: 126.9648, address: "서울특별시 용산구 한강대로" },
    Landmark { name: "삼성역", lat: 37.5090, lng: 127.0640, address: "서울특별시 강남구 테헤란로" },
    Landmark { name: "선릉역", lat: 37.5047, lng: 127.0490, address: "서울특별시 강남구 테헤란로" },
    Landmark { name: "망원", lat: 37.5567, lng: 126.9100, address: "서울특별시 마포구 망원동" },
    Landmark { name: "연남동", lat: 37.5660, lng: 126.9250, address: "서울특별시 마포구 연남동" },
    Landmark { name: "이촌", lat: 37.5220, lng: 126.9720, address: "서울특별시 용산구 이촌동" },
    Landmark { name: "한강진역", lat: 37.5398, lng: 126.9975, address: "서울특별시 용산구 한남동" },
];

/// Look a query up in the gazetteer.
///
/// Exact match first. Queries containing a digit are full street
/// addresses, not landmark names; for those, substring matching is
/// skipped entirely. Otherwise containment is tried in both directions
/// over the table in its defined order, first hit wins.
pub fn lookup_landmark(query: &str) -> Option<GeocodeResult> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }

    if let Some(hit) = LANDMARKS.iter().find(|l| l.name == q) {
        return Some(to_result(hit));
    }

    if q.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    LANDMARKS
        .iter()
        .find(|l| q.contains(l.name) || l.name.contains(q))
        .map(to_result)
}

fn to_result(landmark: &Landmark) -> GeocodeResult {
    GeocodeResult {
        lat: landmark.lat,
        lng: landmark.lng,
        address: landmark.address.to_string(),
    }
}
