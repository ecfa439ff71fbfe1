//! Place name normalization for dedup matching.

/// Branch/franchise qualifiers stripped from the end of a name.
/// Longer suffixes come first so "서울역점" loses "역점", not just "점".
const BRANCH_SUFFIXES: &[&str] = &["직영점", "본점", "지점", "역점", "점"];

/// Canonicalize a place name for fuzzy matching: trim, lowercase, drop a
/// trailing branch qualifier (본점/지점/직영점/역점/점), collapse runs of
/// whitespace. "스타벅스 강남점" and "스타벅스  강남 지점" both come out
/// as "스타벅스 강남".
pub fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();

    let mut stem = lowered.as_str();
    for suffix in BRANCH_SUFFIXES {
        if let Some(stripped) = stem.strip_suffix(suffix) {
            stem = stripped.trim_end();
            break;
        }
    }

    stem.split_whitespace().collect::<Vec<_>>().join(" ")
}
