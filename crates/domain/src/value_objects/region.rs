//! Location-dependent multiplier for in-rank currency conversion

/// Location keyword where currency conversion is unavailable in both directions.
pub const FORBIDDEN_REGION: &str = "禁灵区";

/// Keyword -> multiplier. First row contained in the location wins.
const REGION_FACTORS: [(&str, f64); 3] = [("黑市", 1.5), ("遗迹", 1.2), ("荒野", 0.8)];

pub const DEFAULT_REGION_FACTOR: f64 = 1.0;

/// Currency conversion factor for a location, or `None` where conversion is blocked.
pub fn region_factor(location: &str) -> Option<f64> {
    if location.contains(FORBIDDEN_REGION) {
        return None;
    }
    let factor = REGION_FACTORS
        .iter()
        .find(|(keyword, _)| location.contains(keyword))
        .map(|(_, factor)| *factor)
        .unwrap_or(DEFAULT_REGION_FACTOR);
    Some(factor)
}
