//! US freight region table
//!
//! Carriers advertise coverage as region names ("Midwest", "West Coast") while
//! shipments name cities ("Chicago, IL"). This table maps two-letter state
//! codes to the region names a carrier may list, so a location can be tested
//! against a coverage region even when the region name never appears in the
//! location text. A state may belong to more than one region.

const REGIONS: &[(&str, &[&str])] = &[
    ("Northeast", &["ME", "NH", "VT", "MA", "RI", "CT", "NY"]),
    ("Mid-Atlantic", &["NY", "NJ", "PA", "DE", "MD", "DC", "VA", "WV"]),
    (
        "Southeast",
        &["NC", "SC", "GA", "FL", "AL", "MS", "TN", "KY"],
    ),
    (
        "Midwest",
        &["OH", "MI", "IN", "IL", "WI", "MN", "IA", "MO", "ND", "SD", "NE", "KS"],
    ),
    ("South Central", &["TX", "OK", "AR", "LA"]),
    ("Southwest", &["AZ", "NM", "TX", "NV", "OK"]),
    ("Mountain", &["CO", "UT", "WY", "MT", "ID"]),
    ("West Coast", &["CA", "OR", "WA"]),
    ("Pacific", &["AK", "HI"]),
];

/// Extract the state code from a `"City, ST"` location
///
/// Returns `None` when the text after the last comma is not a two-letter code.
pub fn state_code(location: &str) -> Option<String> {
    let (_, tail) = location.rsplit_once(',')?;
    let code = tail.trim();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

/// Whether a state code belongs to the named region (case-insensitive)
pub fn region_contains(region: &str, state: &str) -> bool {
    REGIONS
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case(region.trim()))
        .any(|(_, states)| states.iter().any(|s| s.eq_ignore_ascii_case(state)))
}

/// Whether a carrier's coverage region covers a location
///
/// A region covers the location when the region name appears in the location
/// text (case-insensitive), or when the location's state belongs to the region.
pub fn covers(region: &str, location: &str) -> bool {
    let region = region.trim();
    if region.is_empty() {
        return false;
    }
    if location
        .to_lowercase()
        .contains(&region.to_lowercase())
    {
        return true;
    }
    state_code(location)
        .map(|state| region_contains(region, &state))
        .unwrap_or(false)
}
