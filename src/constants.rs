/// Fixed country table and the other constants shared across every view.
/// Country names are resolved from these codes once, at normalization time.
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// (country code, country name) pairs, in code order
pub const COUNTRY_TABLE: [(i64, &str); 15] = [
    (1, "India"),
    (14, "Australia"),
    (30, "Brazil"),
    (37, "Canada"),
    (94, "Indonesia"),
    (148, "New Zealand"),
    (162, "Philippines"),
    (166, "Qatar"),
    (184, "Singapore"),
    (189, "South Africa"),
    (191, "Sri Lanka"),
    (208, "Turkey"),
    (214, "United Arab Emirates"),
    (215, "England"),
    (216, "United States of America"),
];

static COUNTRY_BY_CODE: Lazy<HashMap<i64, &'static str>> =
    Lazy::new(|| COUNTRY_TABLE.iter().copied().collect());

/// Look up the country name for a code, `None` if the code is not in the table
pub fn country_name(code: i64) -> Option<&'static str> {
    COUNTRY_BY_CODE.get(&code).copied()
}

/// All country names, in code order
pub fn country_names() -> Vec<&'static str> {
    COUNTRY_TABLE.iter().map(|(_, name)| *name).collect()
}

// Cuisine placeholders
pub const MISSING_CUISINE: &str = "nan";
pub const CATCH_ALL_CUISINE: &str = "Others";

// Rating thresholds used by the city extremes series
pub const HIGH_RATING_THRESHOLD: f64 = 4.0;
pub const LOW_RATING_THRESHOLD: f64 = 2.5;

/// Rows returned by the cuisine quality ranking
pub const CUISINE_RANKING_ROWS: usize = 100;

/// Upper bound of the user-facing count sliders
pub const MAX_VIEW_LIMIT: usize = 100;

// Canonical column names
pub const COL_RESTAURANT_ID: &str = "restaurant_id";
pub const COL_RESTAURANT_NAME: &str = "restaurant_name";
pub const COL_COUNTRY_CODE: &str = "country_code";
pub const COL_CITY: &str = "city";
pub const COL_CUISINES: &str = "cuisines";
pub const COL_AGGREGATE_RATING: &str = "aggregate_rating";
pub const COL_VOTES: &str = "votes";
pub const COL_CURRENCY: &str = "currency";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";

/// Columns that must be present after field-name canonicalization
pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_RESTAURANT_ID,
    COL_RESTAURANT_NAME,
    COL_COUNTRY_CODE,
    COL_CITY,
    COL_CUISINES,
    COL_AGGREGATE_RATING,
    COL_VOTES,
    COL_CURRENCY,
    COL_LATITUDE,
    COL_LONGITUDE,
];

/// Columns with no analytical use, dropped during normalization
pub const PRUNED_COLUMNS: [&str; 1] = ["switch_to_order_menu"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_resolves() {
        assert_eq!(country_name(1), Some("India"));
        assert_eq!(country_name(30), Some("Brazil"));
        assert_eq!(country_name(216), Some("United States of America"));
        assert_eq!(country_names().len(), 15);
    }

    #[test]
    fn test_unknown_code_is_none() {
        assert_eq!(country_name(999), None);
        assert_eq!(country_name(0), None);
    }
}
