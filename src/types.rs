use crate::constants::MAX_VIEW_LIMIT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One cleaned restaurant entry, the unit every aggregation works on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub country_code: i64,
    /// Resolved from `country_code` through the country table
    pub country: String,
    pub city: String,
    /// First entry of the source cuisine list, or `"nan"` when missing
    pub cuisine: String,
    pub aggregate_rating: f64,
    pub votes: u64,
    pub currency: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// User-chosen view parameters applied before aggregation.
///
/// `None` for a selection means "no constraint"; `Some` of an empty set
/// selects nothing, like an emptied multi-select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub countries: Option<BTreeSet<String>>,
    pub cuisines: Option<BTreeSet<String>>,
    pub city_limit: usize,
    pub restaurant_limit: usize,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            countries: None,
            cuisines: None,
            city_limit: 10,
            restaurant_limit: 10,
        }
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_cuisines<I, S>(mut self, cuisines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cuisines = Some(cuisines.into_iter().map(Into::into).collect());
        self
    }

    /// Set the city-count limit, clamped to the slider range
    pub fn with_city_limit(mut self, limit: usize) -> Self {
        self.city_limit = limit.min(MAX_VIEW_LIMIT);
        self
    }

    /// Set the restaurant-count limit, clamped to the slider range
    pub fn with_restaurant_limit(mut self, limit: usize) -> Self {
        self.restaurant_limit = limit.min(MAX_VIEW_LIMIT);
        self
    }

    pub fn matches_country(&self, record: &CanonicalRecord) -> bool {
        self.countries
            .as_ref()
            .map_or(true, |selected| selected.contains(&record.country))
    }

    pub fn matches_cuisine(&self, record: &CanonicalRecord) -> bool {
        self.cuisines
            .as_ref()
            .map_or(true, |selected| selected.contains(&record.cuisine))
    }

    /// Whether a record survives both the country and the cuisine selection
    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        self.matches_country(record) && self.matches_cuisine(record)
    }
}

/// A labelled value in a ranked series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    pub label: String,
    pub value: T,
}

impl<T> Ranked<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Headline counters for the overview page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCounters {
    pub restaurants: usize,
    pub countries: usize,
    pub cities: usize,
    pub votes: u64,
    pub cuisines: usize,
}

/// One geographic marker for the overview map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub restaurant_name: String,
    pub country: String,
    pub city: String,
    pub aggregate_rating: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// A row of the top-restaurants table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRank {
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub aggregate_rating: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}
