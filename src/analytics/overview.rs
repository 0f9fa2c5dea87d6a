use std::collections::HashSet;
use tracing::debug;

use super::in_countries;
use crate::types::{CanonicalRecord, FilterSpec, GlobalCounters, MapMarker};

/// Headline counters over the records in the selected countries.
/// Restaurants are counted by distinct name, so branches of one chain count once.
pub fn global_counters(records: &[CanonicalRecord], filter: &FilterSpec) -> GlobalCounters {
    let mut restaurants = HashSet::new();
    let mut countries = HashSet::new();
    let mut cities = HashSet::new();
    let mut cuisines = HashSet::new();
    let mut votes = 0u64;

    for record in in_countries(records, filter) {
        restaurants.insert(record.restaurant_name.as_str());
        countries.insert(record.country_code);
        cities.insert(record.city.as_str());
        cuisines.insert(record.cuisine.as_str());
        votes += record.votes;
    }

    let counters = GlobalCounters {
        restaurants: restaurants.len(),
        countries: countries.len(),
        cities: cities.len(),
        votes,
        cuisines: cuisines.len(),
    };
    debug!(?counters, "Computed global counters");
    counters
}

/// One map marker per record in the selected countries, in dataset order
pub fn map_markers(records: &[CanonicalRecord], filter: &FilterSpec) -> Vec<MapMarker> {
    in_countries(records, filter)
        .map(|record| MapMarker {
            restaurant_name: record.restaurant_name.clone(),
            country: record.country.clone(),
            city: record.city.clone(),
            aggregate_rating: record.aggregate_rating,
            latitude: record.latitude,
            longitude: record.longitude,
        })
        .collect()
}
