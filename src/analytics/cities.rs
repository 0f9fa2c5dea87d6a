use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::{in_countries, rank, take};
use crate::constants::{HIGH_RATING_THRESHOLD, LOW_RATING_THRESHOLD};
use crate::types::{CanonicalRecord, FilterSpec, Ranked, SortOrder};

/// Which end of the rating scale a city series counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBand {
    /// Rating strictly above 4.0
    High,
    /// Rating strictly below 2.5
    Low,
}

impl RatingBand {
    pub fn contains(&self, rating: f64) -> bool {
        match self {
            RatingBand::High => rating > HIGH_RATING_THRESHOLD,
            RatingBand::Low => rating < LOW_RATING_THRESHOLD,
        }
    }
}

fn count_by_city<'a>(records: impl Iterator<Item = &'a CanonicalRecord>) -> Vec<Ranked<usize>> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.city.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(city, count)| Ranked::new(city, count))
        .collect()
}

fn top_cities(mut series: Vec<Ranked<usize>>, limit: usize) -> Vec<Ranked<usize>> {
    rank(&mut series, SortOrder::Descending);
    take(series, limit)
}

/// Cities with the most registered restaurants, truncated to the city limit
pub fn restaurants_per_city(records: &[CanonicalRecord], filter: &FilterSpec) -> Vec<Ranked<usize>> {
    top_cities(count_by_city(in_countries(records, filter)), filter.city_limit)
}

/// Cities ranked by how many restaurants fall in a rating band.
/// Cities with no restaurant in the band never appear.
pub fn rated_cities(
    records: &[CanonicalRecord],
    filter: &FilterSpec,
    band: RatingBand,
) -> Vec<Ranked<usize>> {
    let in_band = in_countries(records, filter).filter(|record| band.contains(record.aggregate_rating));
    let series = top_cities(count_by_city(in_band), filter.city_limit);
    debug!(?band, cities = series.len(), "Computed rated cities");
    series
}

/// Cities ranked by number of distinct cuisines
pub fn cuisine_variety_per_city(
    records: &[CanonicalRecord],
    filter: &FilterSpec,
) -> Vec<Ranked<usize>> {
    let mut cuisines: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for record in in_countries(records, filter) {
        cuisines
            .entry(record.city.as_str())
            .or_default()
            .insert(record.cuisine.as_str());
    }

    let series = cuisines
        .into_iter()
        .map(|(city, distinct)| Ranked::new(city, distinct.len()))
        .collect();
    top_cities(series, filter.city_limit)
}
