use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::{in_countries, mean, rank, MetricValue};
use crate::error::{DashboardError, Result};
use crate::types::{CanonicalRecord, FilterSpec, Ranked, SortOrder};

/// Per-country metrics available as bar series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryMetric {
    DistinctCities,
    Restaurants,
    TotalVotes,
    DistinctCuisines,
    MeanRating,
}

impl CountryMetric {
    /// Metrics reported on the country leaderboard
    pub const LEADERBOARD: [CountryMetric; 4] = [
        CountryMetric::DistinctCities,
        CountryMetric::TotalVotes,
        CountryMetric::DistinctCuisines,
        CountryMetric::MeanRating,
    ];

    pub const ALL: [CountryMetric; 5] = [
        CountryMetric::DistinctCities,
        CountryMetric::Restaurants,
        CountryMetric::TotalVotes,
        CountryMetric::DistinctCuisines,
        CountryMetric::MeanRating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CountryMetric::DistinctCities => "distinct_cities",
            CountryMetric::Restaurants => "restaurants",
            CountryMetric::TotalVotes => "total_votes",
            CountryMetric::DistinctCuisines => "distinct_cuisines",
            CountryMetric::MeanRating => "mean_rating",
        }
    }
}

#[derive(Default)]
struct CountryGroup<'a> {
    cities: HashSet<&'a str>,
    cuisines: HashSet<&'a str>,
    restaurants: usize,
    votes: u64,
    rating_sum: f64,
}

impl<'a> CountryGroup<'a> {
    fn add(&mut self, record: &'a CanonicalRecord) {
        self.cities.insert(&record.city);
        self.cuisines.insert(&record.cuisine);
        self.restaurants += 1;
        self.votes += record.votes;
        self.rating_sum += record.aggregate_rating;
    }

    fn value(&self, metric: CountryMetric) -> MetricValue {
        match metric {
            CountryMetric::DistinctCities => MetricValue::Count(self.cities.len() as u64),
            CountryMetric::Restaurants => MetricValue::Count(self.restaurants as u64),
            CountryMetric::TotalVotes => MetricValue::Count(self.votes),
            CountryMetric::DistinctCuisines => MetricValue::Count(self.cuisines.len() as u64),
            CountryMetric::MeanRating => MetricValue::Mean(mean(self.rating_sum, self.restaurants)),
        }
    }
}

/// Full ranked (country, value) series for one metric, highest first
pub fn country_series(
    records: &[CanonicalRecord],
    filter: &FilterSpec,
    metric: CountryMetric,
) -> Vec<Ranked<MetricValue>> {
    let mut groups: BTreeMap<&str, CountryGroup> = BTreeMap::new();
    for record in in_countries(records, filter) {
        groups.entry(record.country.as_str()).or_default().add(record);
    }

    let mut series: Vec<Ranked<MetricValue>> = groups
        .iter()
        .map(|(country, group)| Ranked::new(*country, group.value(metric)))
        .collect();
    rank(&mut series, SortOrder::Descending);

    debug!(metric = metric.as_str(), countries = series.len(), "Computed country series");
    series
}

/// The single top country for a metric; fails when no country is left to rank
pub fn top_country(
    records: &[CanonicalRecord],
    filter: &FilterSpec,
    metric: CountryMetric,
) -> Result<Ranked<MetricValue>> {
    country_series(records, filter, metric)
        .into_iter()
        .next()
        .ok_or_else(|| DashboardError::EmptyResultSet(metric.as_str().to_string()))
}
