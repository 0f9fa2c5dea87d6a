//! Aggregation engine: read-only grouped summaries over canonical records.
//!
//! Every query takes the canonical records plus a [`FilterSpec`] and returns
//! an owned result; inputs are never mutated. Groups are visited in key
//! order, and all rankings use a stable sort so ties keep that order.

pub mod cities;
pub mod countries;
pub mod cuisines;
pub mod overview;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::types::{CanonicalRecord, FilterSpec, Ranked, SortOrder};

pub use cities::{cuisine_variety_per_city, rated_cities, restaurants_per_city, RatingBand};
pub use countries::{country_series, top_country, CountryMetric};
pub use cuisines::{cuisine_quality_ranking, top_restaurants};
pub use overview::{global_counters, map_markers};

/// A metric value: either a count/sum or a mean
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Mean(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(count) => write!(f, "{}", count),
            MetricValue::Mean(mean) => write!(f, "{:.2}", mean),
        }
    }
}

/// Records that pass the country selection only
pub(crate) fn in_countries<'a>(
    records: &'a [CanonicalRecord],
    filter: &'a FilterSpec,
) -> impl Iterator<Item = &'a CanonicalRecord> + 'a {
    records.iter().filter(move |record| filter.matches_country(record))
}

/// Records that pass both the country and the cuisine selection
pub(crate) fn selected<'a>(
    records: &'a [CanonicalRecord],
    filter: &'a FilterSpec,
) -> impl Iterator<Item = &'a CanonicalRecord> + 'a {
    records.iter().filter(move |record| filter.matches(record))
}

/// Stable sort of a ranked series by value
pub(crate) fn rank<T: PartialOrd>(series: &mut [Ranked<T>], order: SortOrder) {
    series.sort_by(|a, b| {
        let ordering = a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// Keep exactly the first `limit` rows, or all of them if there are fewer
pub(crate) fn take<T>(mut rows: Vec<T>, limit: usize) -> Vec<T> {
    rows.truncate(limit);
    rows
}

pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::constants::country_name;
    use crate::types::CanonicalRecord;

    pub fn record(
        id: i64,
        country_code: i64,
        city: &str,
        cuisine: &str,
        rating: f64,
        votes: u64,
    ) -> CanonicalRecord {
        CanonicalRecord {
            restaurant_id: id,
            restaurant_name: format!("Restaurant {}", id),
            country_code,
            country: country_name(country_code).unwrap_or("Unknown").to_string(),
            city: city.to_string(),
            cuisine: cuisine.to_string(),
            aggregate_rating: rating,
            votes,
            currency: "Dollar($)".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// Brazil: Rio (2), São Paulo (1); India: New Delhi (3); England: London (1)
    pub fn sample() -> Vec<CanonicalRecord> {
        vec![
            record(1, 30, "Rio", "Italian", 4.5, 10),
            record(2, 30, "Rio", "Italian", 3.0, 5),
            record(3, 30, "São Paulo", "Brazilian", 4.9, 40),
            record(4, 1, "New Delhi", "North Indian", 2.1, 100),
            record(5, 1, "New Delhi", "Cafe", 4.2, 80),
            record(6, 1, "New Delhi", "nan", 0.0, 0),
            record(7, 215, "London", "Others", 4.9, 7),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_stable() {
        let mut series = vec![
            Ranked::new("a", 1u64),
            Ranked::new("b", 3),
            Ranked::new("c", 1),
            Ranked::new("d", 3),
        ];
        rank(&mut series, SortOrder::Descending);
        let labels: Vec<&str> = series.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "d", "a", "c"]);

        rank(&mut series, SortOrder::Ascending);
        let labels: Vec<&str> = series.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_take_is_exact_and_clamped() {
        assert_eq!(take(vec![1, 2, 3], 0), Vec::<i32>::new());
        assert_eq!(take(vec![1, 2, 3], 2), vec![1, 2]);
        assert_eq!(take(vec![1, 2, 3], 10), vec![1, 2, 3]);
    }

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::Count(15).to_string(), "15");
        assert_eq!(MetricValue::Mean(3.756).to_string(), "3.76");
    }
}
