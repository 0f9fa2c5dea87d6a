use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use super::{mean, rank, selected, take};
use crate::constants::{CATCH_ALL_CUISINE, CUISINE_RANKING_ROWS, MISSING_CUISINE};
use crate::types::{CanonicalRecord, FilterSpec, Ranked, RestaurantRank, SortOrder};

/// Cuisines ranked by mean rating, at most 100 rows.
/// The `"nan"` and `"Others"` placeholder categories are left out.
pub fn cuisine_quality_ranking(
    records: &[CanonicalRecord],
    filter: &FilterSpec,
    order: SortOrder,
) -> Vec<Ranked<f64>> {
    let mut ratings: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in selected(records, filter) {
        if record.cuisine == MISSING_CUISINE || record.cuisine == CATCH_ALL_CUISINE {
            continue;
        }
        let (sum, count) = ratings.entry(record.cuisine.as_str()).or_default();
        *sum += record.aggregate_rating;
        *count += 1;
    }

    let mut series: Vec<Ranked<f64>> = ratings
        .into_iter()
        .map(|(cuisine, (sum, count))| Ranked::new(cuisine, mean(sum, count)))
        .collect();
    rank(&mut series, order);

    debug!(?order, cuisines = series.len(), "Computed cuisine ranking");
    take(series, CUISINE_RANKING_ROWS)
}

/// Highest rated restaurants; equal ratings go to the lower id first
pub fn top_restaurants(records: &[CanonicalRecord], filter: &FilterSpec) -> Vec<RestaurantRank> {
    let mut ranked: Vec<&CanonicalRecord> = selected(records, filter).collect();
    ranked.sort_by(|a, b| {
        b.aggregate_rating
            .partial_cmp(&a.aggregate_rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.restaurant_id.cmp(&b.restaurant_id))
    });

    ranked
        .into_iter()
        .take(filter.restaurant_limit)
        .map(|record| RestaurantRank {
            restaurant_id: record.restaurant_id,
            restaurant_name: record.restaurant_name.clone(),
            aggregate_rating: record.aggregate_rating,
            currency: record.currency.clone(),
        })
        .collect()
}
