//! Page-level view models: one struct per dashboard page, each assembled
//! from independent aggregation queries over the shared dataset.

use serde::Serialize;
use std::time::Instant;
use tracing::warn;

use crate::analytics::{self, CountryMetric, MetricValue, RatingBand};
use crate::dataset::Dataset;
use crate::error::DashboardError;
use crate::metrics;
use crate::types::{FilterSpec, GlobalCounters, MapMarker, Ranked, RestaurantRank, SortOrder};

/// Dashboard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Overview,
    Countries,
    Cities,
    Cuisines,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Countries => "countries",
            Page::Cities => "cities",
            Page::Cuisines => "cuisines",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub counters: GlobalCounters,
    pub markers: Vec<MapMarker>,
}

/// Top country per metric; an entry is `None` when nothing is left to rank
#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    pub most_cities: Option<Ranked<MetricValue>>,
    pub most_votes: Option<Ranked<MetricValue>>,
    pub most_cuisines: Option<Ranked<MetricValue>>,
    pub best_mean_rating: Option<Ranked<MetricValue>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountriesReport {
    pub leaderboard: Leaderboard,
    pub cities: Vec<Ranked<MetricValue>>,
    pub restaurants: Vec<Ranked<MetricValue>>,
    pub votes: Vec<Ranked<MetricValue>>,
    pub cuisines: Vec<Ranked<MetricValue>>,
    pub mean_rating: Vec<Ranked<MetricValue>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CitiesReport {
    pub restaurants: Vec<Ranked<usize>>,
    pub high_rated: Vec<Ranked<usize>>,
    pub low_rated: Vec<Ranked<usize>>,
    pub cuisine_variety: Vec<Ranked<usize>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CuisinesReport {
    pub top_restaurants: Vec<RestaurantRank>,
    pub best_cuisines: Vec<Ranked<f64>>,
    pub worst_cuisines: Vec<Ranked<f64>>,
}

/// Any page, for callers that pick the page at runtime
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PageReport {
    Overview(OverviewReport),
    Countries(CountriesReport),
    Cities(CitiesReport),
    Cuisines(CuisinesReport),
}

/// Every page for one set of filters
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub filters: FilterSpec,
    pub overview: OverviewReport,
    pub countries: CountriesReport,
    pub cities: CitiesReport,
    pub cuisines: CuisinesReport,
}

pub fn overview(dataset: &Dataset, filter: &FilterSpec) -> OverviewReport {
    timed(Page::Overview, || OverviewReport {
        counters: analytics::global_counters(dataset.records(), filter),
        markers: analytics::map_markers(dataset.records(), filter),
    })
}

pub fn countries(dataset: &Dataset, filter: &FilterSpec) -> CountriesReport {
    timed(Page::Countries, || {
        let records = dataset.records();
        let series = |metric| analytics::country_series(records, filter, metric);
        CountriesReport {
            leaderboard: leaderboard(dataset, filter),
            cities: series(CountryMetric::DistinctCities),
            restaurants: series(CountryMetric::Restaurants),
            votes: series(CountryMetric::TotalVotes),
            cuisines: series(CountryMetric::DistinctCuisines),
            mean_rating: series(CountryMetric::MeanRating),
        }
    })
}

pub fn cities(dataset: &Dataset, filter: &FilterSpec) -> CitiesReport {
    timed(Page::Cities, || {
        let records = dataset.records();
        CitiesReport {
            restaurants: analytics::restaurants_per_city(records, filter),
            high_rated: analytics::rated_cities(records, filter, RatingBand::High),
            low_rated: analytics::rated_cities(records, filter, RatingBand::Low),
            cuisine_variety: analytics::cuisine_variety_per_city(records, filter),
        }
    })
}

pub fn cuisines(dataset: &Dataset, filter: &FilterSpec) -> CuisinesReport {
    timed(Page::Cuisines, || {
        let records = dataset.records();
        CuisinesReport {
            top_restaurants: analytics::top_restaurants(records, filter),
            best_cuisines: analytics::cuisine_quality_ranking(records, filter, SortOrder::Descending),
            worst_cuisines: analytics::cuisine_quality_ranking(records, filter, SortOrder::Ascending),
        }
    })
}

pub fn page(dataset: &Dataset, page: Page, filter: &FilterSpec) -> PageReport {
    match page {
        Page::Overview => PageReport::Overview(overview(dataset, filter)),
        Page::Countries => PageReport::Countries(countries(dataset, filter)),
        Page::Cities => PageReport::Cities(cities(dataset, filter)),
        Page::Cuisines => PageReport::Cuisines(cuisines(dataset, filter)),
    }
}

/// All four pages. The cuisine selection only narrows the cuisines page.
pub fn snapshot(dataset: &Dataset, filter: &FilterSpec) -> DashboardSnapshot {
    DashboardSnapshot {
        filters: filter.clone(),
        overview: overview(dataset, filter),
        countries: countries(dataset, filter),
        cities: cities(dataset, filter),
        cuisines: cuisines(dataset, filter),
    }
}

/// Leaderboard entries are independent: one empty metric never hides another
pub fn leaderboard(dataset: &Dataset, filter: &FilterSpec) -> Leaderboard {
    let top = |metric: CountryMetric| {
        match analytics::top_country(dataset.records(), filter, metric) {
            Ok(entry) => Some(entry),
            Err(DashboardError::EmptyResultSet(name)) => {
                warn!(metric = %name, "No country left to rank");
                metrics::query::record_empty(metric.as_str());
                None
            }
            Err(e) => {
                warn!(metric = metric.as_str(), error = %e, "Leaderboard query failed");
                None
            }
        }
    };

    Leaderboard {
        most_cities: top(CountryMetric::DistinctCities),
        most_votes: top(CountryMetric::TotalVotes),
        most_cuisines: top(CountryMetric::DistinctCuisines),
        best_mean_rating: top(CountryMetric::MeanRating),
    }
}

fn timed<T>(page: Page, build: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let report = build();
    metrics::query::record_request(page.as_str(), started.elapsed());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::fixtures::sample;

    #[test]
    fn test_leaderboard_on_full_dataset() {
        let dataset = Dataset::from_records(sample());
        let board = leaderboard(&dataset, &FilterSpec::default());

        assert_eq!(board.most_cities.unwrap().label, "Brazil");
        assert_eq!(board.most_votes.unwrap().value, MetricValue::Count(180));
        assert_eq!(board.best_mean_rating.unwrap().label, "England");
    }

    #[test]
    fn test_leaderboard_is_empty_not_an_error() {
        let dataset = Dataset::from_records(sample());
        let filter = FilterSpec::new().with_countries(Vec::<String>::new());
        let report = countries(&dataset, &filter);

        assert!(report.leaderboard.most_cities.is_none());
        assert!(report.leaderboard.most_votes.is_none());
        assert!(report.votes.is_empty());
    }

    #[test]
    fn test_cuisine_selection_only_narrows_cuisines_page() {
        let dataset = Dataset::from_records(sample());
        let filter = FilterSpec::new().with_cuisines(["Italian"]);
        let snapshot = snapshot(&dataset, &filter);

        assert_eq!(snapshot.overview.counters.restaurants, 7);
        assert_eq!(snapshot.cuisines.top_restaurants.len(), 2);
        assert_eq!(snapshot.cuisines.best_cuisines.len(), 1);
    }

    #[test]
    fn test_page_dispatch() {
        let dataset = Dataset::from_records(sample());
        let report = page(&dataset, Page::Cities, &FilterSpec::default());
        assert!(matches!(report, PageReport::Cities(_)));
    }

    #[test]
    fn test_snapshot_serializes() {
        let dataset = Dataset::from_records(sample());
        let json = serde_json::to_value(snapshot(&dataset, &FilterSpec::default())).unwrap();
        assert_eq!(json["overview"]["counters"]["votes"], 242);
        assert_eq!(json["countries"]["votes"][0]["label"], "India");
        assert_eq!(json["countries"]["votes"][0]["value"], 180);
    }
}
