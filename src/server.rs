use axum::{
    extract::{Query, State},
    http::Method,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use hyper::Server;
use serde::Deserialize;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::report::{self, CitiesReport, CountriesReport, CuisinesReport, OverviewReport};
use crate::types::FilterSpec;

/// Shared, read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset: Dataset,
    pub defaults: FilterSpec,
    pub overview_defaults: FilterSpec,
}

impl AppState {
    pub fn new(dataset: Dataset, defaults: FilterSpec) -> Self {
        Self {
            dataset,
            overview_defaults: defaults.clone(),
            defaults,
        }
    }

    pub fn with_overview_defaults(mut self, overview_defaults: FilterSpec) -> Self {
        self.overview_defaults = overview_defaults;
        self
    }
}

/// Query string accepted by every page endpoint.
/// Selections are comma-separated; an absent selection means "all".
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub countries: Option<String>,
    pub cuisines: Option<String>,
    pub cities: Option<usize>,
    pub restaurants: Option<usize>,
}

impl FilterParams {
    /// Overlay the request parameters on a page's default filters
    pub fn into_filter(self, base: &FilterSpec) -> FilterSpec {
        let mut filter = base.clone();
        if let Some(countries) = self.countries {
            filter = filter.with_countries(split_list(&countries));
        }
        if let Some(cuisines) = self.cuisines {
            filter = filter.with_cuisines(split_list(&cuisines));
        }
        if let Some(cities) = self.cities {
            filter = filter.with_city_limit(cities);
        }
        if let Some(restaurants) = self.restaurants {
            filter = filter.with_restaurant_limit(restaurants);
        }
        filter
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let info = state.dataset.info();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fome-zero-dashboard",
        "version": env!("CARGO_PKG_VERSION"),
        "dataset": {
            "checksum": info.checksum,
            "records": info.records,
            "loaded_at": info.loaded_at,
        }
    }))
}

async fn overview(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Json<OverviewReport> {
    let filter = params.into_filter(&state.overview_defaults);
    debug!(?filter, "Overview requested");
    Json(report::overview(&state.dataset, &filter))
}

async fn countries(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Json<CountriesReport> {
    let filter = params.into_filter(&state.defaults);
    debug!(?filter, "Countries requested");
    Json(report::countries(&state.dataset, &filter))
}

async fn cities(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Json<CitiesReport> {
    let filter = params.into_filter(&state.defaults);
    debug!(?filter, "Cities requested");
    Json(report::cities(&state.dataset, &filter))
}

async fn cuisines(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Json<CuisinesReport> {
    let filter = params.into_filter(&state.defaults);
    debug!(?filter, "Cuisines requested");
    Json(report::cuisines(&state.dataset, &filter))
}

/// Create the HTTP router with all read-only dashboard routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/overview", get(overview))
        .route("/api/countries", get(countries))
        .route("/api/cities", get(cities))
        .route("/api/cuisines", get(cuisines))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Dashboard API listening on http://localhost:{port}");
    println!("🚀 Dashboard API running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("📊 Pages:        http://localhost:{port}/api/{{overview,countries,cities,cuisines}}");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_overlay_defaults() {
        let base = FilterSpec::new().with_countries(["India"]).with_city_limit(5);
        let params = FilterParams {
            countries: None,
            cuisines: Some("Italian, Pizza,".to_string()),
            cities: Some(250),
            restaurants: None,
        };

        let filter = params.into_filter(&base);
        assert!(filter.countries.as_ref().unwrap().contains("India"));
        assert_eq!(filter.cuisines.as_ref().unwrap().len(), 2);
        assert_eq!(filter.city_limit, 100);
        assert_eq!(filter.restaurant_limit, base.restaurant_limit);
    }

    #[test]
    fn test_empty_selection_param() {
        let params = FilterParams {
            countries: Some(String::new()),
            ..Default::default()
        };
        let filter = params.into_filter(&FilterSpec::default());
        assert_eq!(filter.countries.unwrap().len(), 0);
    }
}
