pub mod analytics;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod server;
pub mod types;

pub use dataset::Dataset;
pub use error::{DashboardError, Result};
pub use types::{CanonicalRecord, FilterSpec};
