// Data preparation pipeline: ingestion of the delimited source, then normalization

pub mod ingestion;
pub mod normalize;

// Re-export key types and functions from each stage
pub use ingestion::{read_raw_file, read_raw_table, RawTable};
pub use normalize::{normalize, normalize_with_stats, NormalizationStats, Normalized};
