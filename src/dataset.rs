use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::error::Result;
use crate::metrics;
use crate::pipeline::{normalize_with_stats, read_raw_table};
use crate::types::CanonicalRecord;

/// The normalized dataset, loaded once and shared read-only between views.
/// Cloning only bumps a reference count.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[CanonicalRecord]>,
    info: Arc<DatasetInfo>,
}

/// Where a dataset came from and what it contains
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub source: Option<PathBuf>,
    /// Hex SHA-256 of the source bytes
    pub checksum: String,
    pub loaded_at: DateTime<Utc>,
    pub rows_read: usize,
    pub duplicates_dropped: usize,
    pub records: usize,
}

impl Dataset {
    /// Read, checksum and normalize a delimited file
    pub fn load(path: &Path, delimiter: u8) -> Result<Self> {
        let bytes = fs::read(path)?;
        let mut dataset = Self::from_bytes(&bytes, delimiter)?;
        if let Some(info) = Arc::get_mut(&mut dataset.info) {
            info.source = Some(path.to_path_buf());
        }
        info!(
            source = %path.display(),
            checksum = %dataset.info.checksum,
            records = dataset.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    pub fn from_bytes(bytes: &[u8], delimiter: u8) -> Result<Self> {
        let started = Instant::now();
        let checksum = hex::encode(Sha256::digest(bytes));

        let table = read_raw_table(bytes, delimiter)?;
        let normalized = normalize_with_stats(&table)?;
        metrics::normalize::record_run(&normalized.stats, started.elapsed());

        let info = DatasetInfo {
            source: None,
            checksum,
            loaded_at: Utc::now(),
            rows_read: normalized.stats.rows_read,
            duplicates_dropped: normalized.stats.duplicates_dropped,
            records: normalized.stats.records,
        };

        Ok(Self {
            records: normalized.records.into(),
            info: Arc::new(info),
        })
    }

    /// Wrap records that are already canonical
    pub fn from_records(records: Vec<CanonicalRecord>) -> Self {
        let count = records.len();
        let info = DatasetInfo {
            source: None,
            checksum: String::new(),
            loaded_at: Utc::now(),
            rows_read: count,
            duplicates_dropped: 0,
            records: count,
        };
        Self {
            records: records.into(),
            info: Arc::new(info),
        }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Restaurant ID,Restaurant Name,Country Code,City,Cuisines,Aggregate rating,Votes,Currency,Latitude,Longitude,Switch to order menu
1,Cantina,30,Rio,\"Italian, Pizza\",4.5,10,Brazilian Real(R$),-22.9,-43.2,No
2,Boteco,30,Rio,Italian,3.0,5,Brazilian Real(R$),-22.9,-43.1,No
2,Boteco,30,Rio,Italian,3.0,5,Brazilian Real(R$),-22.9,-43.1,No
";

    #[test]
    fn test_from_bytes_normalizes_and_checksums() {
        let dataset = Dataset::from_bytes(CSV.as_bytes(), b',').unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.info().rows_read, 3);
        assert_eq!(dataset.info().duplicates_dropped, 1);
        assert_eq!(dataset.info().checksum.len(), 64);
    }

    #[test]
    fn test_same_bytes_same_checksum() {
        let a = Dataset::from_bytes(CSV.as_bytes(), b',').unwrap();
        let b = Dataset::from_bytes(CSV.as_bytes(), b',').unwrap();
        assert_eq!(a.info().checksum, b.info().checksum);
    }

    #[test]
    fn test_clones_share_records() {
        let dataset = Dataset::from_bytes(CSV.as_bytes(), b',').unwrap();
        let clone = dataset.clone();
        assert!(std::ptr::eq(dataset.records(), clone.records()));
    }
}
