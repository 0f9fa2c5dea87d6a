//! Dataset normalization: raw rows in, canonical restaurant records out.
//!
//! Column labels are canonicalized, the cuisine list is collapsed to its
//! first entry, unused columns are pruned, the country is resolved from its
//! code and exact duplicates are dropped keeping the first occurrence. Any
//! schema or lookup failure aborts the whole run; no partial output is
//! ever returned.

pub mod columns;

use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, info};

use crate::constants::*;
use crate::error::{DashboardError, Result};
use crate::pipeline::ingestion::RawTable;
use crate::types::CanonicalRecord;
pub use columns::{canonical_field_name, ColumnIndex};

/// Counters describing a single normalization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    pub rows_read: usize,
    pub duplicates_dropped: usize,
    pub records: usize,
}

/// Normalization output together with its run counters
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<CanonicalRecord>,
    pub stats: NormalizationStats,
}

/// Normalize a raw table into canonical records, re-indexed from zero
pub fn normalize(table: &RawTable) -> Result<Vec<CanonicalRecord>> {
    normalize_with_stats(table).map(|normalized| normalized.records)
}

pub fn normalize_with_stats(table: &RawTable) -> Result<Normalized> {
    let columns = ColumnIndex::from_headers(&table.headers)?;

    let unused = columns.unused();
    if !unused.is_empty() {
        let flagged: Vec<&str> = unused
            .iter()
            .copied()
            .filter(|name| PRUNED_COLUMNS.contains(name))
            .collect();
        debug!(pruned = ?unused, flagged = ?flagged, "Pruning columns");
    }

    let mut seen = HashSet::with_capacity(table.rows.len());
    let mut records = Vec::with_capacity(table.rows.len());
    let mut duplicates_dropped = 0;

    for (row, cells) in table.rows.iter().enumerate() {
        let record = RowReader::new(&columns, cells, row).read_record()?;
        if seen.insert(RecordKey::of(&record)) {
            records.push(record);
        } else {
            duplicates_dropped += 1;
        }
    }

    let stats = NormalizationStats {
        rows_read: table.rows.len(),
        duplicates_dropped,
        records: records.len(),
    };
    info!(
        rows_read = stats.rows_read,
        duplicates_dropped = stats.duplicates_dropped,
        records = stats.records,
        "Normalized dataset"
    );

    Ok(Normalized { records, stats })
}

/// Keep only the first entry of a comma-separated cuisine list.
/// A missing value becomes the `"nan"` placeholder category.
pub fn collapse_cuisine(raw: &str) -> String {
    let first = raw.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        MISSING_CUISINE.to_string()
    } else {
        first.to_string()
    }
}

/// Typed access to the cells of one raw row
struct RowReader<'a> {
    columns: &'a ColumnIndex,
    cells: &'a [String],
    row: usize,
}

impl<'a> RowReader<'a> {
    fn new(columns: &'a ColumnIndex, cells: &'a [String], row: usize) -> Self {
        Self {
            columns,
            cells,
            row,
        }
    }

    fn read_record(&self) -> Result<CanonicalRecord> {
        let country_code: i64 = self.parse(COL_COUNTRY_CODE)?;
        let country = country_name(country_code).ok_or(DashboardError::UnknownCountryCode {
            code: country_code,
            row: self.row,
        })?;

        Ok(CanonicalRecord {
            restaurant_id: self.parse(COL_RESTAURANT_ID)?,
            restaurant_name: self.text(COL_RESTAURANT_NAME)?.to_string(),
            country_code,
            country: country.to_string(),
            city: self.text(COL_CITY)?.to_string(),
            cuisine: collapse_cuisine(self.text(COL_CUISINES)?),
            aggregate_rating: self.parse_finite(COL_AGGREGATE_RATING)?,
            votes: self.parse(COL_VOTES)?,
            currency: self.text(COL_CURRENCY)?.to_string(),
            latitude: self.parse_finite(COL_LATITUDE)?,
            longitude: self.parse_finite(COL_LONGITUDE)?,
        })
    }

    fn text(&self, column: &str) -> Result<&'a str> {
        let position = self
            .columns
            .position(column)
            .ok_or_else(|| DashboardError::MissingColumn(column.to_string()))?;
        self.cells
            .get(position)
            .map(String::as_str)
            .ok_or_else(|| DashboardError::MissingColumn(column.to_string()))
    }

    fn parse<T: FromStr>(&self, column: &str) -> Result<T> {
        let value = self.text(column)?;
        value.parse().map_err(|_| self.invalid(column, value))
    }

    // `f64::from_str` accepts "nan" and "inf", which no column may hold
    fn parse_finite(&self, column: &str) -> Result<f64> {
        let value: f64 = self.parse(column)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(self.invalid(column, self.text(column)?))
        }
    }

    fn invalid(&self, column: &str, value: &str) -> DashboardError {
        DashboardError::InvalidValue {
            column: column.to_string(),
            row: self.row,
            value: value.to_string(),
        }
    }
}

/// Identity of a canonical record across all of its source-derived fields
#[derive(Debug, PartialEq, Eq, Hash)]
struct RecordKey {
    restaurant_id: i64,
    restaurant_name: String,
    country_code: i64,
    city: String,
    cuisine: String,
    aggregate_rating: u64,
    votes: u64,
    currency: String,
    latitude: u64,
    longitude: u64,
}

impl RecordKey {
    fn of(record: &CanonicalRecord) -> Self {
        Self {
            restaurant_id: record.restaurant_id,
            restaurant_name: record.restaurant_name.clone(),
            country_code: record.country_code,
            city: record.city.clone(),
            cuisine: record.cuisine.clone(),
            aggregate_rating: record.aggregate_rating.to_bits(),
            votes: record.votes,
            currency: record.currency.clone(),
            latitude: record.latitude.to_bits(),
            longitude: record.longitude.to_bits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADERS: [&str; 11] = [
        "Restaurant ID",
        "Restaurant Name",
        "Country Code",
        "City",
        "Cuisines",
        "Aggregate rating",
        "Votes",
        "Currency",
        "Latitude",
        "Longitude",
        "Switch to order menu",
    ];

    fn row(id: &str, code: &str, cuisines: &str, rating: &str) -> Vec<String> {
        [
            id,
            "Cantina",
            code,
            "Rio de Janeiro",
            cuisines,
            rating,
            "12",
            "Brazilian Real(R$)",
            "-22.9",
            "-43.2",
            "No",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn table(rows: Vec<Vec<String>>) -> RawTable {
        RawTable::new(HEADERS.iter().map(|s| s.to_string()).collect(), rows)
    }

    #[test]
    fn test_normalizes_a_row() {
        let records = normalize(&table(vec![row("7", "30", "Italian, Pizza", "4.5")])).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.restaurant_id, 7);
        assert_eq!(record.country, "Brazil");
        assert_eq!(record.cuisine, "Italian");
        assert_eq!(record.aggregate_rating, 4.5);
        assert_eq!(record.votes, 12);
    }

    #[test]
    fn test_cuisine_collapse() {
        assert_eq!(collapse_cuisine("Italian, Pizza, Cafe"), "Italian");
        assert_eq!(collapse_cuisine("Sushi"), "Sushi");
        assert_eq!(collapse_cuisine(""), "nan");
        assert_eq!(collapse_cuisine("nan"), "nan");
        assert!(!collapse_cuisine(" , Pizza").contains(','));
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let normalized = normalize_with_stats(&table(vec![
            row("1", "30", "Italian", "4.5"),
            row("2", "30", "Italian", "3.0"),
            row("1", "30", "Italian, Pizza", "4.5"),
        ]))
        .unwrap();

        let ids: Vec<i64> = normalized.records.iter().map(|r| r.restaurant_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(normalized.stats.rows_read, 3);
        assert_eq!(normalized.stats.duplicates_dropped, 1);
        assert_eq!(normalized.stats.records, 2);
    }

    #[test]
    fn test_unknown_country_code_aborts() {
        let result = normalize(&table(vec![
            row("1", "30", "Italian", "4.5"),
            row("2", "999", "Italian", "4.0"),
        ]));

        match result {
            Err(DashboardError::UnknownCountryCode { code, row }) => {
                assert_eq!(code, 999);
                assert_eq!(row, 1);
            }
            other => panic!("expected UnknownCountryCode, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_rating_is_invalid() {
        for rating in ["abc", "nan", ""] {
            let result = normalize(&table(vec![row("1", "30", "Italian", rating)]));
            assert!(
                matches!(result, Err(DashboardError::InvalidValue { ref column, .. }) if column == "aggregate_rating"),
                "rating {:?} should be rejected",
                rating
            );
        }
    }

    #[test]
    fn test_negative_votes_are_invalid() {
        let mut cells = row("1", "30", "Italian", "4.5");
        cells[6] = "-3".to_string();
        let result = normalize(&table(vec![cells]));
        assert!(matches!(result, Err(DashboardError::InvalidValue { .. })));
    }

    #[test]
    fn test_missing_column_aborts() {
        let headers = HEADERS[..9].iter().map(|s| s.to_string()).collect();
        let result = normalize(&RawTable::new(headers, vec![]));
        assert!(matches!(result, Err(DashboardError::MissingColumn(ref c)) if c == "longitude"));
    }

    #[test]
    fn test_already_canonical_headers() {
        let headers = HEADERS.iter().map(|h| canonical_field_name(h)).collect();
        let records = normalize(&RawTable::new(headers, vec![row("3", "1", "", "2.0")])).unwrap();

        assert_eq!(records[0].country, "India");
        assert_eq!(records[0].cuisine, "nan");
    }
}
