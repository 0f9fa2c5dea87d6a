use heck::ToSnakeCase;
use std::collections::HashMap;

use crate::constants::REQUIRED_COLUMNS;
use crate::error::{DashboardError, Result};

/// Convert a source column label to its canonical form.
///
/// Words are split on case and delimiter boundaries and rejoined in
/// lowercase with `_`, so "Restaurant Name", "RestaurantName" and
/// "restaurant_name" all map to `restaurant_name`.
pub fn canonical_field_name(label: &str) -> String {
    label.trim().to_snake_case()
}

/// Positions of the canonical columns within a raw row
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
    names: Vec<String>,
}

impl ColumnIndex {
    /// Canonicalize every header and check the required columns are present.
    /// If two labels canonicalize to the same name the first one wins.
    pub fn from_headers(headers: &[String]) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(|h| canonical_field_name(h)).collect();

        let mut positions = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            positions.entry(name.clone()).or_insert(position);
        }

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !positions.contains_key(**column))
        {
            return Err(DashboardError::MissingColumn(missing.to_string()));
        }

        Ok(Self { positions, names })
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    /// Canonical names in source order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Canonical columns that no canonical record field draws from
    pub fn unused(&self) -> Vec<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| !REQUIRED_COLUMNS.contains(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        assert_eq!(canonical_field_name("Restaurant Name"), "restaurant_name");
        assert_eq!(canonical_field_name("RestaurantName"), "restaurant_name");
        assert_eq!(canonical_field_name("Restaurant ID"), "restaurant_id");
        assert_eq!(canonical_field_name("  Aggregate rating "), "aggregate_rating");
        assert_eq!(canonical_field_name("Average Cost for two"), "average_cost_for_two");
        assert_eq!(canonical_field_name("Switch to order menu"), "switch_to_order_menu");
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        for label in ["Restaurant Name", "Country Code", "Has Online delivery", "Votes"] {
            let once = canonical_field_name(label);
            assert_eq!(canonical_field_name(&once), once);
        }
    }

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_missing_required_column() {
        let result = ColumnIndex::from_headers(&headers(&["Restaurant ID", "City"]));
        match result {
            Err(DashboardError::MissingColumn(column)) => assert_eq!(column, "restaurant_name"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_positions_and_unused_columns() {
        let index = ColumnIndex::from_headers(&headers(&[
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
        ]))
        .unwrap();

        assert_eq!(index.position("city"), Some(3));
        assert_eq!(index.position("longitude"), Some(9));
        assert_eq!(index.unused(), vec!["switch_to_order_menu"]);
    }
}
