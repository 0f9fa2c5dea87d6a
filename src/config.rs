use serde::Deserialize;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants::MAX_VIEW_LIMIT;
use crate::error::{DashboardError, Result};
use crate::types::FilterSpec;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub server: ServerConfig,
    pub filters: FiltersConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Single-byte field delimiter
    pub delimiter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dataset/zomato.csv"),
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            metrics_port: 9898,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    pub city_limit: usize,
    pub restaurant_limit: usize,
    /// Countries preselected on the overview page; all countries when absent
    pub overview_countries: Option<Vec<String>>,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            city_limit: 10,
            restaurant_limit: 10,
            overview_countries: None,
        }
    }
}

impl Config {
    /// Load from `FOME_ZERO_CONFIG` (or `config.toml`), then apply environment overrides.
    /// A missing file means defaults.
    pub fn load() -> Result<Self> {
        let path = env::var("FOME_ZERO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load a specific file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(DashboardError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = env::var("FOME_ZERO_DATASET") {
            self.dataset.path = PathBuf::from(path);
        }
        if let Ok(port) = env::var("FOME_ZERO_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| DashboardError::Config(format!("Invalid FOME_ZERO_PORT '{}'", port)))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.delimiter()?;
        if self.filters.city_limit > MAX_VIEW_LIMIT || self.filters.restaurant_limit > MAX_VIEW_LIMIT {
            return Err(DashboardError::Config(format!(
                "Filter limits must be between 0 and {}",
                MAX_VIEW_LIMIT
            )));
        }
        Ok(())
    }

    /// The dataset delimiter as the byte the CSV reader expects
    pub fn delimiter(&self) -> Result<u8> {
        let delimiter = self.dataset.delimiter;
        if delimiter.is_ascii() {
            Ok(delimiter as u8)
        } else {
            Err(DashboardError::Config(format!(
                "Delimiter '{}' is not a single-byte character",
                delimiter
            )))
        }
    }

    /// Filters a page starts from before any user selection
    pub fn default_filters(&self) -> FilterSpec {
        FilterSpec::new()
            .with_city_limit(self.filters.city_limit)
            .with_restaurant_limit(self.filters.restaurant_limit)
    }

    /// Overview filters, with the configured country preselection if any
    pub fn overview_filters(&self) -> FilterSpec {
        match &self.filters.overview_countries {
            Some(countries) => self.default_filters().with_countries(countries.iter().cloned()),
            None => self.default_filters(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = Config::from_file(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.delimiter().unwrap(), b',');
        assert_eq!(config.default_filters(), FilterSpec::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[dataset]\ndelimiter = ';'\n\n[filters]\ncity_limit = 25\noverview_countries = [\"Brazil\"]"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.delimiter().unwrap(), b';');
        assert_eq!(config.dataset.path, PathBuf::from("dataset/zomato.csv"));
        assert_eq!(config.filters.city_limit, 25);
        assert_eq!(config.filters.restaurant_limit, 10);

        let overview = config.overview_filters();
        assert_eq!(overview.city_limit, 25);
        assert!(overview.countries.unwrap().contains("Brazil"));
    }

    #[test]
    fn test_limits_out_of_range() {
        let result = Config::from_toml("[filters]\nrestaurant_limit = 101\n");
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_multibyte_delimiter_rejected() {
        let result = Config::from_toml("[dataset]\ndelimiter = 'é'\n");
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = Config::from_toml("[server\nport = 1");
        assert!(matches!(result, Err(DashboardError::Toml(_))));
    }

    #[test]
    fn test_shipped_config_preselects_overview_countries() {
        let config = Config::from_toml(include_str!("../config.toml")).unwrap();
        let countries = config.overview_filters().countries.unwrap();

        assert_eq!(countries.len(), 13);
        assert!(!countries.contains("India"));
        assert!(!countries.contains("United States of America"));
        for country in &countries {
            assert!(crate::constants::country_names().contains(&country.as_str()), "{}", country);
        }
    }
}
