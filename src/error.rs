use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Unknown country code {code} at row {row}")]
    UnknownCountryCode { code: i64, row: usize },

    #[error("Invalid value '{value}' for column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("No records left to rank for: {0}")]
    EmptyResultSet(String),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
