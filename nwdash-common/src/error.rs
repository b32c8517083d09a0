use thiserror::Error;

/// Main error type for the dashboard.
///
/// Only loading, building and exporting datasets can fail; catalog lookups and
/// aggregation have no error path.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid metrics store: {0}")]
    InvalidStore(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl From<serde_json::Error> for DashboardError {
    fn from(error: serde_json::Error) -> Self {
        DashboardError::Serialization(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
