pub mod config;
pub use config::{Config, ExportConfig, HistogramConfig, LoggingConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistLensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("bin count must be at least 1, got {0}")]
    InvalidBins(usize),
    #[error("column not found: {0}")]
    UnknownColumn(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HistLensError>;
