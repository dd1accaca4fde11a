//! Error types for benchmark operations.

use thiserror::Error;

use crate::errors::{BackendError, GeneratorError};

#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("Configuration file not found: {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration file '{path}': {source}")]
    ConfigParseError {
        path: String,
        source: serde_json::Error,
    },

    #[error("Failed to serialize configuration: {source}")]
    ConfigSerializeError { source: serde_json::Error },

    #[error("Configuration validation error for field '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to write results CSV: {source}")]
    CsvError {
        #[from]
        source: csv::Error,
    },

    #[error("Benchmark '{benchmark_name}' has no measurements yet, run it before saving")]
    NotRun { benchmark_name: String },

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type BenchmarkResult<T> = Result<T, BenchmarkError>;
