//! Inference and training benchmarks driven through the backend contract.

pub mod benchmark_errors;
pub mod benchmark_runner;
pub mod benchmark_types;
pub mod inference;
pub mod performance_metrics;
pub mod results;
pub mod training;

pub use benchmark_errors::{BenchmarkError, BenchmarkResult};
pub use benchmark_runner::{
    BenchmarkRunner, ConfigLoader, DEFAULT_CONFIG_PATH, EXPERIMENT_CONFIG_FILE,
};
pub use benchmark_types::{
    BackendConfig, BenchmarkSettings, ExperimentConfig, InferenceConfig, TrainingConfig,
};
pub use inference::{INFERENCE_RESULTS_FILE, InferenceBenchmark};
pub use performance_metrics::{
    average_latency, mean, significant_figures, throughput, track_until_duration,
};
pub use results::ResultsTable;
pub use training::{TRAINING_RESULTS_FILE, TrainingBenchmark};
