//! Benchmark harness for model inference and training.
//!
//! The harness generates synthetic inputs of the right shape for a task,
//! drives a [`Backend`](backends::Backend) through warmup and timed loops,
//! and reports latency, throughput and peak memory as a single-row CSV.

pub mod backends;
pub mod benchmarks;
pub mod errors;
pub mod generators;
pub mod input_shapes;
pub mod pretrained_config;
pub mod tensor;
pub mod trackers;

pub use backends::{Backend, GenerationOptions, SyntheticBackend, TrainingArguments};
pub use benchmarks::{
    BenchmarkError, BenchmarkResult, BenchmarkRunner, ConfigLoader, ExperimentConfig,
    InferenceBenchmark, InferenceConfig, TrainingBenchmark, TrainingConfig,
};
pub use input_shapes::InputShapes;
pub use pretrained_config::PretrainedConfig;
pub use tensor::{DType, Device, Tensor};
