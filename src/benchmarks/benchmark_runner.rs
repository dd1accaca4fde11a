//! Core benchmark execution logic.

use std::fs;
use std::io;
use std::path::Path;

use log::{error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use super::benchmark_types::{BackendConfig, BenchmarkSettings, ExperimentConfig};
use super::inference::InferenceBenchmark;
use super::training::TrainingBenchmark;
use crate::backends::{Backend, SyntheticBackend};

pub const DEFAULT_CONFIG_PATH: &str = "configs/experiment.json";
pub const EXPERIMENT_CONFIG_FILE: &str = "experiment_config.json";

/// Configuration loader for JSON experiment files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration file. Missing fields take their defaults.
    pub fn load_config<T: DeserializeOwned>(path: &Path) -> BenchmarkResult<T> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BenchmarkError::ConfigFileNotFound {
                path: path.display().to_string(),
            },
            _ => BenchmarkError::IoError { source: e },
        })?;

        serde_json::from_str(&content).map_err(|e| BenchmarkError::ConfigParseError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Load and validate an experiment configuration
    pub fn load_experiment_config(path: &Path) -> BenchmarkResult<ExperimentConfig> {
        let config: ExperimentConfig = Self::load_config(path)?;
        config.validate()?;
        info!("Loaded experiment '{}' from {}", config.experiment_name, path.display());
        Ok(config)
    }

    /// Write a configuration as pretty JSON
    pub fn save_config<T: Serialize>(config: &T, path: &Path) -> BenchmarkResult<()> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| BenchmarkError::ConfigSerializeError { source: e })?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Main benchmark runner
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Runs one experiment and writes its configuration and results under
    /// `output_dir`.
    pub fn run_experiment(config: &ExperimentConfig, output_dir: &Path) -> BenchmarkResult<()> {
        config.validate()?;

        info!("{}", "=".repeat(80));
        info!("Experiment: {}", config.experiment_name);
        info!(
            "Model: {} | Task: {} | Device: {} | Backend: {}",
            config.model,
            config.task,
            config.device,
            config.backend.name()
        );
        info!("{}", "=".repeat(80));

        fs::create_dir_all(output_dir)?;
        ConfigLoader::save_config(config, &output_dir.join(EXPERIMENT_CONFIG_FILE))?;

        match &config.backend {
            BackendConfig::Synthetic(backend_config) => {
                let mut backend =
                    SyntheticBackend::new(&config.task, config.device, backend_config.clone());
                Self::run_with_backend(&config.benchmark, &mut backend, output_dir)
            }
        }
    }

    /// Runs the benchmark against `backend` and cleans it exactly once.
    ///
    /// A benchmark error takes precedence over a cleanup error.
    pub fn run_with_backend<B: Backend>(
        settings: &BenchmarkSettings,
        backend: &mut B,
        output_dir: &Path,
    ) -> BenchmarkResult<()> {
        let outcome = Self::run_benchmark(settings, backend, output_dir);
        let cleanup = backend.clean();

        match outcome {
            Ok(()) => {
                cleanup?;
                info!("Benchmark '{}' completed successfully", settings.name());
                Ok(())
            }
            Err(e) => {
                error!("Error during benchmarking: {}", e);
                if let Err(cleanup_error) = cleanup {
                    warn!("Failed to clean {} backend: {}", backend.name(), cleanup_error);
                }
                Err(e)
            }
        }
    }

    fn run_benchmark<B: Backend>(
        settings: &BenchmarkSettings,
        backend: &mut B,
        output_dir: &Path,
    ) -> BenchmarkResult<()> {
        info!(
            "Running {} benchmark on {} backend",
            settings.name(),
            backend.name()
        );
        match settings {
            BenchmarkSettings::Inference(config) => {
                let mut benchmark = InferenceBenchmark::new();
                benchmark.configure(config.clone())?;
                benchmark.run(backend)?;
                benchmark.save_in(output_dir)
            }
            BenchmarkSettings::Training(config) => {
                let mut benchmark = TrainingBenchmark::new();
                benchmark.configure(config.clone())?;
                benchmark.run(backend)?;
                benchmark.save_in(output_dir)
            }
        }
    }
}
