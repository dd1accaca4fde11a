//! Warmup and full-epoch training runtime and throughput of a backend.

use std::path::Path;
use std::time::Instant;

use log::info;
use rand_chacha::ChaCha8Rng;

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use super::benchmark_types::TrainingConfig;
use super::performance_metrics::{significant_figures, throughput};
use super::results::ResultsTable;
use crate::backends::{Backend, TrainingArguments};
use crate::generators::{DatasetGenerator, seeded_rng};

pub const TRAINING_RESULTS_FILE: &str = "training_results.csv";

pub const WARMUP_RUNTIME: &str = "warmup.runtime(s)";
pub const WARMUP_THROUGHPUT: &str = "warmup.throughput(samples/s)";
pub const TRAINING_RUNTIME: &str = "training.runtime(s)";
pub const TRAINING_THROUGHPUT: &str = "training.throughput(samples/s)";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Runtimes {
    warmup: f64,
    training: f64,
}

pub struct TrainingBenchmark {
    config: TrainingConfig,
    rng: ChaCha8Rng,
    runtimes: Option<Runtimes>,
}

impl Default for TrainingBenchmark {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingBenchmark {
    pub fn new() -> Self {
        let config = TrainingConfig::default();
        let rng = seeded_rng(config.seed);
        Self {
            config,
            rng,
            runtimes: None,
        }
    }

    pub fn configure(&mut self, config: TrainingConfig) -> BenchmarkResult<()> {
        config.validate()?;
        info!("Configuring {} benchmark", config.name);
        self.rng = seeded_rng(config.seed);
        self.config = config;
        self.runtimes = None;
        Ok(())
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn run<B: Backend>(&mut self, backend: &mut B) -> BenchmarkResult<()> {
        info!("Running training benchmark");
        self.runtimes = None;

        let mut dataset_generator = DatasetGenerator::new(
            backend.task(),
            self.config.dataset_shapes.clone(),
            self.rng.clone(),
        )?;
        let dataset = dataset_generator.generate()?;
        info!("\t+ Generated dataset of {} examples", dataset.len());

        info!("\t+ Warming up training for {} steps", self.config.warmup_steps);
        let warmup_arguments = TrainingArguments {
            max_steps: Some(self.config.warmup_steps),
            num_train_epochs: self.config.num_train_epochs,
            per_device_train_batch_size: self.config.per_device_train_batch_size,
        };
        let start = Instant::now();
        backend.train(&dataset, &warmup_arguments)?;
        let warmup = start.elapsed().as_secs_f64();

        info!("\t+ Training for {} epochs", self.config.num_train_epochs);
        let training_arguments = TrainingArguments {
            max_steps: None,
            ..warmup_arguments
        };
        let start = Instant::now();
        backend.train(&dataset, &training_arguments)?;
        let training = start.elapsed().as_secs_f64();

        info!("\t+ Training runtime: {:.2e} (s)", training);
        self.runtimes = Some(Runtimes { warmup, training });
        Ok(())
    }

    pub fn warmup_runtime(&self) -> Option<f64> {
        self.runtimes.map(|runtimes| significant_figures(runtimes.warmup))
    }

    pub fn warmup_throughput(&self) -> Option<f64> {
        let samples = (self.config.warmup_steps * self.config.per_device_train_batch_size) as f64;
        self.runtimes
            .map(|runtimes| throughput(samples, runtimes.warmup))
    }

    pub fn training_runtime(&self) -> Option<f64> {
        self.runtimes.map(|runtimes| significant_figures(runtimes.training))
    }

    pub fn training_throughput(&self) -> Option<f64> {
        let samples = (self.config.dataset_size() * self.config.num_train_epochs) as f64;
        self.runtimes
            .map(|runtimes| throughput(samples, runtimes.training))
    }

    pub fn results_table(&self) -> BenchmarkResult<ResultsTable> {
        let (
            Some(warmup_runtime),
            Some(warmup_throughput),
            Some(training_runtime),
            Some(training_throughput),
        ) = (
            self.warmup_runtime(),
            self.warmup_throughput(),
            self.training_runtime(),
            self.training_throughput(),
        )
        else {
            return Err(BenchmarkError::NotRun {
                benchmark_name: self.config.name.clone(),
            });
        };

        let mut table = ResultsTable::new();
        table.insert(WARMUP_RUNTIME, warmup_runtime);
        table.insert(WARMUP_THROUGHPUT, warmup_throughput);
        table.insert(TRAINING_RUNTIME, training_runtime);
        table.insert(TRAINING_THROUGHPUT, training_throughput);
        Ok(table)
    }

    /// Writes the results to `training_results.csv` in the working directory.
    pub fn save(&self) -> BenchmarkResult<()> {
        self.save_in(Path::new("."))
    }

    pub fn save_in(&self, dir: &Path) -> BenchmarkResult<()> {
        info!("Saving training results");
        let table = self.results_table()?;
        table.log_summary();
        table.write_csv(&dir.join(TRAINING_RESULTS_FILE))
    }
}
