//! Forward and generation latency, throughput and peak memory of a backend.

use std::path::Path;
use std::time::Duration;

use log::info;
use rand_chacha::ChaCha8Rng;

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use super::benchmark_types::InferenceConfig;
use super::performance_metrics::{average_latency, throughput, track_until_duration};
use super::results::{
    FORWARD_LATENCY, FORWARD_PEAK_MEMORY, FORWARD_THROUGHPUT, GENERATE_LATENCY,
    GENERATE_THROUGHPUT, ResultsTable,
};
use crate::backends::{Backend, GenerationOptions};
use crate::generators::{InputGenerator, InputMode, seeded_rng};
use crate::trackers::track_memory;

pub const INFERENCE_RESULTS_FILE: &str = "inference_results.csv";

/// Number of memory samples taken over one duration budget.
const MEMORY_SAMPLES_PER_DURATION: f64 = 100.0;

#[derive(Debug, Clone, Default)]
struct Measurements {
    peak_memory_mb: Option<u64>,
    forward_latencies: Vec<f64>,
    generate_latencies: Option<Vec<f64>>,
}

pub struct InferenceBenchmark {
    config: InferenceConfig,
    rng: ChaCha8Rng,
    measurements: Option<Measurements>,
}

impl Default for InferenceBenchmark {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceBenchmark {
    pub fn new() -> Self {
        let config = InferenceConfig::default();
        let rng = seeded_rng(config.seed);
        Self {
            config,
            rng,
            measurements: None,
        }
    }

    pub fn configure(&mut self, config: InferenceConfig) -> BenchmarkResult<()> {
        config.validate()?;
        info!("Configuring {} benchmark", config.name);
        self.rng = seeded_rng(config.seed);
        self.config = config;
        self.measurements = None;
        Ok(())
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Runs every enabled phase against `backend`.
    ///
    /// Results are only kept when all phases succeed.
    pub fn run<B: Backend>(&mut self, backend: &mut B) -> BenchmarkResult<()> {
        info!("Running inference benchmark");
        self.measurements = None;

        let mut input_shapes = self.config.input_shapes.clone();
        input_shapes.merge_missing(&backend.model_shapes());

        let mut input_generator = InputGenerator::new(
            backend.task(),
            input_shapes,
            backend.pretrained_config(),
            self.rng.clone(),
        )?;

        let mut measurements = Measurements::default();

        if self.config.memory {
            measurements.peak_memory_mb =
                Some(self.run_memory_tracking(backend, &mut input_generator)?);
        }

        measurements.forward_latencies = self.run_forward_tracking(backend, &mut input_generator)?;

        if backend.is_text_generation_model() {
            measurements.generate_latencies =
                Some(self.run_generate_tracking(backend, &mut input_generator)?);
        }

        self.measurements = Some(measurements);
        Ok(())
    }

    fn run_memory_tracking<B: Backend>(
        &self,
        backend: &mut B,
        input_generator: &mut InputGenerator,
    ) -> BenchmarkResult<u64> {
        info!("\t+ Tracking forward pass peak memory");
        let forward_input = input_generator
            .generate(InputMode::Forward)?
            .to_device(backend.device());
        backend.prepare_for_inference(input_generator.input_shapes())?;

        let interval = Duration::from_secs_f64(
            self.config.benchmark_duration / MEMORY_SAMPLES_PER_DURATION,
        );
        let mut tracker = backend.memory_tracker();
        {
            let _window = track_memory(tracker.as_mut(), interval);
            backend.forward(&forward_input)?;
        }

        let peak_memory_mb = tracker.peak_memory_mb();
        info!("\t+ Forward pass peak memory: {} (MB)", peak_memory_mb);
        Ok(peak_memory_mb)
    }

    fn run_forward_tracking<B: Backend>(
        &self,
        backend: &mut B,
        input_generator: &mut InputGenerator,
    ) -> BenchmarkResult<Vec<f64>> {
        info!("\t+ Tracking forward pass latency and throughput");
        let forward_input = input_generator
            .generate(InputMode::Forward)?
            .to_device(backend.device());
        backend.prepare_for_inference(input_generator.input_shapes())?;

        info!("\t+ Warming up the forward pass");
        for _ in 0..self.config.warmup_runs {
            backend.forward(&forward_input)?;
        }

        let mut tracker = backend.latency_tracker();
        let latencies = track_until_duration(tracker.as_mut(), self.config.benchmark_duration, || {
            backend.forward(&forward_input).map(|_| ())
        })?;

        if let Some(latency) = average_latency(&latencies) {
            info!("\t+ Forward pass latency: {:.2e} (s)", latency);
            info!(
                "\t+ Forward pass throughput: {:.2} (samples/s)",
                throughput(self.config.batch_size() as f64, latency)
            );
        }
        Ok(latencies)
    }

    fn run_generate_tracking<B: Backend>(
        &self,
        backend: &mut B,
        input_generator: &mut InputGenerator,
    ) -> BenchmarkResult<Vec<f64>> {
        info!("\t+ Tracking generation latency and throughput");
        let generate_input = input_generator
            .generate(InputMode::Generate)?
            .to_device(backend.device());
        let options = GenerationOptions::greedy(self.config.new_tokens);

        info!("\t+ Warming up the generation pass");
        backend.generate(&generate_input, &options)?;

        let mut tracker = backend.latency_tracker();
        let latencies = track_until_duration(tracker.as_mut(), self.config.benchmark_duration, || {
            backend.generate(&generate_input, &options).map(|_| ())
        })?;

        if let Some(latency) = average_latency(&latencies) {
            info!("\t+ Generation pass latency: {:.2e} (s)", latency);
            info!(
                "\t+ Generation pass throughput: {:.2} (tokens/s)",
                throughput(self.generated_tokens_per_call(), latency)
            );
        }
        Ok(latencies)
    }

    fn generated_tokens_per_call(&self) -> f64 {
        (self.config.new_tokens * self.config.batch_size()) as f64
    }

    pub fn forward_latencies(&self) -> &[f64] {
        self.measurements
            .as_ref()
            .map(|measurements| measurements.forward_latencies.as_slice())
            .unwrap_or(&[])
    }

    pub fn generate_latencies(&self) -> &[f64] {
        self.measurements
            .as_ref()
            .and_then(|measurements| measurements.generate_latencies.as_deref())
            .unwrap_or(&[])
    }

    pub fn peak_memory_mb(&self) -> Option<u64> {
        self.measurements
            .as_ref()
            .and_then(|measurements| measurements.peak_memory_mb)
    }

    pub fn forward_latency(&self) -> Option<f64> {
        average_latency(self.forward_latencies())
    }

    pub fn forward_throughput(&self) -> Option<f64> {
        self.forward_latency()
            .map(|latency| throughput(self.config.batch_size() as f64, latency))
    }

    pub fn generate_latency(&self) -> Option<f64> {
        average_latency(self.generate_latencies())
    }

    pub fn generate_throughput(&self) -> Option<f64> {
        self.generate_latency()
            .map(|latency| throughput(self.generated_tokens_per_call(), latency))
    }

    pub fn results_table(&self) -> BenchmarkResult<ResultsTable> {
        let measurements = self.measurements.as_ref().ok_or_else(|| BenchmarkError::NotRun {
            benchmark_name: self.config.name.clone(),
        })?;

        let mut table = ResultsTable::new();
        if let Some(peak_memory_mb) = measurements.peak_memory_mb {
            table.insert(FORWARD_PEAK_MEMORY, peak_memory_mb as f64);
        }
        if let (Some(latency), Some(samples_per_second)) =
            (self.forward_latency(), self.forward_throughput())
        {
            table.insert(FORWARD_LATENCY, latency);
            table.insert(FORWARD_THROUGHPUT, samples_per_second);
        }
        if let (Some(latency), Some(tokens_per_second)) =
            (self.generate_latency(), self.generate_throughput())
        {
            table.insert(GENERATE_LATENCY, latency);
            table.insert(GENERATE_THROUGHPUT, tokens_per_second);
        }
        Ok(table)
    }

    /// Writes the results to `inference_results.csv` in the working directory.
    pub fn save(&self) -> BenchmarkResult<()> {
        self.save_in(Path::new("."))
    }

    pub fn save_in(&self, dir: &Path) -> BenchmarkResult<()> {
        info!("Saving inference results");
        let table = self.results_table()?;
        table.log_summary();
        table.write_csv(&dir.join(INFERENCE_RESULTS_FILE))
    }
}
