//! Tests for the training benchmark.

mod common;

use common::MockBackend;
use inference_bench::backends::SyntheticBackend;
use inference_bench::benchmarks::training::{
    TRAINING_RUNTIME, TRAINING_THROUGHPUT, WARMUP_RUNTIME, WARMUP_THROUGHPUT,
};
use inference_bench::benchmarks::{
    BenchmarkError, TRAINING_RESULTS_FILE, TrainingBenchmark, TrainingConfig,
};
use inference_bench::errors::BackendError;
use inference_bench::input_shapes::InputShapes;
use inference_bench::tensor::Device;

fn small_config() -> TrainingConfig {
    TrainingConfig {
        warmup_steps: 3,
        dataset_shapes: InputShapes::from_pairs([
            ("dataset_size", 12),
            ("sequence_length", 4),
            ("num_choices", 1),
        ]),
        num_train_epochs: 2,
        per_device_train_batch_size: 4,
        ..TrainingConfig::default()
    }
}

#[cfg(test)]
mod training_tests {
    use super::*;

    #[test]
    fn test_warmup_then_full_training() {
        let mut backend = MockBackend::new("text-classification", 0.0);
        let mut benchmark = TrainingBenchmark::new();
        benchmark.configure(small_config()).unwrap();

        benchmark.run(&mut backend).unwrap();

        assert_eq!(backend.trained_rows, 12);
        assert_eq!(backend.train_calls.len(), 2);
        assert_eq!(backend.train_calls[0].max_steps, Some(3));
        assert_eq!(backend.train_calls[1].max_steps, None);
        assert_eq!(backend.train_calls[1].num_train_epochs, 2);
        assert_eq!(backend.train_calls[1].total_steps(12), 6);

        let table = benchmark.results_table().unwrap();
        assert_eq!(
            table.column_names().collect::<Vec<_>>(),
            vec![WARMUP_RUNTIME, WARMUP_THROUGHPUT, TRAINING_RUNTIME, TRAINING_THROUGHPUT]
        );
    }

    #[test]
    fn test_synthetic_backend_runtime_reflects_steps() {
        let mut backend = SyntheticBackend::new(
            "fill-mask",
            Device::Cpu,
            inference_bench::backends::SyntheticBackendConfig {
                train_step_latency_ms: 1.0,
                ..Default::default()
            },
        );
        let mut benchmark = TrainingBenchmark::new();
        benchmark.configure(small_config()).unwrap();

        benchmark.run(&mut backend).unwrap();

        assert_eq!(backend.train_steps(), 3 + 6);
        assert!(benchmark.warmup_runtime().unwrap() >= 0.003);
        assert!(benchmark.training_runtime().unwrap() >= 0.006);
        assert!(benchmark.training_throughput().unwrap() > 0.0);

        let dir = tempfile::tempdir().unwrap();
        benchmark.save_in(dir.path()).unwrap();
        let csv = std::fs::read_to_string(dir.path().join(TRAINING_RESULTS_FILE)).unwrap();
        assert!(csv.starts_with(",warmup.runtime(s),warmup.throughput(samples/s)"));
    }

    #[test]
    fn test_save_before_run_is_an_error() {
        let benchmark = TrainingBenchmark::new();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            benchmark.save_in(dir.path()),
            Err(BenchmarkError::NotRun { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut benchmark = TrainingBenchmark::new();
        let result = benchmark.configure(TrainingConfig {
            per_device_train_batch_size: 0,
            ..TrainingConfig::default()
        });
        assert!(matches!(
            result,
            Err(BenchmarkError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_backend_without_training_support_propagates_unsupported() {
        struct InferenceOnly(MockBackend);

        impl inference_bench::backends::Backend for InferenceOnly {
            type Output = usize;

            fn name(&self) -> &str {
                "inference-only"
            }

            fn task(&self) -> &str {
                self.0.task.as_str()
            }

            fn device(&self) -> Device {
                Device::Cpu
            }

            fn forward(
                &mut self,
                input: &inference_bench::generators::DummyInput,
            ) -> inference_bench::errors::BackendResult<usize> {
                Ok(input.len())
            }

            fn generate(
                &mut self,
                input: &inference_bench::generators::DummyInput,
                _options: &inference_bench::backends::GenerationOptions,
            ) -> inference_bench::errors::BackendResult<usize> {
                Ok(input.len())
            }

            fn clean(&mut self) -> inference_bench::errors::BackendResult<()> {
                Ok(())
            }
        }

        let mut backend = InferenceOnly(MockBackend::new("fill-mask", 0.0));
        let mut benchmark = TrainingBenchmark::new();
        benchmark.configure(small_config()).unwrap();

        assert!(matches!(
            benchmark.run(&mut backend),
            Err(BenchmarkError::Backend(BackendError::Unsupported { .. }))
        ));
    }
}
