//! Benchmark type definitions and configuration structures.

use serde::{Deserialize, Deserializer, Serialize};

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use crate::backends::SyntheticBackendConfig;
use crate::input_shapes::{BATCH_SIZE, DATASET_SIZE, InputShapes, NUM_CHOICES, SEQUENCE_LENGTH};
use crate::tensor::Device;

/// Configuration for the inference benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Carried by the `name` tag of [`BenchmarkSettings`].
    #[serde(skip)]
    pub name: String,
    pub seed: u64,
    /// Measure peak memory of one forward call.
    pub memory: bool,
    pub warmup_runs: usize,
    /// Minimum cumulative measured time of each timed loop, in seconds.
    pub benchmark_duration: f64,
    #[serde(deserialize_with = "inference_shapes")]
    pub input_shapes: InputShapes,
    pub new_tokens: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            name: "inference".to_string(),
            seed: 42,
            memory: false,
            warmup_runs: 10,
            benchmark_duration: 10.0,
            input_shapes: InputShapes::inference_defaults(),
            new_tokens: 100,
        }
    }
}

impl InferenceConfig {
    /// Validates the configuration
    pub fn validate(&self) -> BenchmarkResult<()> {
        if !self.benchmark_duration.is_finite() || self.benchmark_duration <= 0.0 {
            return Err(BenchmarkError::ConfigValidationError {
                field: "benchmark_duration".to_string(),
                message: format!(
                    "Duration must be a positive number of seconds, got {}",
                    self.benchmark_duration
                ),
            });
        }

        if self.new_tokens == 0 {
            return Err(BenchmarkError::ConfigValidationError {
                field: "new_tokens".to_string(),
                message: "Number of new tokens must be greater than 0".to_string(),
            });
        }

        require_positive(&self.input_shapes, BATCH_SIZE, "input_shapes")?;
        Ok(())
    }

    /// Batch size of every generated input. Only meaningful after `validate`.
    pub fn batch_size(&self) -> usize {
        self.input_shapes.get_or(BATCH_SIZE, 0)
    }
}

/// Configuration for the training benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    #[serde(skip)]
    pub name: String,
    pub seed: u64,
    pub warmup_steps: usize,
    #[serde(deserialize_with = "training_shapes")]
    pub dataset_shapes: InputShapes,
    pub num_train_epochs: usize,
    pub per_device_train_batch_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            name: "training".to_string(),
            seed: 42,
            warmup_steps: 40,
            dataset_shapes: training_defaults(),
            num_train_epochs: 1,
            per_device_train_batch_size: 2,
        }
    }
}

impl TrainingConfig {
    /// Validates the configuration
    pub fn validate(&self) -> BenchmarkResult<()> {
        if self.warmup_steps == 0 {
            return Err(BenchmarkError::ConfigValidationError {
                field: "warmup_steps".to_string(),
                message: "Warmup steps must be greater than 0".to_string(),
            });
        }

        if self.num_train_epochs == 0 {
            return Err(BenchmarkError::ConfigValidationError {
                field: "num_train_epochs".to_string(),
                message: "Number of epochs must be greater than 0".to_string(),
            });
        }

        if self.per_device_train_batch_size == 0 {
            return Err(BenchmarkError::ConfigValidationError {
                field: "per_device_train_batch_size".to_string(),
                message: "Batch size must be greater than 0".to_string(),
            });
        }

        require_positive(&self.dataset_shapes, DATASET_SIZE, "dataset_shapes")?;
        Ok(())
    }

    pub fn dataset_size(&self) -> usize {
        self.dataset_shapes.get_or(DATASET_SIZE, 0)
    }
}

/// Benchmark selected by an experiment, tagged by its `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum BenchmarkSettings {
    Inference(InferenceConfig),
    Training(TrainingConfig),
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        BenchmarkSettings::Inference(InferenceConfig::default())
    }
}

impl BenchmarkSettings {
    pub fn name(&self) -> &str {
        match self {
            BenchmarkSettings::Inference(config) => &config.name,
            BenchmarkSettings::Training(config) => &config.name,
        }
    }

    pub fn validate(&self) -> BenchmarkResult<()> {
        match self {
            BenchmarkSettings::Inference(config) => config.validate(),
            BenchmarkSettings::Training(config) => config.validate(),
        }
    }
}

/// Backend selected by an experiment, tagged by its `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum BackendConfig {
    Synthetic(SyntheticBackendConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Synthetic(SyntheticBackendConfig::default())
    }
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Synthetic(_) => "synthetic",
        }
    }
}

/// One experiment: a model and task, the backend running it and the
/// benchmark measuring it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub experiment_name: String,
    pub model: String,
    pub device: Device,
    pub task: String,
    pub benchmark: BenchmarkSettings,
    pub backend: BackendConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiment_name: "experiment".to_string(),
            model: "synthetic".to_string(),
            device: Device::Cpu,
            task: "text-generation".to_string(),
            benchmark: BenchmarkSettings::default(),
            backend: BackendConfig::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> BenchmarkResult<()> {
        if self.task.is_empty() {
            return Err(BenchmarkError::ConfigValidationError {
                field: "task".to_string(),
                message: "Task must not be empty".to_string(),
            });
        }
        self.benchmark.validate()
    }
}

fn training_defaults() -> InputShapes {
    InputShapes::from_pairs([(DATASET_SIZE, 500), (SEQUENCE_LENGTH, 16), (NUM_CHOICES, 1)])
}

fn require_positive(shapes: &InputShapes, key: &str, field: &str) -> BenchmarkResult<()> {
    match shapes.get(key) {
        Some(value) if value > 0 => Ok(()),
        Some(_) => Err(BenchmarkError::ConfigValidationError {
            field: format!("{}.{}", field, key),
            message: "Must be greater than 0".to_string(),
        }),
        None => Err(BenchmarkError::ConfigValidationError {
            field: format!("{}.{}", field, key),
            message: "Required shape is missing".to_string(),
        }),
    }
}

/// Partial shape maps override the defaults key by key.
fn merged_over<'de, D>(deserializer: D, mut defaults: InputShapes) -> Result<InputShapes, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = InputShapes::deserialize(deserializer)?;
    for (key, value) in overrides.iter() {
        defaults.insert(key, value);
    }
    Ok(defaults)
}

fn inference_shapes<'de, D>(deserializer: D) -> Result<InputShapes, D::Error>
where
    D: Deserializer<'de>,
{
    merged_over(deserializer, InputShapes::inference_defaults())
}

fn training_shapes<'de, D>(deserializer: D) -> Result<InputShapes, D::Error>
where
    D: Deserializer<'de>,
{
    merged_over(deserializer, training_defaults())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inference_config_uses_defaults() {
        let config: InferenceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, InferenceConfig::default());
        assert_eq!(config.batch_size(), 2);
        assert_eq!(config.input_shapes.get("audio_sequence_length"), Some(16000));
    }

    #[test]
    fn partial_shapes_keep_other_defaults() {
        let config: InferenceConfig =
            serde_json::from_str(r#"{"input_shapes": {"batch_size": 8}}"#).unwrap();
        assert_eq!(config.batch_size(), 8);
        assert_eq!(config.input_shapes.get("sequence_length"), Some(16));
    }

    #[test]
    fn invalid_duration_is_rejected() {
        for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = InferenceConfig {
                benchmark_duration: duration,
                ..InferenceConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(BenchmarkError::ConfigValidationError { ref field, .. })
                    if field == "benchmark_duration"
            ));
        }
    }

    #[test]
    fn missing_batch_size_is_rejected() {
        let mut config = InferenceConfig::default();
        config.input_shapes.remove(BATCH_SIZE);
        assert!(config.validate().is_err());

        let config = InferenceConfig {
            new_tokens: 0,
            ..InferenceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn benchmark_is_selected_by_name() {
        let settings: BenchmarkSettings =
            serde_json::from_str(r#"{"name": "training", "warmup_steps": 5}"#).unwrap();
        match settings {
            BenchmarkSettings::Training(config) => {
                assert_eq!(config.warmup_steps, 5);
                assert_eq!(config.dataset_size(), 500);
            }
            other => panic!("expected training settings, got {:?}", other),
        }

        assert!(serde_json::from_str::<BenchmarkSettings>(r#"{"name": "profiling"}"#).is_err());
    }

    #[test]
    fn experiment_config_round_trips_through_json() {
        let config = ExperimentConfig {
            device: Device::Cuda(1),
            ..ExperimentConfig::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"cuda:1\""));
        let parsed: ExperimentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
