//! A backend that simulates model execution cost.
//!
//! It runs no model. Each call validates its inputs like a real runtime would,
//! then sleeps for a configured duration, which makes the whole harness
//! runnable and its timing predictable without an ML runtime.

use std::thread;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{Backend, GenerationOptions, TrainingArguments};
use crate::errors::{BackendError, BackendResult};
use crate::generators::{Dataset, DummyInput, InputValue};
use crate::input_shapes::InputShapes;
use crate::pretrained_config::PretrainedConfig;
use crate::tensor::Device;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticBackendConfig {
    /// Reported as the pretrained configuration's model type when set.
    pub model_type: Option<String>,
    /// Overrides the task-based generation capability.
    pub can_generate: Option<bool>,
    pub forward_latency_ms: f64,
    pub generate_latency_per_token_ms: f64,
    pub train_step_latency_ms: f64,
    pub vocab_size: usize,
    pub num_labels: usize,
}

impl Default for SyntheticBackendConfig {
    fn default() -> Self {
        Self {
            model_type: None,
            can_generate: None,
            forward_latency_ms: 5.0,
            generate_latency_per_token_ms: 0.5,
            train_step_latency_ms: 2.0,
            vocab_size: 30522,
            num_labels: 2,
        }
    }
}

/// What a synthetic call processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticOutput {
    pub batch_size: usize,
    pub new_tokens: usize,
}

pub struct SyntheticBackend {
    task: String,
    device: Device,
    config: SyntheticBackendConfig,
    pretrained_config: Option<PretrainedConfig>,
    prepared_shapes: Option<InputShapes>,
    forward_calls: usize,
    generate_calls: usize,
    train_steps: usize,
    cleaned: bool,
}

impl SyntheticBackend {
    pub fn new(task: &str, device: Device, config: SyntheticBackendConfig) -> Self {
        let pretrained_config = config.model_type.as_deref().map(|model_type| PretrainedConfig {
            vocab_size: Some(config.vocab_size),
            num_labels: Some(config.num_labels),
            ..PretrainedConfig::new(model_type)
        });
        info!(
            "Allocating synthetic backend for task {} on {}",
            task, device
        );
        Self {
            task: task.to_string(),
            device,
            config,
            pretrained_config,
            prepared_shapes: None,
            forward_calls: 0,
            generate_calls: 0,
            train_steps: 0,
            cleaned: false,
        }
    }

    pub fn forward_calls(&self) -> usize {
        self.forward_calls
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls
    }

    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    pub fn prepared_shapes(&self) -> Option<&InputShapes> {
        self.prepared_shapes.as_ref()
    }

    pub fn is_cleaned(&self) -> bool {
        self.cleaned
    }

    /// Checks placement and returns the batch size of the input.
    fn check_input(&self, input: &DummyInput) -> BackendResult<usize> {
        if self.cleaned {
            return Err(BackendError::Execution {
                operation: "inference".to_string(),
                message: "backend was already cleaned".to_string(),
            });
        }
        let mut batch_size = 0;
        for (key, value) in input.iter() {
            if let InputValue::Tensor(tensor) = value {
                if tensor.device() != self.device {
                    return Err(BackendError::DeviceMismatch {
                        input: key.to_string(),
                        expected: self.device,
                        actual: tensor.device(),
                    });
                }
            }
            batch_size = batch_size.max(value.leading_dim());
        }
        Ok(batch_size)
    }

    fn simulate(milliseconds: f64) {
        if milliseconds > 0.0 {
            thread::sleep(Duration::from_secs_f64(milliseconds / 1000.0));
        }
    }
}

impl Backend for SyntheticBackend {
    type Output = SyntheticOutput;

    fn name(&self) -> &str {
        "synthetic"
    }

    fn task(&self) -> &str {
        &self.task
    }

    fn device(&self) -> Device {
        self.device
    }

    fn model_shapes(&self) -> InputShapes {
        InputShapes::from_pairs([
            ("vocab_size", self.config.vocab_size),
            ("num_labels", self.config.num_labels),
        ])
    }

    fn pretrained_config(&self) -> Option<&PretrainedConfig> {
        self.pretrained_config.as_ref()
    }

    fn is_text_generation_model(&self) -> bool {
        self.config
            .can_generate
            .unwrap_or_else(|| super::TEXT_GENERATION_TASKS.contains(&self.task.as_str()))
    }

    fn prepare_for_inference(&mut self, input_shapes: &InputShapes) -> BackendResult<()> {
        debug!("Preparing synthetic backend for shapes {:?}", input_shapes);
        self.prepared_shapes = Some(input_shapes.clone());
        Ok(())
    }

    fn forward(&mut self, input: &DummyInput) -> BackendResult<SyntheticOutput> {
        let batch_size = self.check_input(input)?;
        Self::simulate(self.config.forward_latency_ms);
        self.forward_calls += 1;
        Ok(SyntheticOutput {
            batch_size,
            new_tokens: 0,
        })
    }

    fn generate(
        &mut self,
        input: &DummyInput,
        options: &GenerationOptions,
    ) -> BackendResult<SyntheticOutput> {
        if !self.is_text_generation_model() {
            return Err(BackendError::Unsupported {
                operation: "generate".to_string(),
            });
        }
        let batch_size = self.check_input(input)?;
        let new_tokens = options.max_new_tokens;
        Self::simulate(self.config.generate_latency_per_token_ms * new_tokens as f64);
        self.generate_calls += 1;
        Ok(SyntheticOutput {
            batch_size,
            new_tokens,
        })
    }

    fn train(&mut self, dataset: &Dataset, arguments: &TrainingArguments) -> BackendResult<()> {
        if dataset.is_empty() {
            return Err(BackendError::Execution {
                operation: "train".to_string(),
                message: "dataset is empty".to_string(),
            });
        }
        let steps = arguments.total_steps(dataset.len());
        Self::simulate(self.config.train_step_latency_ms * steps as f64);
        self.train_steps += steps;
        Ok(())
    }

    fn clean(&mut self) -> BackendResult<()> {
        info!("Cleaning synthetic backend");
        self.prepared_shapes = None;
        self.cleaned = true;
        Ok(())
    }
}
