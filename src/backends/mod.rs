//! Backend capability contract driven by the benchmarks.
//!
//! The benchmarks depend only on [`Backend`]; device placement, compilation and
//! the actual model calls belong to the implementation.

pub mod synthetic;

use crate::errors::{BackendError, BackendResult};
use crate::generators::{Dataset, DummyInput};
use crate::input_shapes::InputShapes;
use crate::pretrained_config::PretrainedConfig;
use crate::tensor::Device;
use crate::trackers::{LatencyTracker, MemoryTracker, RssMemoryTracker, WallClockLatencyTracker};

pub use synthetic::{SyntheticBackend, SyntheticBackendConfig, SyntheticOutput};

/// Tasks whose models support autoregressive generation.
pub const TEXT_GENERATION_TASKS: [&str; 4] = [
    "text-generation",
    "text2text-generation",
    "image-to-text",
    "automatic-speech-recognition",
];

/// Decoding options for one `generate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    pub max_new_tokens: usize,
    pub min_new_tokens: usize,
    pub do_sample: bool,
    pub use_cache: bool,
    pub pad_token_id: i64,
    pub num_beams: usize,
}

impl GenerationOptions {
    /// Greedy decoding of exactly `new_tokens` tokens with the KV cache on.
    pub fn greedy(new_tokens: usize) -> Self {
        Self {
            max_new_tokens: new_tokens,
            min_new_tokens: new_tokens,
            do_sample: false,
            use_cache: true,
            pad_token_id: 0,
            num_beams: 1,
        }
    }
}

/// Bounds of one `train` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingArguments {
    /// Stop after this many optimizer steps, overriding the epoch count.
    pub max_steps: Option<usize>,
    pub num_train_epochs: usize,
    pub per_device_train_batch_size: usize,
}

impl TrainingArguments {
    /// Optimizer steps this call performs over a dataset of `dataset_len` rows.
    pub fn total_steps(&self, dataset_len: usize) -> usize {
        self.max_steps.unwrap_or_else(|| {
            let batch_size = self.per_device_train_batch_size.max(1);
            dataset_len.div_ceil(batch_size) * self.num_train_epochs
        })
    }
}

pub trait Backend {
    type Output;

    fn name(&self) -> &str;

    fn task(&self) -> &str;

    fn device(&self) -> Device;

    /// Shape dimensions inferred from the loaded model (vocabulary size,
    /// number of labels, ...).
    fn model_shapes(&self) -> InputShapes {
        InputShapes::new()
    }

    fn pretrained_config(&self) -> Option<&PretrainedConfig> {
        None
    }

    fn is_text_generation_model(&self) -> bool {
        TEXT_GENERATION_TASKS.contains(&self.task())
    }

    /// Hook for backends that compile against static input shapes.
    fn prepare_for_inference(&mut self, _input_shapes: &InputShapes) -> BackendResult<()> {
        Ok(())
    }

    fn forward(&mut self, input: &DummyInput) -> BackendResult<Self::Output>;

    fn generate(
        &mut self,
        input: &DummyInput,
        options: &GenerationOptions,
    ) -> BackendResult<Self::Output>;

    fn train(&mut self, _dataset: &Dataset, _arguments: &TrainingArguments) -> BackendResult<()> {
        Err(BackendError::Unsupported {
            operation: "train".to_string(),
        })
    }

    /// Releases every resource held by the backend.
    fn clean(&mut self) -> BackendResult<()>;

    fn latency_tracker(&self) -> Box<dyn LatencyTracker> {
        Box::new(WallClockLatencyTracker::new())
    }

    fn memory_tracker(&self) -> Box<dyn MemoryTracker> {
        Box::new(RssMemoryTracker::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_options_pin_token_count() {
        let options = GenerationOptions::greedy(100);
        assert_eq!(options.max_new_tokens, 100);
        assert_eq!(options.min_new_tokens, 100);
        assert!(!options.do_sample);
        assert!(options.use_cache);
        assert_eq!(options.num_beams, 1);
        assert_eq!(options.pad_token_id, 0);
    }

    #[test]
    fn total_steps_from_epochs_or_cap() {
        let by_epochs = TrainingArguments {
            max_steps: None,
            num_train_epochs: 2,
            per_device_train_batch_size: 4,
        };
        assert_eq!(by_epochs.total_steps(10), 6);

        let capped = TrainingArguments {
            max_steps: Some(3),
            ..by_epochs
        };
        assert_eq!(capped.total_steps(10), 3);
    }
}
