//! Model configuration a backend exposes after loading a checkpoint.

use serde::{Deserialize, Serialize};

/// The subset of a pretrained model configuration the input generators read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PretrainedConfig {
    pub model_type: String,
    pub vocab_size: Option<usize>,
    pub num_labels: Option<usize>,
    pub image_size: Option<usize>,
    pub num_channels: Option<usize>,
    pub num_mel_bins: Option<usize>,
    pub decoder_start_token_id: Option<i64>,
}

impl PretrainedConfig {
    pub fn new(model_type: &str) -> Self {
        Self {
            model_type: model_type.to_string(),
            ..Self::default()
        }
    }
}
