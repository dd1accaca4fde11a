//! Synthetic inputs handed to a backend.

use std::collections::BTreeMap;

use crate::tensor::{Device, Tensor};

pub const INPUT_IDS: &str = "input_ids";
pub const ATTENTION_MASK: &str = "attention_mask";
pub const TOKEN_TYPE_IDS: &str = "token_type_ids";
pub const PIXEL_VALUES: &str = "pixel_values";
pub const INPUT_VALUES: &str = "input_values";
pub const INPUT_FEATURES: &str = "input_features";
pub const DECODER_INPUT_IDS: &str = "decoder_input_ids";
pub const BBOX: &str = "bbox";
pub const PROMPT: &str = "prompt";

/// Primary modality keys, highest priority first.
pub const MODALITY_PRIORITY: [&str; 4] = [INPUT_IDS, PIXEL_VALUES, INPUT_VALUES, INPUT_FEATURES];

/// One named entry of a dummy input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Tensor(Tensor),
    Prompts(Vec<String>),
}

impl InputValue {
    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            InputValue::Tensor(tensor) => Some(tensor),
            InputValue::Prompts(_) => None,
        }
    }

    pub fn as_prompts(&self) -> Option<&[String]> {
        match self {
            InputValue::Prompts(prompts) => Some(prompts),
            InputValue::Tensor(_) => None,
        }
    }

    /// Size of the leading (batch) dimension.
    pub fn leading_dim(&self) -> usize {
        match self {
            InputValue::Tensor(tensor) => tensor.shape().first().copied().unwrap_or(0),
            InputValue::Prompts(prompts) => prompts.len(),
        }
    }

    pub(crate) fn select_first(&self, index: usize) -> Option<InputValue> {
        match self {
            InputValue::Tensor(tensor) => tensor.select_first(index).map(InputValue::Tensor),
            InputValue::Prompts(prompts) => prompts
                .get(index)
                .map(|prompt| InputValue::Prompts(vec![prompt.clone()])),
        }
    }
}

impl From<Tensor> for InputValue {
    fn from(tensor: Tensor) -> Self {
        InputValue::Tensor(tensor)
    }
}

/// Mapping from input role to value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DummyInput {
    values: BTreeMap<String, InputValue>,
}

impl DummyInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<InputValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.values.get(key)
    }

    pub fn tensor(&self, key: &str) -> Option<&Tensor> {
        self.get(key).and_then(InputValue::as_tensor)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keeps only the highest-priority modality key, if any is present.
    pub fn retain_primary_modality(self) -> Self {
        let Some(key) = MODALITY_PRIORITY
            .iter()
            .find(|key| self.values.contains_key(**key))
        else {
            return self;
        };
        let mut values = self.values;
        let mut narrowed = BTreeMap::new();
        if let Some(value) = values.remove(*key) {
            narrowed.insert(key.to_string(), value);
        }
        Self { values: narrowed }
    }

    /// Moves every tensor to `device`. Prompts stay on the host.
    pub fn to_device(self, device: Device) -> Self {
        let values = self
            .values
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    InputValue::Tensor(tensor) if key != PROMPT => {
                        InputValue::Tensor(tensor.to(device))
                    }
                    other => other,
                };
                (key, value)
            })
            .collect();
        Self { values }
    }

    pub(crate) fn into_inner(self) -> BTreeMap<String, InputValue> {
        self.values
    }
}
