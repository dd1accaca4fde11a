//! Named input dimensions consumed by the shape generators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{GeneratorError, GeneratorResult};

pub const BATCH_SIZE: &str = "batch_size";
pub const SEQUENCE_LENGTH: &str = "sequence_length";
pub const NUM_CHOICES: &str = "num_choices";
pub const FEATURE_SIZE: &str = "feature_size";
pub const NB_MAX_FRAMES: &str = "nb_max_frames";
pub const AUDIO_SEQUENCE_LENGTH: &str = "audio_sequence_length";
pub const DATASET_SIZE: &str = "dataset_size";

/// Mapping from dimension name to size.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputShapes(BTreeMap<String, usize>);

impl InputShapes {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Default inference shapes covering every task family.
    pub fn inference_defaults() -> Self {
        Self::from_pairs([
            (BATCH_SIZE, 2),
            (SEQUENCE_LENGTH, 16),
            (NUM_CHOICES, 1),
            (FEATURE_SIZE, 80),
            (NB_MAX_FRAMES, 3000),
            (AUDIO_SEQUENCE_LENGTH, 16000),
        ])
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    pub fn with(mut self, key: &str, value: usize) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: usize) -> Option<usize> {
        self.0.insert(key.to_string(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<usize> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get_or(&self, key: &str, default: usize) -> usize {
        self.get(key).unwrap_or(default)
    }

    /// Looks up a dimension the named generator cannot work without.
    pub fn require(&self, key: &str, generator: &str) -> GeneratorResult<usize> {
        match self.get(key) {
            Some(0) => Err(GeneratorError::ZeroShape {
                key: key.to_string(),
                generator: generator.to_string(),
            }),
            Some(value) => Ok(value),
            None => Err(GeneratorError::MissingShape {
                key: key.to_string(),
                generator: generator.to_string(),
            }),
        }
    }

    /// Adds every dimension of `other` not already present. Existing values win.
    pub fn merge_missing(&mut self, other: &InputShapes) {
        for (key, value) in &other.0 {
            self.0.entry(key.clone()).or_insert(*value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
