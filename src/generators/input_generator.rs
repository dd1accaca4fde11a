//! Dummy input selection for inference benchmarks.

use std::fmt;
use std::str::FromStr;

use log::info;
use rand_chacha::ChaCha8Rng;

use super::dummy_input::DummyInput;
use super::model_type_generators::{ConfiguredGenerator, supported_model_types};
use super::task_generators::{ShapeGenerator, supported_tasks, task_generator};
use crate::errors::{GeneratorError, GeneratorResult};
use crate::input_shapes::InputShapes;
use crate::pretrained_config::PretrainedConfig;

/// How the generated input will be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A plain forward pass, fed every generated key.
    Forward,
    /// Autoregressive generation, fed only the primary modality.
    Generate,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Forward => write!(f, "forward"),
            InputMode::Generate => write!(f, "generate"),
        }
    }
}

impl FromStr for InputMode {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(InputMode::Forward),
            "generate" => Ok(InputMode::Generate),
            other => Err(GeneratorError::UnknownMode {
                mode: other.to_string(),
            }),
        }
    }
}

enum BoundGenerator {
    ModelType(ConfiguredGenerator),
    Task(&'static dyn ShapeGenerator),
}

impl BoundGenerator {
    fn as_shape_generator(&self) -> &dyn ShapeGenerator {
        match self {
            BoundGenerator::ModelType(generator) => generator,
            BoundGenerator::Task(generator) => *generator,
        }
    }
}

pub struct InputGenerator {
    generator: BoundGenerator,
    input_shapes: InputShapes,
    rng: ChaCha8Rng,
}

impl InputGenerator {
    /// Binds the most specific generator available for a task and model.
    ///
    /// A supported model type wins over the task. An unsupported model type
    /// falls back to the task registry.
    pub fn new(
        task: &str,
        input_shapes: InputShapes,
        pretrained_config: Option<&PretrainedConfig>,
        rng: ChaCha8Rng,
    ) -> GeneratorResult<Self> {
        let model_type_match = pretrained_config.and_then(ConfiguredGenerator::for_config);

        let generator = if let Some(generator) = model_type_match {
            info!("\t+ Using {} model type generator", generator.name());
            BoundGenerator::ModelType(generator)
        } else if let Some(generator) = task_generator(task) {
            info!("\t+ Using {} task generator", generator.name());
            BoundGenerator::Task(generator)
        } else {
            return Err(GeneratorError::UnsupportedTask {
                task: task.to_string(),
                model_type: pretrained_config.map(|config| config.model_type.clone()),
                supported_tasks: supported_tasks(),
                supported_model_types: supported_model_types(),
            });
        };

        Ok(Self {
            generator,
            input_shapes,
            rng,
        })
    }

    pub fn input_shapes(&self) -> &InputShapes {
        &self.input_shapes
    }

    pub fn generate(&mut self, mode: InputMode) -> GeneratorResult<DummyInput> {
        let dummy_input = self.generator.as_shape_generator().generate(
            &self.input_shapes,
            false,
            &mut self.rng,
        )?;

        Ok(match mode {
            InputMode::Forward => dummy_input,
            InputMode::Generate => dummy_input.retain_primary_modality(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::random::seeded_rng;

    #[test]
    fn mode_parsing() {
        assert_eq!("forward".parse::<InputMode>().unwrap(), InputMode::Forward);
        assert_eq!("generate".parse::<InputMode>().unwrap(), InputMode::Generate);
        assert!(matches!(
            "backward".parse::<InputMode>(),
            Err(GeneratorError::UnknownMode { .. })
        ));
    }

    #[test]
    fn unsupported_model_type_falls_back_to_task() {
        let config = PretrainedConfig::new("bert");
        let mut generator = InputGenerator::new(
            "fill-mask",
            InputShapes::inference_defaults(),
            Some(&config),
            seeded_rng(0),
        )
        .unwrap();
        assert!(generator.generate(InputMode::Forward).unwrap().contains("input_ids"));
    }
}
