//! Labeled synthetic datasets for training benchmarks.

use log::info;
use rand_chacha::ChaCha8Rng;

use super::dataset::Dataset;
use super::task_generators::{ShapeGenerator, supported_tasks, task_generator};
use crate::errors::{GeneratorError, GeneratorResult};
use crate::input_shapes::{BATCH_SIZE, DATASET_SIZE, InputShapes};

/// Builds a dataset of `dataset_size` labeled examples as one generated batch.
pub struct DatasetGenerator {
    task_generator: &'static dyn ShapeGenerator,
    dataset_shapes: InputShapes,
    rng: ChaCha8Rng,
}

impl DatasetGenerator {
    pub fn new(
        task: &str,
        mut dataset_shapes: InputShapes,
        rng: ChaCha8Rng,
    ) -> GeneratorResult<Self> {
        let Some(task_generator) = task_generator(task) else {
            return Err(GeneratorError::UnsupportedTask {
                task: task.to_string(),
                model_type: None,
                supported_tasks: supported_tasks(),
                supported_model_types: Vec::new(),
            });
        };
        info!("\t+ Using {} task generator", task_generator.name());

        let dataset_size = dataset_shapes
            .remove(DATASET_SIZE)
            .ok_or_else(|| GeneratorError::MissingShape {
                key: DATASET_SIZE.to_string(),
                generator: task_generator.name().to_string(),
            })?;
        dataset_shapes.insert(BATCH_SIZE, dataset_size);

        Ok(Self {
            task_generator,
            dataset_shapes,
            rng,
        })
    }

    pub fn dataset_shapes(&self) -> &InputShapes {
        &self.dataset_shapes
    }

    pub fn generate(&mut self) -> GeneratorResult<Dataset> {
        let batch = self
            .task_generator
            .generate(&self.dataset_shapes, true, &mut self.rng)?;
        Ok(Dataset::from_batch(batch))
    }
}
