//! Synthetic input generation.
//!
//! Shape generators synthesize shape-correct tensors for a task family or a
//! specific model type. The input generator picks one for inference and adapts
//! its output to forward or generate usage; the dataset generator turns a
//! labeled batch into a dataset for training runs.

pub mod dataset;
pub mod dataset_generator;
pub mod dummy_input;
pub mod input_generator;
pub mod model_type_generators;
pub mod random;
pub mod task_generators;

pub use dataset::{ColumnType, Dataset};
pub use dataset_generator::DatasetGenerator;
pub use dummy_input::{DummyInput, InputValue, MODALITY_PRIORITY};
pub use input_generator::{InputGenerator, InputMode};
pub use model_type_generators::{
    ConfiguredGenerator, ModelTypeGenerator, model_type_generator, supported_model_types,
};
pub use random::seeded_rng;
pub use task_generators::{ShapeGenerator, TASKS_TO_GENERATORS, supported_tasks, task_generator};
