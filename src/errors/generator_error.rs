//! Error types for dummy input and dataset generation.

use thiserror::Error;

/// Errors raised while selecting or running a shape generator.
///
/// These are configuration errors: they surface at construction time and are
/// not recovered from internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error(
        "{}",
        unsupported_task_message(
            .task,
            .model_type.as_deref(),
            .supported_tasks,
            .supported_model_types
        )
    )]
    UnsupportedTask {
        task: String,
        model_type: Option<String>,
        supported_tasks: Vec<String>,
        supported_model_types: Vec<String>,
    },

    #[error("Input shape '{key}' is required by the {generator} generator but was not provided")]
    MissingShape { key: String, generator: String },

    #[error("Input shape '{key}' must be greater than 0 for the {generator} generator")]
    ZeroShape { key: String, generator: String },

    #[error("Unknown input mode '{mode}'. Supported: forward, generate")]
    UnknownMode { mode: String },
}

pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;

/// Names the model type only when one was looked up.
fn unsupported_task_message(
    task: &str,
    model_type: Option<&str>,
    supported_tasks: &[String],
    supported_model_types: &[String],
) -> String {
    let mut message = match model_type {
        Some(model_type) => format!(
            "Neither task '{}' nor model type '{}' is supported. Available tasks: {:?}",
            task, model_type, supported_tasks
        ),
        None => format!(
            "Task '{}' is not supported. Available tasks: {:?}",
            task, supported_tasks
        ),
    };
    if !supported_model_types.is_empty() {
        message.push_str(&format!(
            ". Available model types: {:?}",
            supported_model_types
        ));
    }
    message
}
