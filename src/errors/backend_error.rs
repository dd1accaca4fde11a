//! Error types reported by backends.

use thiserror::Error;

use crate::tensor::Device;

/// Errors a backend can return from any capability call.
///
/// The benchmark engine never inspects or retries these, it only propagates them.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend does not support '{operation}'")]
    Unsupported { operation: String },

    #[error("Unknown device '{device}'. Expected cpu, cuda or cuda:<index>")]
    UnknownDevice { device: String },

    #[error("Input '{input}' is on {actual} but the backend runs on {expected}")]
    DeviceMismatch {
        input: String,
        expected: Device,
        actual: Device,
    },

    #[error("Tensor shape {shape:?} expects {expected} elements, got {actual}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("Backend {operation} failed: {message}")]
    Execution { operation: String, message: String },
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;
