//! Error types for the benchmark harness.
//!
//! Each concern owns a specific error enum instead of a generic wrapper like
//! `anyhow`, so callers can match on the failure that interrupted a run.

mod backend_error;
mod generator_error;

pub use backend_error::{BackendError, BackendResult};
pub use generator_error::{GeneratorError, GeneratorResult};
