//! Deterministic backend and trackers shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use inference_bench::backends::{Backend, GenerationOptions, TrainingArguments};
use inference_bench::errors::{BackendError, BackendResult};
use inference_bench::generators::{Dataset, DummyInput};
use inference_bench::input_shapes::InputShapes;
use inference_bench::tensor::Device;
use inference_bench::trackers::{LatencyTracker, MemoryTracker};

/// Reports the same latency for every closed window.
pub struct FixedLatencyTracker {
    per_call: f64,
    open: bool,
    latencies: Vec<f64>,
}

impl FixedLatencyTracker {
    pub fn new(per_call: f64) -> Self {
        Self {
            per_call,
            open: false,
            latencies: Vec::new(),
        }
    }
}

impl LatencyTracker for FixedLatencyTracker {
    fn start(&mut self) {
        self.open = true;
    }

    fn stop(&mut self) {
        if std::mem::take(&mut self.open) {
            self.latencies.push(self.per_call);
        }
    }

    fn latencies(&self) -> &[f64] {
        &self.latencies
    }
}

/// Reports a fixed peak once a window has been closed.
pub struct FixedMemoryTracker {
    peak_mb: u64,
    closed_windows: usize,
}

impl MemoryTracker for FixedMemoryTracker {
    fn start(&mut self, _interval: Duration) {}

    fn stop(&mut self) {
        self.closed_windows += 1;
    }

    fn peak_memory_mb(&self) -> u64 {
        if self.closed_windows > 0 { self.peak_mb } else { 0 }
    }
}

/// Counts calls and fails on request; every tracked call "takes" `per_call` seconds.
pub struct MockBackend {
    pub task: String,
    pub device: Device,
    pub per_call: f64,
    pub peak_mb: u64,
    pub can_generate: bool,
    pub model_shapes: InputShapes,
    pub fail_forward_at: Option<usize>,
    pub fail_clean: bool,
    pub forward_calls: usize,
    pub generate_calls: usize,
    pub prepare_calls: usize,
    pub clean_calls: usize,
    pub train_calls: Vec<TrainingArguments>,
    pub trained_rows: usize,
    pub first_forward_input: Option<DummyInput>,
    pub last_forward_input: Option<DummyInput>,
    pub last_generate_input: Option<DummyInput>,
    pub last_generate_options: Option<GenerationOptions>,
}

impl MockBackend {
    pub fn new(task: &str, per_call: f64) -> Self {
        Self {
            task: task.to_string(),
            device: Device::Cpu,
            per_call,
            peak_mb: 0,
            can_generate: false,
            model_shapes: InputShapes::new(),
            fail_forward_at: None,
            fail_clean: false,
            forward_calls: 0,
            generate_calls: 0,
            prepare_calls: 0,
            clean_calls: 0,
            train_calls: Vec::new(),
            trained_rows: 0,
            first_forward_input: None,
            last_forward_input: None,
            last_generate_input: None,
            last_generate_options: None,
        }
    }

    pub fn generating(mut self) -> Self {
        self.can_generate = true;
        self
    }

    pub fn on(mut self, device: Device) -> Self {
        self.device = device;
        self
    }
}

impl Backend for MockBackend {
    type Output = usize;

    fn name(&self) -> &str {
        "mock"
    }

    fn task(&self) -> &str {
        &self.task
    }

    fn device(&self) -> Device {
        self.device
    }

    fn model_shapes(&self) -> InputShapes {
        self.model_shapes.clone()
    }

    fn is_text_generation_model(&self) -> bool {
        self.can_generate
    }

    fn prepare_for_inference(&mut self, _input_shapes: &InputShapes) -> BackendResult<()> {
        self.prepare_calls += 1;
        Ok(())
    }

    fn forward(&mut self, input: &DummyInput) -> BackendResult<usize> {
        self.forward_calls += 1;
        if self.fail_forward_at == Some(self.forward_calls) {
            return Err(BackendError::Execution {
                operation: "forward".to_string(),
                message: "simulated failure".to_string(),
            });
        }
        if self.first_forward_input.is_none() {
            self.first_forward_input = Some(input.clone());
        }
        self.last_forward_input = Some(input.clone());
        Ok(input.len())
    }

    fn generate(
        &mut self,
        input: &DummyInput,
        options: &GenerationOptions,
    ) -> BackendResult<usize> {
        self.generate_calls += 1;
        self.last_generate_input = Some(input.clone());
        self.last_generate_options = Some(*options);
        Ok(options.max_new_tokens)
    }

    fn train(&mut self, dataset: &Dataset, arguments: &TrainingArguments) -> BackendResult<()> {
        self.trained_rows = dataset.len();
        self.train_calls.push(*arguments);
        Ok(())
    }

    fn clean(&mut self) -> BackendResult<()> {
        self.clean_calls += 1;
        if self.fail_clean {
            return Err(BackendError::Execution {
                operation: "clean".to_string(),
                message: "simulated cleanup failure".to_string(),
            });
        }
        Ok(())
    }

    fn latency_tracker(&self) -> Box<dyn LatencyTracker> {
        Box::new(FixedLatencyTracker::new(self.per_call))
    }

    fn memory_tracker(&self) -> Box<dyn MemoryTracker> {
        Box::new(FixedMemoryTracker {
            peak_mb: self.peak_mb,
            closed_windows: 0,
        })
    }
}
