//! Minimal dense tensor used to carry synthetic inputs to a backend.
//!
//! Tensors only hold what a backend needs to consume a dummy input: a shape,
//! a typed flat buffer in row-major order and the device they are placed on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{BackendError, BackendResult};

/// Element type of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    I64,
    F32,
}

/// Placement of a tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    #[default]
    Cpu,
    Cuda(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(index) => write!(f, "cuda:{}", index),
        }
    }
}

impl FromStr for Device {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|index| index.parse::<usize>().ok())
                .map(Device::Cuda)
                .ok_or_else(|| BackendError::UnknownDevice {
                    device: other.to_string(),
                }),
        }
    }
}

impl Serialize for Device {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Device {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Flat storage of a tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    I64(Vec<i64>),
    F32(Vec<f32>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            TensorData::I64(values) => values.len(),
            TensorData::F32(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slice(&self, start: usize, end: usize) -> TensorData {
        match self {
            TensorData::I64(values) => TensorData::I64(values[start..end].to_vec()),
            TensorData::F32(values) => TensorData::F32(values[start..end].to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
    device: Device,
}

impl Tensor {
    /// Builds a host tensor, checking that the buffer matches the shape.
    pub fn new(shape: Vec<usize>, data: TensorData) -> BackendResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(BackendError::ShapeMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            data,
            device: Device::Cpu,
        })
    }

    pub(crate) fn from_i64(shape: Vec<usize>, values: Vec<i64>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        Self {
            shape,
            data: TensorData::I64(values),
            device: Device::Cpu,
        }
    }

    pub(crate) fn from_f32(shape: Vec<usize>, values: Vec<f32>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        Self {
            shape,
            data: TensorData::F32(values),
            device: Device::Cpu,
        }
    }

    pub fn full_i64(shape: Vec<usize>, value: i64) -> Self {
        let len = shape.iter().product();
        Self::from_i64(shape, vec![value; len])
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn dtype(&self) -> DType {
        match self.data {
            TensorData::I64(_) => DType::I64,
            TensorData::F32(_) => DType::F32,
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.data {
            TensorData::I64(values) => Some(values),
            TensorData::F32(_) => None,
        }
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            TensorData::F32(values) => Some(values),
            TensorData::I64(_) => None,
        }
    }

    /// Returns the tensor placed on `device`.
    pub fn to(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Returns entry `index` along the leading dimension, dropping that dimension.
    pub fn select_first(&self, index: usize) -> Option<Tensor> {
        let (&rows, rest) = self.shape.split_first()?;
        if index >= rows {
            return None;
        }
        let stride: usize = rest.iter().product();
        Some(Tensor {
            shape: rest.to_vec(),
            data: self.data.slice(index * stride, (index + 1) * stride),
            device: self.device,
        })
    }
}
