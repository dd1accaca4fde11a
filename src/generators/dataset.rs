//! Column-typed in-memory dataset built from one generated batch.

use std::collections::BTreeMap;

use super::dummy_input::{DummyInput, InputValue};
use crate::tensor::DType;

/// Element type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Tensor { dtype: DType, rank: usize },
    Text,
}

/// A labeled synthetic dataset. Row `i` of every column belongs to example `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: BTreeMap<String, InputValue>,
    num_rows: usize,
}

impl Dataset {
    /// Builds a dataset from a batch whose columns share the leading dimension.
    pub(crate) fn from_batch(batch: DummyInput) -> Self {
        let columns = batch.into_inner();
        let num_rows = columns
            .values()
            .map(InputValue::leading_dim)
            .min()
            .unwrap_or(0);
        Self { columns, num_rows }
    }

    pub fn len(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&InputValue> {
        self.columns.get(name)
    }

    /// Per-example type of each column.
    pub fn features(&self) -> BTreeMap<&str, ColumnType> {
        self.columns
            .iter()
            .map(|(name, column)| {
                let column_type = match column {
                    InputValue::Tensor(tensor) => ColumnType::Tensor {
                        dtype: tensor.dtype(),
                        rank: tensor.rank().saturating_sub(1),
                    },
                    InputValue::Prompts(_) => ColumnType::Text,
                };
                (name.as_str(), column_type)
            })
            .collect()
    }

    /// Returns example `index` with the leading dimension removed.
    pub fn row(&self, index: usize) -> Option<DummyInput> {
        if index >= self.num_rows {
            return None;
        }
        let mut row = DummyInput::new();
        for (name, column) in &self.columns {
            row.insert(name, column.select_first(index)?);
        }
        Some(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = DummyInput> + '_ {
        (0..self.num_rows).filter_map(move |index| self.row(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Tensor;

    fn sample_dataset() -> Dataset {
        let mut batch = DummyInput::new();
        batch.insert("input_ids", Tensor::full_i64(vec![3, 4], 7));
        batch.insert("labels", Tensor::full_i64(vec![3], 1));
        batch.insert(
            "prompt",
            InputValue::Prompts(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
        );
        Dataset::from_batch(batch)
    }

    #[test]
    fn rows_drop_the_leading_dimension() {
        let dataset = sample_dataset();
        assert_eq!(dataset.len(), 3);

        let row = dataset.row(1).unwrap();
        assert_eq!(row.tensor("input_ids").unwrap().shape(), &[4]);
        assert_eq!(row.tensor("labels").unwrap().shape(), &[] as &[usize]);
        assert_eq!(
            row.get("prompt").and_then(InputValue::as_prompts),
            Some(&["b".to_string()][..])
        );
        assert!(dataset.row(3).is_none());
    }

    #[test]
    fn features_describe_one_example() {
        let dataset = sample_dataset();
        let features = dataset.features();
        assert_eq!(
            features["input_ids"],
            ColumnType::Tensor {
                dtype: DType::I64,
                rank: 1
            }
        );
        assert_eq!(features["prompt"], ColumnType::Text);
        assert_eq!(dataset.iter().count(), 3);
    }

    #[test]
    fn empty_batch_gives_empty_dataset() {
        let dataset = Dataset::from_batch(DummyInput::new());
        assert!(dataset.is_empty());
        assert_eq!(dataset.iter().count(), 0);
    }
}
