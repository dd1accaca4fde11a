//! Tests for labeled dataset generation.

use inference_bench::errors::GeneratorError;
use inference_bench::generators::{ColumnType, DatasetGenerator, seeded_rng};
use inference_bench::input_shapes::InputShapes;
use inference_bench::tensor::DType;

fn dataset_shapes(dataset_size: usize) -> InputShapes {
    InputShapes::from_pairs([
        ("dataset_size", dataset_size),
        ("sequence_length", 8),
        ("num_choices", 2),
    ])
}

#[cfg(test)]
mod dataset_generator_tests {
    use super::*;

    #[test]
    fn test_dataset_size_becomes_batch_size() {
        let generator =
            DatasetGenerator::new("text-classification", dataset_shapes(10), seeded_rng(0))
                .unwrap();
        let shapes = generator.dataset_shapes();
        assert_eq!(shapes.get("batch_size"), Some(10));
        assert!(!shapes.contains("dataset_size"));
    }

    #[test]
    fn test_text_classification_dataset_has_labels() {
        let mut generator =
            DatasetGenerator::new("text-classification", dataset_shapes(10), seeded_rng(0))
                .unwrap();
        let dataset = generator.generate().unwrap();

        assert_eq!(dataset.len(), 10);
        assert_eq!(
            dataset.column_names().collect::<Vec<_>>(),
            vec!["attention_mask", "input_ids", "labels", "token_type_ids"]
        );
        assert_eq!(
            dataset.features()["labels"],
            ColumnType::Tensor {
                dtype: DType::I64,
                rank: 0
            }
        );

        for row in dataset.iter() {
            assert_eq!(row.tensor("input_ids").unwrap().shape(), &[8]);
            let label = row.tensor("labels").unwrap().as_i64().unwrap()[0];
            assert!((0..2).contains(&label));
        }
    }

    #[test]
    fn test_multiple_choice_rows_keep_choice_dimension() {
        let mut generator =
            DatasetGenerator::new("multiple-choice", dataset_shapes(4), seeded_rng(0)).unwrap();
        let dataset = generator.generate().unwrap();

        let row = dataset.row(0).unwrap();
        assert_eq!(row.tensor("input_ids").unwrap().shape(), &[2, 8]);
        assert!(dataset.row(4).is_none());
    }

    #[test]
    fn test_missing_dataset_size_is_an_error() {
        let result = DatasetGenerator::new(
            "fill-mask",
            InputShapes::from_pairs([("sequence_length", 8)]),
            seeded_rng(0),
        );
        assert!(matches!(
            result,
            Err(GeneratorError::MissingShape { ref key, .. }) if key == "dataset_size"
        ));
    }

    #[test]
    fn test_unsupported_task_lists_no_model_types() {
        let result = DatasetGenerator::new("protein-folding", dataset_shapes(4), seeded_rng(0));
        let error = match result {
            Err(error) => error,
            Ok(_) => panic!("protein-folding should not be supported"),
        };

        let message = error.to_string();
        assert!(message.starts_with("Task 'protein-folding' is not supported"));
        assert!(!message.contains("model type"));

        match error {
            GeneratorError::UnsupportedTask {
                supported_tasks,
                supported_model_types,
                ..
            } => {
                assert!(!supported_tasks.is_empty());
                assert!(supported_model_types.is_empty());
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_same_seed_gives_identical_datasets() {
        let first = DatasetGenerator::new("token-classification", dataset_shapes(6), seeded_rng(9))
            .unwrap()
            .generate()
            .unwrap();
        let second = DatasetGenerator::new("token-classification", dataset_shapes(6), seeded_rng(9))
            .unwrap()
            .generate()
            .unwrap();
        assert_eq!(first, second);
    }
}
