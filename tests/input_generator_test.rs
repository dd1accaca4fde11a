//! Tests for dummy input selection and generation through the public API.

use inference_bench::errors::GeneratorError;
use inference_bench::generators::{
    InputGenerator, InputMode, MODALITY_PRIORITY, seeded_rng, supported_model_types,
    supported_tasks,
};
use inference_bench::input_shapes::InputShapes;
use inference_bench::pretrained_config::PretrainedConfig;
use inference_bench::tensor::DType;

fn text_shapes() -> InputShapes {
    InputShapes::from_pairs([("batch_size", 2), ("sequence_length", 16)])
}

fn generator(task: &str, shapes: InputShapes, seed: u64) -> InputGenerator {
    InputGenerator::new(task, shapes, None, seeded_rng(seed)).unwrap()
}

#[cfg(test)]
mod forward_mode_tests {
    use super::*;

    #[test]
    fn test_text_classification_inputs_have_no_labels() {
        let mut generator = generator("text-classification", text_shapes(), 42);
        let input = generator.generate(InputMode::Forward).unwrap();

        assert_eq!(
            input.keys().collect::<Vec<_>>(),
            vec!["attention_mask", "input_ids", "token_type_ids"]
        );
        let input_ids = input.tensor("input_ids").unwrap();
        assert_eq!(input_ids.shape(), &[2, 16]);
        assert_eq!(input_ids.dtype(), DType::I64);
        assert!(input.tensor("attention_mask").unwrap().as_i64().unwrap().iter().all(|&v| v == 1));
        assert!(!input.contains("labels"));
    }

    #[test]
    fn test_missing_shape_is_reported_by_name() {
        let mut generator = generator(
            "fill-mask",
            InputShapes::from_pairs([("batch_size", 2)]),
            42,
        );
        assert_eq!(
            generator.generate(InputMode::Forward).unwrap_err(),
            GeneratorError::MissingShape {
                key: "sequence_length".to_string(),
                generator: "fill-mask".to_string(),
            }
        );
    }

    #[test]
    fn test_same_seed_gives_identical_inputs() {
        for task in ["fill-mask", "image-classification", "automatic-speech-recognition"] {
            let first = generator(task, InputShapes::inference_defaults(), 7)
                .generate(InputMode::Forward)
                .unwrap();
            let second = generator(task, InputShapes::inference_defaults(), 7)
                .generate(InputMode::Forward)
                .unwrap();
            assert_eq!(first, second, "task {}", task);
        }

        let other_seed = generator("fill-mask", InputShapes::inference_defaults(), 8)
            .generate(InputMode::Forward)
            .unwrap();
        let seeded = generator("fill-mask", InputShapes::inference_defaults(), 7)
            .generate(InputMode::Forward)
            .unwrap();
        assert_ne!(other_seed, seeded);
    }
}

#[cfg(test)]
mod generate_mode_tests {
    use super::*;

    #[test]
    fn test_text_generation_keeps_only_input_ids() {
        let mut generator = generator("text-generation", text_shapes(), 42);
        let input = generator.generate(InputMode::Generate).unwrap();
        assert_eq!(input.keys().collect::<Vec<_>>(), vec!["input_ids"]);
    }

    #[test]
    fn test_every_task_keeps_at_most_one_modality() {
        for task in supported_tasks() {
            let mut generator = generator(&task, InputShapes::inference_defaults(), 1);
            let input = generator.generate(InputMode::Generate).unwrap();
            let modalities = MODALITY_PRIORITY
                .iter()
                .filter(|key| input.contains(key))
                .count();

            if modalities == 0 {
                assert!(input.contains("prompt"), "task {}", task);
            } else {
                assert_eq!(input.len(), 1, "task {}", task);
            }
        }
    }

    #[test]
    fn test_speech_recognition_prefers_raw_audio() {
        let mut generator = generator(
            "automatic-speech-recognition",
            InputShapes::inference_defaults(),
            3,
        );
        let input = generator.generate(InputMode::Generate).unwrap();
        assert_eq!(input.keys().collect::<Vec<_>>(), vec!["input_values"]);
    }
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[test]
    fn test_unsupported_task_lists_every_supported_value() {
        let config = PretrainedConfig::new("unknown-architecture");
        let result = InputGenerator::new(
            "protein-folding",
            text_shapes(),
            Some(&config),
            seeded_rng(0),
        );

        match result {
            Err(GeneratorError::UnsupportedTask {
                task,
                model_type,
                supported_tasks: tasks,
                supported_model_types: model_types,
            }) => {
                assert_eq!(task, "protein-folding");
                assert_eq!(model_type.as_deref(), Some("unknown-architecture"));
                assert_eq!(tasks, supported_tasks());
                assert_eq!(model_types, supported_model_types());
                assert!(tasks.contains(&"text-classification".to_string()));
                assert!(model_types.contains(&"whisper".to_string()));
            }
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("protein-folding should not be supported"),
        }
    }

    #[test]
    fn test_model_type_generator_wins_over_task() {
        let config = PretrainedConfig {
            decoder_start_token_id: Some(50258),
            ..PretrainedConfig::new("whisper")
        };
        let mut generator = InputGenerator::new(
            "automatic-speech-recognition",
            InputShapes::inference_defaults(),
            Some(&config),
            seeded_rng(0),
        )
        .unwrap();

        let input = generator.generate(InputMode::Forward).unwrap();
        assert!(input.contains("input_features"));
        assert!(input.contains("decoder_input_ids"));
        assert!(!input.contains("input_values"));
        assert_eq!(
            input.tensor("decoder_input_ids").unwrap().as_i64().unwrap(),
            &[50258, 50258]
        );
    }
}
