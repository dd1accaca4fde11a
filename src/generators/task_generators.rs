//! Task-level dummy input generators.
//!
//! Every supported task identifier is registered in [`TASKS_TO_GENERATORS`]
//! against a [`ShapeGenerator`]. Supporting a new task means adding a row to
//! that table; the input and dataset generators only look tasks up.

use rand::{Rng, RngCore};

use super::dummy_input::{
    ATTENTION_MASK, DummyInput, INPUT_FEATURES, INPUT_IDS, INPUT_VALUES, InputValue, PIXEL_VALUES,
    PROMPT, TOKEN_TYPE_IDS,
};
use super::random::{random_floats, random_ints};
use crate::errors::GeneratorResult;
use crate::input_shapes::{
    AUDIO_SEQUENCE_LENGTH, BATCH_SIZE, FEATURE_SIZE, InputShapes, NB_MAX_FRAMES, NUM_CHOICES,
    SEQUENCE_LENGTH,
};
use crate::tensor::Tensor;

pub const DEFAULT_VOCAB_SIZE: usize = 2;
pub const DEFAULT_NUM_LABELS: usize = 2;
pub const DEFAULT_NUM_CHANNELS: usize = 3;
pub const DEFAULT_IMAGE_SIZE: usize = 224;
pub const DEFAULT_NUM_QUERIES: usize = 100;

const DIFFUSION_PROMPTS: [&str; 4] = [
    "Surrealist painting of a floating island with giant clock gears",
    "A lighthouse on a cliff at dawn, oil on canvas",
    "Macro photograph of a dew covered spider web",
    "An astronaut riding a horse through a neon city",
];

/// Produces one batch of dummy inputs for a task family.
pub trait ShapeGenerator: Sync {
    /// Identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Generates one batch. With `with_labels`, the training targets of the
    /// task are attached as extra keys.
    fn generate(
        &self,
        shapes: &InputShapes,
        with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput>;
}

/// Label layout for text tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLabels {
    None,
    /// Next-token style targets shaped like `input_ids`.
    Tokens,
    /// One class per sequence.
    SequenceClass,
    /// One class per token.
    TokenClass,
    /// Answer span start and end positions.
    Spans,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLabels {
    None,
    Class,
    Mask,
    Detection,
    Tokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioLabels {
    Class,
    Frame,
}

pub struct TextGenerator {
    pub name: &'static str,
    pub token_type_ids: bool,
    pub labels: TextLabels,
}

pub struct MultipleChoiceGenerator;

pub struct ImageGenerator {
    pub name: &'static str,
    pub labels: ImageLabels,
}

pub struct ZeroShotImageGenerator;

pub struct AudioGenerator {
    pub name: &'static str,
    pub labels: AudioLabels,
}

pub struct SpeechRecognitionGenerator;

pub struct PromptGenerator {
    pub name: &'static str,
}

pub static TASKS_TO_GENERATORS: &[(&str, &dyn ShapeGenerator)] = &[
    (
        "conversational",
        &TextGenerator {
            name: "conversational",
            token_type_ids: false,
            labels: TextLabels::Tokens,
        },
    ),
    (
        "feature-extraction",
        &TextGenerator {
            name: "feature-extraction",
            token_type_ids: false,
            labels: TextLabels::None,
        },
    ),
    (
        "fill-mask",
        &TextGenerator {
            name: "fill-mask",
            token_type_ids: false,
            labels: TextLabels::Tokens,
        },
    ),
    (
        "text-generation",
        &TextGenerator {
            name: "text-generation",
            token_type_ids: false,
            labels: TextLabels::Tokens,
        },
    ),
    (
        "text2text-generation",
        &TextGenerator {
            name: "text2text-generation",
            token_type_ids: false,
            labels: TextLabels::Tokens,
        },
    ),
    (
        "text-classification",
        &TextGenerator {
            name: "text-classification",
            token_type_ids: true,
            labels: TextLabels::SequenceClass,
        },
    ),
    (
        "token-classification",
        &TextGenerator {
            name: "token-classification",
            token_type_ids: true,
            labels: TextLabels::TokenClass,
        },
    ),
    (
        "question-answering",
        &TextGenerator {
            name: "question-answering",
            token_type_ids: true,
            labels: TextLabels::Spans,
        },
    ),
    ("multiple-choice", &MultipleChoiceGenerator),
    (
        "image-classification",
        &ImageGenerator {
            name: "image-classification",
            labels: ImageLabels::Class,
        },
    ),
    (
        "masked-im",
        &ImageGenerator {
            name: "masked-im",
            labels: ImageLabels::None,
        },
    ),
    (
        "image-segmentation",
        &ImageGenerator {
            name: "image-segmentation",
            labels: ImageLabels::Mask,
        },
    ),
    (
        "semantic-segmentation",
        &ImageGenerator {
            name: "semantic-segmentation",
            labels: ImageLabels::Mask,
        },
    ),
    (
        "object-detection",
        &ImageGenerator {
            name: "object-detection",
            labels: ImageLabels::Detection,
        },
    ),
    (
        "image-to-text",
        &ImageGenerator {
            name: "image-to-text",
            labels: ImageLabels::Tokens,
        },
    ),
    ("zero-shot-image-classification", &ZeroShotImageGenerator),
    (
        "audio-classification",
        &AudioGenerator {
            name: "audio-classification",
            labels: AudioLabels::Class,
        },
    ),
    (
        "audio-xvector",
        &AudioGenerator {
            name: "audio-xvector",
            labels: AudioLabels::Class,
        },
    ),
    (
        "audio-frame-classification",
        &AudioGenerator {
            name: "audio-frame-classification",
            labels: AudioLabels::Frame,
        },
    ),
    ("automatic-speech-recognition", &SpeechRecognitionGenerator),
    (
        "stable-diffusion",
        &PromptGenerator {
            name: "stable-diffusion",
        },
    ),
    (
        "stable-diffusion-xl",
        &PromptGenerator {
            name: "stable-diffusion-xl",
        },
    ),
];

/// Looks up the generator registered for `task`.
pub fn task_generator(task: &str) -> Option<&'static dyn ShapeGenerator> {
    TASKS_TO_GENERATORS
        .iter()
        .find(|(name, _)| *name == task)
        .map(|(_, generator)| *generator)
}

pub fn supported_tasks() -> Vec<String> {
    TASKS_TO_GENERATORS
        .iter()
        .map(|(name, _)| name.to_string())
        .collect()
}

fn vocab_size(shapes: &InputShapes) -> i64 {
    shapes.get_or("vocab_size", DEFAULT_VOCAB_SIZE) as i64
}

fn num_labels(shapes: &InputShapes) -> i64 {
    shapes.get_or("num_labels", DEFAULT_NUM_LABELS) as i64
}

/// Token ids, an all-ones attention mask and optional all-zeros token types.
pub(crate) fn text_inputs(
    shape: Vec<usize>,
    vocab_size: i64,
    token_type_ids: bool,
    rng: &mut dyn RngCore,
) -> DummyInput {
    let mut input = DummyInput::new();
    input.insert(INPUT_IDS, random_ints(rng, shape.clone(), 0, vocab_size));
    input.insert(ATTENTION_MASK, Tensor::full_i64(shape.clone(), 1));
    if token_type_ids {
        input.insert(TOKEN_TYPE_IDS, Tensor::full_i64(shape, 0));
    }
    input
}

pub(crate) fn image_shape(shapes: &InputShapes, batch_size: usize) -> Vec<usize> {
    vec![
        batch_size,
        shapes.get_or("num_channels", DEFAULT_NUM_CHANNELS),
        shapes.get_or("height", DEFAULT_IMAGE_SIZE),
        shapes.get_or("width", DEFAULT_IMAGE_SIZE),
    ]
}

impl ShapeGenerator for TextGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.name)?;
        let sequence_length = shapes.require(SEQUENCE_LENGTH, self.name)?;
        let shape = vec![batch_size, sequence_length];
        let mut input = text_inputs(shape.clone(), vocab_size(shapes), self.token_type_ids, rng);

        if !with_labels {
            return Ok(input);
        }
        match self.labels {
            TextLabels::None => {}
            TextLabels::Tokens => {
                input.insert("labels", random_ints(rng, shape, 0, vocab_size(shapes)));
            }
            TextLabels::SequenceClass => {
                input.insert(
                    "labels",
                    random_ints(rng, vec![batch_size], 0, num_labels(shapes)),
                );
            }
            TextLabels::TokenClass => {
                input.insert("labels", random_ints(rng, shape, 0, num_labels(shapes)));
            }
            TextLabels::Spans => {
                let mut starts = Vec::with_capacity(batch_size);
                let mut ends = Vec::with_capacity(batch_size);
                for _ in 0..batch_size {
                    let start = rng.gen_range(0..sequence_length);
                    starts.push(start as i64);
                    ends.push(rng.gen_range(start..sequence_length) as i64);
                }
                input.insert("start_positions", Tensor::from_i64(vec![batch_size], starts));
                input.insert("end_positions", Tensor::from_i64(vec![batch_size], ends));
            }
        }
        Ok(input)
    }
}

impl ShapeGenerator for MultipleChoiceGenerator {
    fn name(&self) -> &'static str {
        "multiple-choice"
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.name())?;
        let num_choices = shapes.require(NUM_CHOICES, self.name())?;
        let sequence_length = shapes.require(SEQUENCE_LENGTH, self.name())?;
        let shape = vec![batch_size, num_choices, sequence_length];
        let mut input = text_inputs(shape, vocab_size(shapes), true, rng);

        if with_labels {
            input.insert(
                "labels",
                random_ints(rng, vec![batch_size], 0, num_choices as i64),
            );
        }
        Ok(input)
    }
}

impl ShapeGenerator for ImageGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.name)?;
        let pixel_shape = image_shape(shapes, batch_size);
        let (height, width) = (pixel_shape[2], pixel_shape[3]);

        let mut input = DummyInput::new();
        input.insert(PIXEL_VALUES, random_floats(rng, pixel_shape, 0.0, 1.0));

        if !with_labels {
            return Ok(input);
        }
        match self.labels {
            ImageLabels::None => {}
            ImageLabels::Class => {
                input.insert(
                    "labels",
                    random_ints(rng, vec![batch_size], 0, num_labels(shapes)),
                );
            }
            ImageLabels::Mask => {
                input.insert(
                    "labels",
                    random_ints(rng, vec![batch_size, height, width], 0, num_labels(shapes)),
                );
            }
            ImageLabels::Detection => {
                let num_queries = shapes.get_or("num_queries", DEFAULT_NUM_QUERIES);
                input.insert(
                    "class_labels",
                    random_ints(rng, vec![batch_size, num_queries], 0, num_labels(shapes)),
                );
                input.insert(
                    "boxes",
                    random_floats(rng, vec![batch_size, num_queries, 4], 0.0, 1.0),
                );
            }
            ImageLabels::Tokens => {
                let sequence_length = shapes.require(SEQUENCE_LENGTH, self.name)?;
                input.insert(
                    "labels",
                    random_ints(rng, vec![batch_size, sequence_length], 0, vocab_size(shapes)),
                );
            }
        }
        Ok(input)
    }
}

impl ShapeGenerator for ZeroShotImageGenerator {
    fn name(&self) -> &'static str {
        "zero-shot-image-classification"
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        _with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.name())?;
        let sequence_length = shapes.require(SEQUENCE_LENGTH, self.name())?;
        let mut input = text_inputs(
            vec![batch_size, sequence_length],
            vocab_size(shapes),
            false,
            rng,
        );
        input.insert(
            PIXEL_VALUES,
            random_floats(rng, image_shape(shapes, batch_size), 0.0, 1.0),
        );
        Ok(input)
    }
}

impl ShapeGenerator for AudioGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.name)?;
        let audio_sequence_length = shapes.require(AUDIO_SEQUENCE_LENGTH, self.name)?;

        let mut input = DummyInput::new();
        input.insert(
            INPUT_VALUES,
            random_floats(rng, vec![batch_size, audio_sequence_length], -1.0, 1.0),
        );

        if with_labels {
            let label_shape = match self.labels {
                AudioLabels::Class => vec![batch_size],
                AudioLabels::Frame => vec![batch_size, audio_sequence_length],
            };
            input.insert("labels", random_ints(rng, label_shape, 0, num_labels(shapes)));
        }
        Ok(input)
    }
}

impl ShapeGenerator for SpeechRecognitionGenerator {
    fn name(&self) -> &'static str {
        "automatic-speech-recognition"
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.name())?;
        let audio_sequence_length = shapes.require(AUDIO_SEQUENCE_LENGTH, self.name())?;
        let feature_size = shapes.require(FEATURE_SIZE, self.name())?;
        let nb_max_frames = shapes.require(NB_MAX_FRAMES, self.name())?;

        let mut input = DummyInput::new();
        input.insert(
            INPUT_VALUES,
            random_floats(rng, vec![batch_size, audio_sequence_length], -1.0, 1.0),
        );
        input.insert(
            INPUT_FEATURES,
            random_floats(rng, vec![batch_size, feature_size, nb_max_frames], -1.0, 1.0),
        );

        if with_labels {
            let sequence_length = shapes.require(SEQUENCE_LENGTH, self.name())?;
            input.insert(
                "labels",
                random_ints(rng, vec![batch_size, sequence_length], 0, vocab_size(shapes)),
            );
        }
        Ok(input)
    }
}

impl ShapeGenerator for PromptGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        _with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.name)?;
        let prompts = (0..batch_size)
            .map(|_| DIFFUSION_PROMPTS[rng.gen_range(0..DIFFUSION_PROMPTS.len())].to_string())
            .collect();

        let mut input = DummyInput::new();
        input.insert(PROMPT, InputValue::Prompts(prompts));
        Ok(input)
    }
}
