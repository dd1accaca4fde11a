//! Generators for model types whose inputs differ from their task's norm.
//!
//! A multi-modal encoder registered for "feature-extraction" still needs
//! pixels next to its token ids, and speech seq2seq models want a decoder
//! prompt. These generators read the pretrained configuration for sizes the
//! shape map usually does not carry.

use rand::{Rng, RngCore};

use super::dummy_input::{BBOX, DECODER_INPUT_IDS, DummyInput, INPUT_FEATURES, PIXEL_VALUES};
use super::random::{random_floats, random_ints};
use super::task_generators::{
    DEFAULT_IMAGE_SIZE, DEFAULT_NUM_CHANNELS, DEFAULT_VOCAB_SIZE, ShapeGenerator, text_inputs,
};
use crate::errors::{GeneratorError, GeneratorResult};
use crate::input_shapes::{BATCH_SIZE, FEATURE_SIZE, InputShapes, NB_MAX_FRAMES, SEQUENCE_LENGTH};
use crate::pretrained_config::PretrainedConfig;
use crate::tensor::Tensor;

/// Largest coordinate of a normalized layout bounding box.
const MAX_BBOX_COORDINATE: i64 = 1000;

pub trait ModelTypeGenerator: Sync {
    fn model_type(&self) -> &'static str;

    fn generate(
        &self,
        shapes: &InputShapes,
        config: &PretrainedConfig,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput>;
}

/// A model type generator bound to the configuration it reads, usable
/// wherever a task generator is.
///
/// Model type generators never attach labels, so `with_labels` is ignored.
pub struct ConfiguredGenerator {
    generator: &'static dyn ModelTypeGenerator,
    config: PretrainedConfig,
}

impl ConfiguredGenerator {
    pub fn new(generator: &'static dyn ModelTypeGenerator, config: PretrainedConfig) -> Self {
        Self { generator, config }
    }

    /// Looks up the generator registered for the config's model type.
    pub fn for_config(config: &PretrainedConfig) -> Option<Self> {
        model_type_generator(&config.model_type)
            .map(|generator| Self::new(generator, config.clone()))
    }
}

impl ShapeGenerator for ConfiguredGenerator {
    fn name(&self) -> &'static str {
        self.generator.model_type()
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        _with_labels: bool,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        self.generator.generate(shapes, &self.config, rng)
    }
}

pub struct ClipGenerator;

/// Encoder-decoder speech models fed with log-mel features.
pub struct SpeechSeq2SeqGenerator {
    pub model_type: &'static str,
    /// Whether features are laid out `(batch, frames, features)` instead of
    /// `(batch, features, frames)`.
    pub frames_first: bool,
}

pub struct LayoutGenerator {
    pub model_type: &'static str,
}

pub struct VisionEncoderDecoderGenerator;

pub static MODEL_TYPES_TO_GENERATORS: &[(&str, &dyn ModelTypeGenerator)] = &[
    ("clip", &ClipGenerator),
    (
        "whisper",
        &SpeechSeq2SeqGenerator {
            model_type: "whisper",
            frames_first: false,
        },
    ),
    (
        "speech_to_text",
        &SpeechSeq2SeqGenerator {
            model_type: "speech_to_text",
            frames_first: true,
        },
    ),
    ("layoutlm", &LayoutGenerator { model_type: "layoutlm" }),
    ("layoutlmv2", &LayoutGenerator { model_type: "layoutlmv2" }),
    ("vision-encoder-decoder", &VisionEncoderDecoderGenerator),
];

pub fn model_type_generator(model_type: &str) -> Option<&'static dyn ModelTypeGenerator> {
    MODEL_TYPES_TO_GENERATORS
        .iter()
        .find(|(name, _)| *name == model_type)
        .map(|(_, generator)| *generator)
}

pub fn supported_model_types() -> Vec<String> {
    MODEL_TYPES_TO_GENERATORS
        .iter()
        .map(|(name, _)| name.to_string())
        .collect()
}

fn vocab_size(shapes: &InputShapes, config: &PretrainedConfig) -> i64 {
    shapes
        .get("vocab_size")
        .or(config.vocab_size)
        .unwrap_or(DEFAULT_VOCAB_SIZE) as i64
}

/// Rejects a dimension that is present but zero.
fn nonzero_dim(value: Option<usize>, key: &str, generator: &str) -> GeneratorResult<Option<usize>> {
    match value {
        Some(0) => Err(GeneratorError::ZeroShape {
            key: key.to_string(),
            generator: generator.to_string(),
        }),
        other => Ok(other),
    }
}

fn pixel_values(
    shapes: &InputShapes,
    config: &PretrainedConfig,
    batch_size: usize,
    generator: &str,
    rng: &mut dyn RngCore,
) -> GeneratorResult<Tensor> {
    let channels = nonzero_dim(config.num_channels, "num_channels", generator)?
        .unwrap_or(DEFAULT_NUM_CHANNELS);
    let size = nonzero_dim(config.image_size, "image_size", generator)?
        .unwrap_or(DEFAULT_IMAGE_SIZE);
    let height = nonzero_dim(shapes.get("height"), "height", generator)?.unwrap_or(size);
    let width = nonzero_dim(shapes.get("width"), "width", generator)?.unwrap_or(size);
    Ok(random_floats(
        rng,
        vec![batch_size, channels, height, width],
        0.0,
        1.0,
    ))
}

impl ModelTypeGenerator for ClipGenerator {
    fn model_type(&self) -> &'static str {
        "clip"
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        config: &PretrainedConfig,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.model_type())?;
        let sequence_length = shapes.require(SEQUENCE_LENGTH, self.model_type())?;

        let mut input = text_inputs(
            vec![batch_size, sequence_length],
            vocab_size(shapes, config),
            false,
            rng,
        );
        let pixels = pixel_values(shapes, config, batch_size, self.model_type(), rng)?;
        input.insert(PIXEL_VALUES, pixels);
        Ok(input)
    }
}

impl ModelTypeGenerator for SpeechSeq2SeqGenerator {
    fn model_type(&self) -> &'static str {
        self.model_type
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        config: &PretrainedConfig,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.model_type)?;
        let mel_bins = nonzero_dim(config.num_mel_bins, "num_mel_bins", self.model_type)?;
        let feature_size = match mel_bins {
            Some(bins) => bins,
            None => shapes.require(FEATURE_SIZE, self.model_type)?,
        };
        let nb_max_frames = shapes.require(NB_MAX_FRAMES, self.model_type)?;
        let feature_shape = if self.frames_first {
            vec![batch_size, nb_max_frames, feature_size]
        } else {
            vec![batch_size, feature_size, nb_max_frames]
        };

        let mut input = DummyInput::new();
        input.insert(INPUT_FEATURES, random_floats(rng, feature_shape, -1.0, 1.0));
        input.insert(
            DECODER_INPUT_IDS,
            Tensor::full_i64(
                vec![batch_size, 1],
                config.decoder_start_token_id.unwrap_or(0),
            ),
        );
        Ok(input)
    }
}

impl ModelTypeGenerator for LayoutGenerator {
    fn model_type(&self) -> &'static str {
        self.model_type
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        config: &PretrainedConfig,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.model_type())?;
        let sequence_length = shapes.require(SEQUENCE_LENGTH, self.model_type())?;

        let mut input = text_inputs(
            vec![batch_size, sequence_length],
            vocab_size(shapes, config),
            true,
            rng,
        );

        let mut boxes = Vec::with_capacity(batch_size * sequence_length * 4);
        for _ in 0..batch_size * sequence_length {
            let x0 = rng.gen_range(0..=MAX_BBOX_COORDINATE);
            let y0 = rng.gen_range(0..=MAX_BBOX_COORDINATE);
            let x1 = rng.gen_range(x0..=MAX_BBOX_COORDINATE);
            let y1 = rng.gen_range(y0..=MAX_BBOX_COORDINATE);
            boxes.extend_from_slice(&[x0, y0, x1, y1]);
        }
        input.insert(
            BBOX,
            Tensor::from_i64(vec![batch_size, sequence_length, 4], boxes),
        );
        Ok(input)
    }
}

impl ModelTypeGenerator for VisionEncoderDecoderGenerator {
    fn model_type(&self) -> &'static str {
        "vision-encoder-decoder"
    }

    fn generate(
        &self,
        shapes: &InputShapes,
        config: &PretrainedConfig,
        rng: &mut dyn RngCore,
    ) -> GeneratorResult<DummyInput> {
        let batch_size = shapes.require(BATCH_SIZE, self.model_type())?;
        let sequence_length = shapes.require(SEQUENCE_LENGTH, self.model_type())?;

        let mut input = DummyInput::new();
        let pixels = pixel_values(shapes, config, batch_size, self.model_type(), rng)?;
        input.insert(PIXEL_VALUES, pixels);
        input.insert(
            DECODER_INPUT_IDS,
            random_ints(
                rng,
                vec![batch_size, sequence_length],
                0,
                vocab_size(shapes, config),
            ),
        );
        Ok(input)
    }
}
