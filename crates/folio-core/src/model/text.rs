//! CLIP text encoder for embedding the category vocabulary.
//!
//! Loads the text tower ONNX model and its tokenizer. Embeddings land in the
//! same projected space as the vision encoder's `image_embeds`.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

/// Projected embedding output of the Xenova CLIP text export.
const TEXT_EMBEDS: &str = "text_embeds";

/// CLIP's context length.
const MAX_LENGTH: usize = 77;

/// End-of-text token, also used as padding by the OpenAI CLIP tokenizer.
const PAD_TOKEN: &str = "<|endoftext|>";

/// CLIP text encoder wrapper.
///
/// Uses the same `Mutex<Session>` pattern as the vision encoder.
pub struct ClipTextEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    pad_id: u32,
    /// Some exports take only `input_ids`.
    wants_attention_mask: bool,
}

impl ClipTextEncoder {
    /// Load the text encoder and tokenizer from explicit file paths.
    pub fn load(model_path: &Path, tokenizer_path: &Path) -> Result<Self, PipelineError> {
        let session = Session::builder()
            .map_err(|e| PipelineError::Model {
                path: model_path.to_path_buf(),
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| PipelineError::Model {
                path: model_path.to_path_buf(),
                message: format!("Failed to load text encoder model: {e}"),
            })?;

        let tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path).map_err(|e| {
            PipelineError::Model {
                path: tokenizer_path.to_path_buf(),
                message: format!("Failed to load tokenizer: {e}"),
            }
        })?;

        let pad_id = tokenizer.token_to_id(PAD_TOKEN).unwrap_or(0);
        let wants_attention_mask = session
            .inputs()
            .iter()
            .any(|i| i.name() == "attention_mask");

        tracing::debug!(
            "Loaded CLIP text encoder (inputs: {:?}, outputs: {:?})",
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>(),
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            pad_id,
            wants_attention_mask,
        })
    }

    /// Encode a batch of texts to L2-normalized embeddings, one per input.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let batch_size = texts.len();
        if batch_size == 0 {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| PipelineError::Inference {
                message: format!("Tokenization failed: {e}"),
            })?;

        let (input_ids, attention_mask, seq_len) = pad_batch(
            encodings.iter().map(|e| e.get_ids()),
            self.pad_id,
            MAX_LENGTH,
        );
        let shape = vec![batch_size as i64, seq_len as i64];

        let mut session = self.session.lock().map_err(|e| PipelineError::Inference {
            message: format!("Text encoder lock poisoned: {e}"),
        })?;

        let input_ids_value =
            Value::from_array((shape.clone(), input_ids)).map_err(|e| PipelineError::Inference {
                message: format!("Failed to create input_ids tensor: {e}"),
            })?;

        let outputs = if self.wants_attention_mask {
            let mask_value = Value::from_array((shape, attention_mask)).map_err(|e| {
                PipelineError::Inference {
                    message: format!("Failed to create attention_mask tensor: {e}"),
                }
            })?;
            session.run(ort::inputs![
                "input_ids" => input_ids_value,
                "attention_mask" => mask_value
            ])
        } else {
            session.run(ort::inputs!["input_ids" => input_ids_value])
        }
        .map_err(|e| PipelineError::Inference {
            message: format!("Text encoder inference failed: {e}"),
        })?;

        let text_embeds = outputs
            .iter()
            .find(|(name, _)| *name == TEXT_EMBEDS)
            .ok_or_else(|| PipelineError::Inference {
                message: format!("Text encoder did not produce {TEXT_EMBEDS}"),
            })?;

        let (shape, data) =
            text_embeds
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| PipelineError::Inference {
                    message: format!("Failed to extract {TEXT_EMBEDS}: {e}"),
                })?;

        if shape.len() != 2 || shape[0] as usize != batch_size {
            return Err(PipelineError::Inference {
                message: format!(
                    "Unexpected {TEXT_EMBEDS} shape {:?} for batch of {batch_size}",
                    shape
                ),
            });
        }

        let embeddings: Vec<Vec<f32>> = data
            .chunks(shape[1] as usize)
            .map(crate::math::l2_normalize)
            .collect();

        Ok(embeddings)
    }
}

/// Right-pad token id sequences to the longest one (capped at `max_length`).
///
/// Returns flat `input_ids`, a matching `attention_mask`, and the padded length.
fn pad_batch<'a>(
    sequences: impl Iterator<Item = &'a [u32]> + Clone,
    pad_id: u32,
    max_length: usize,
) -> (Vec<i64>, Vec<i64>, usize) {
    let seq_len = sequences
        .clone()
        .map(|ids| ids.len().min(max_length))
        .max()
        .unwrap_or(0)
        .max(1);

    let mut input_ids = Vec::new();
    let mut attention_mask = Vec::new();

    for ids in sequences {
        let kept = &ids[..ids.len().min(max_length)];
        input_ids.extend(kept.iter().map(|&id| id as i64));
        attention_mask.extend(std::iter::repeat(1i64).take(kept.len()));

        let padding = seq_len - kept.len();
        input_ids.extend(std::iter::repeat(pad_id as i64).take(padding));
        attention_mask.extend(std::iter::repeat(0i64).take(padding));
    }

    (input_ids, attention_mask, seq_len)
}
