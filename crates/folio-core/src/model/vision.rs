//! CLIP vision encoder session.
//!
//! Loads the vision tower exported to ONNX and runs it on preprocessed
//! tensors to produce projected image embeddings.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::PipelineError;

/// Projected embedding output of the Xenova CLIP vision export.
const IMAGE_EMBEDS: &str = "image_embeds";

/// Wraps an ONNX Runtime session for CLIP image embedding.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct ClipVisionSession {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
}

impl ClipVisionSession {
    /// Load a CLIP vision encoder from an ONNX file.
    pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
        let session = Session::builder()
            .map_err(|e| PipelineError::Model {
                path: model_path.to_path_buf(),
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| PipelineError::Model {
                path: model_path.to_path_buf(),
                message: format!("Failed to load ONNX model: {e}"),
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "pixel_values".to_string());

        tracing::debug!(
            "Loaded CLIP vision encoder from {:?} (input: {:?}, outputs: {:?})",
            model_path,
            input_name,
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Run inference on a `[1, 3, 224, 224]` tensor and return the
    /// L2-normalized image embedding.
    pub fn embed(&self, preprocessed: &Array4<f32>) -> Result<Vec<f32>, PipelineError> {
        let shape: Vec<i64> = preprocessed.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = preprocessed.iter().copied().collect();

        let input_value =
            Value::from_array((shape, flat_data)).map_err(|e| PipelineError::Inference {
                message: format!("Failed to create input tensor: {e}"),
            })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self.session.lock().map_err(|e| PipelineError::Inference {
            message: format!("Vision session lock poisoned: {e}"),
        })?;

        let outputs = session.run(inputs).map_err(|e| PipelineError::Inference {
            message: format!("Vision encoder inference failed: {e}"),
        })?;

        let image_embeds = outputs
            .iter()
            .find(|(name, _)| *name == IMAGE_EMBEDS)
            .ok_or_else(|| PipelineError::Inference {
                message: format!("Vision encoder did not produce {IMAGE_EMBEDS}"),
            })?;

        let (shape, data) =
            image_embeds
                .1
                .try_extract_tensor::<f32>()
                .map_err(|e| PipelineError::Inference {
                    message: format!("Failed to extract {IMAGE_EMBEDS} tensor: {e}"),
                })?;

        // image_embeds is [1, 512]
        let mut raw = match shape.len() {
            1 => data.to_vec(),
            2 if shape[0] == 1 => data[..shape[1] as usize].to_vec(),
            _ => {
                return Err(PipelineError::Inference {
                    message: format!("Unexpected {IMAGE_EMBEDS} shape: {:?}", shape),
                });
            }
        };

        crate::math::l2_normalize_in_place(&mut raw);
        Ok(raw)
    }
}
