//! Pre-computed label embeddings for fast scoring.
//!
//! The vocabulary never changes, so its text embeddings are computed once at
//! startup and kept as a flat N×D matrix for dot products against each image.

use crate::error::PipelineError;

use super::text::ClipTextEncoder;

/// Pre-computed label embeddings, one row per label, row-major.
#[derive(Clone)]
pub struct LabelBank {
    matrix: Vec<f32>,
    embedding_dim: usize,
    label_count: usize,
}

impl LabelBank {
    /// Build a label bank from an already-flattened matrix.
    pub fn from_raw(
        matrix: Vec<f32>,
        embedding_dim: usize,
        label_count: usize,
    ) -> Result<Self, PipelineError> {
        if embedding_dim == 0 || matrix.len() != embedding_dim * label_count {
            return Err(PipelineError::Inference {
                message: format!(
                    "Matrix size ({}) does not match {} labels × {} dim",
                    matrix.len(),
                    label_count,
                    embedding_dim,
                ),
            });
        }
        Ok(Self {
            matrix,
            embedding_dim,
            label_count,
        })
    }

    /// Encode every label with the text encoder.
    ///
    /// Labels are encoded verbatim, without a prompt template.
    pub fn encode(labels: &[&str], text_encoder: &ClipTextEncoder) -> Result<Self, PipelineError> {
        let texts: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        let embeddings = text_encoder.encode_batch(&texts)?;

        let embedding_dim = embeddings.first().map(Vec::len).unwrap_or(0);
        if embeddings.len() != labels.len() || embedding_dim == 0 {
            return Err(PipelineError::Inference {
                message: format!(
                    "Text encoder returned {} embeddings for {} labels",
                    embeddings.len(),
                    labels.len()
                ),
            });
        }

        let matrix: Vec<f32> = embeddings.into_iter().flatten().collect();
        tracing::info!(
            "Label bank ready: {} labels x {} dims",
            labels.len(),
            embedding_dim
        );
        Self::from_raw(matrix, embedding_dim, labels.len())
    }

    pub fn label_count(&self) -> usize {
        self.label_count
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Cosine similarity of a normalized image embedding with every label.
    pub fn cosine_scores(&self, image_embedding: &[f32]) -> Result<Vec<f32>, PipelineError> {
        if image_embedding.len() != self.embedding_dim {
            return Err(PipelineError::Inference {
                message: format!(
                    "Image embedding has {} dims, label bank has {}",
                    image_embedding.len(),
                    self.embedding_dim
                ),
            });
        }

        Ok(self
            .matrix
            .chunks_exact(self.embedding_dim)
            .map(|row| row.iter().zip(image_embedding).map(|(a, b)| a * b).sum::<f32>())
            .collect())
    }
}
