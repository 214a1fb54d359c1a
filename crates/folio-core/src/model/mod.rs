//! CLIP zero-shot scoring via ONNX Runtime.
//!
//! The vision encoder embeds each upload; the text encoder runs once at
//! startup to build a [`LabelBank`] for the fixed vocabulary. Scoring an image
//! is then a single matrix-vector product scaled by CLIP's logit scale.
//!
//! # Usage
//!
//! ```rust,ignore
//! use folio_core::{model, Config};
//!
//! let config = Config::load()?;
//! let classifier = model::load_classifier(&config).await;
//! let result = classifier.classify(&image, "beach.jpg");
//! ```

pub mod files;
pub(crate) mod label_bank;
pub(crate) mod preprocess;
pub(crate) mod text;
pub(crate) mod vision;

use image::DynamicImage;

use crate::classify::{Classifier, ClipClassifier, LabelScorer, CATEGORIES};
use crate::config::Config;
use crate::error::PipelineError;

pub use self::files::ModelPaths;
pub use self::label_bank::LabelBank;

use self::preprocess::{preprocess, IMAGE_SIZE};
use self::text::ClipTextEncoder;
use self::vision::ClipVisionSession;

/// A loaded CLIP model with the vocabulary already embedded.
pub struct ClipModel {
    vision: ClipVisionSession,
    label_bank: LabelBank,
    logit_scale: f32,
}

impl ClipModel {
    /// Load both encoders from disk and embed the vocabulary.
    ///
    /// The text encoder is dropped once the label bank is built.
    pub fn load(paths: &ModelPaths, logit_scale: f32) -> Result<Self, PipelineError> {
        let missing = paths.missing();
        if let Some(file) = missing.first() {
            return Err(PipelineError::Model {
                path: paths.dir.join(file.local_name),
                message: "Model file not found. Run `folio models download` first.".to_string(),
            });
        }

        tracing::info!("Loading CLIP model from {:?}", paths.dir);
        let vision = ClipVisionSession::load(&paths.visual())?;
        let text_encoder = ClipTextEncoder::load(&paths.text(), &paths.tokenizer())?;
        let label_bank = LabelBank::encode(&CATEGORIES, &text_encoder)?;
        tracing::debug!(
            "Label bank ready: {} labels x {} dims",
            label_bank.label_count(),
            label_bank.embedding_dim()
        );

        Ok(Self {
            vision,
            label_bank,
            logit_scale,
        })
    }
}

impl LabelScorer for ClipModel {
    fn name(&self) -> &str {
        "CLIP"
    }

    fn logits(&self, image: &DynamicImage) -> Result<Vec<f32>, PipelineError> {
        let tensor = preprocess(image, IMAGE_SIZE);
        let embedding = self.vision.embed(&tensor)?;
        let cosines = self.label_bank.cosine_scores(&embedding)?;
        Ok(cosines.into_iter().map(|c| c * self.logit_scale).collect())
    }
}

/// Fetch (if allowed) and load the model, then pick the strategy.
///
/// Never fails: any problem is logged and the fallback strategy is returned.
/// Runs once at startup; the choice is not revisited.
pub async fn load_classifier(config: &Config) -> Classifier {
    if !config.model.enabled {
        tracing::warn!("Model disabled in config, running in fallback mode");
        return Classifier::Fallback;
    }

    match try_load(config).await {
        Ok(model) => {
            tracing::info!("CLIP model loaded successfully");
            Classifier::Clip(ClipClassifier::new(
                Box::new(model),
                config.tagging.clone(),
            ))
        }
        Err(e) => {
            tracing::error!("Error loading CLIP model: {e}");
            tracing::warn!("Running in fallback mode");
            Classifier::Fallback
        }
    }
}

async fn try_load(config: &Config) -> Result<ClipModel, PipelineError> {
    let paths = ModelPaths::from_config(config);

    if !paths.is_complete() && config.model.auto_download {
        let client = reqwest::Client::new();
        files::download_missing(&paths, &config.model.repo, &client).await?;
    }

    let logit_scale = config.model.logit_scale;
    tokio::task::spawn_blocking(move || ClipModel::load(&paths, logit_scale))
        .await
        .map_err(|e| PipelineError::Inference {
            message: format!("Model load task failed: {e}"),
        })?
}
