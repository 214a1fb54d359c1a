//! Folio Core - image tagging for folder organization.
//!
//! Takes an uploaded image and returns two or three descriptive tags plus a
//! `"Primary/Secondary"` category path. Tags come from zero-shot CLIP scoring
//! against a fixed vocabulary, or from filename keywords when no model is
//! available.
//!
//! # Architecture
//!
//! ```text
//! Upload → Decode (RGB) → Classifier (CLIP | Fallback) → Tags → Category path
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use folio_core::{Config, Folio};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let folio = Folio::new(config).await;
//!
//!     let bytes = std::fs::read("beach.jpg")?;
//!     let result = folio.classify_upload(bytes, "beach.jpg").await?;
//!     println!("{} {:?}", result.category, result.tags);
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod math;
pub mod model;
pub mod pipeline;
pub mod types;

use std::sync::Arc;

pub use classify::{Classifier, ClipClassifier, LabelScorer, CATEGORIES};
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use pipeline::{DecodedImage, ImageDecoder};
pub use types::{Classification, Confidence, HealthStatus, ModelKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The tagging service: configuration plus the strategy chosen at startup.
///
/// Immutable after construction and cheap to share behind an `Arc`.
pub struct Folio {
    config: Config,
    classifier: Arc<Classifier>,
    decoder: ImageDecoder,
}

impl Folio {
    /// Load the model (downloading it if configured) and select a strategy.
    ///
    /// Model problems never fail construction; they select the fallback.
    pub async fn new(config: Config) -> Self {
        tracing::debug!("Initializing Folio v{}", VERSION);
        let classifier = model::load_classifier(&config).await;
        Self::with_classifier(config, classifier)
    }

    /// Build around an explicit classifier.
    pub fn with_classifier(config: Config, classifier: Classifier) -> Self {
        let decoder = ImageDecoder::new(config.limits.clone());
        Self {
            config,
            classifier: Arc::new(classifier),
            decoder,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn health(&self) -> HealthStatus {
        self.classifier.health()
    }

    /// Decode an upload and classify it.
    ///
    /// Only decoding can fail; classification itself always produces tags.
    pub async fn classify_upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> PipelineResult<Classification> {
        let decoded = self.decoder.decode(bytes, filename).await?;
        tracing::info!(
            "Processing image: {} ({}x{}, {:?}, {} bytes)",
            filename,
            decoded.width,
            decoded.height,
            decoded.format,
            decoded.byte_size
        );

        let classifier = Arc::clone(&self.classifier);
        let name = filename.to_string();
        let result =
            tokio::task::spawn_blocking(move || classifier.classify(&decoded.image, &name))
                .await
                .map_err(|e| PipelineError::Inference {
                    message: format!("Classification task failed: {e}"),
                })?;

        tracing::info!("Tags: {:?}, Category: {}", result.tags, result.category);
        Ok(result)
    }
}
