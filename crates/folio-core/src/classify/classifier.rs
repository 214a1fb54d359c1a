//! The two classification strategies and the seam between them.
//!
//! A [`Classifier`] is chosen once at startup. The `Clip` variant scores the
//! image against the vocabulary; if that fails for a single request it calls
//! the fallback explicitly with a sentinel filename.

use image::DynamicImage;

use crate::config::TaggingConfig;
use crate::error::PipelineError;
use crate::types::{Classification, Confidence, HealthStatus, ModelKind};

use super::category::category_path;
use super::fallback::{fallback_tags, SENTINEL_FILENAME};
use super::scorer::tags_from_logits;
use super::vocabulary::CATEGORIES;

/// Scores an image against every label in [`CATEGORIES`].
///
/// Implemented by the ONNX-backed CLIP model; tests substitute fixed logits.
pub trait LabelScorer: Send + Sync {
    /// Scorer name for logging.
    fn name(&self) -> &str;

    /// One similarity logit per vocabulary label, in vocabulary order.
    fn logits(&self, image: &DynamicImage) -> Result<Vec<f32>, PipelineError>;
}

/// Model-backed tagging with a configured selection policy.
pub struct ClipClassifier {
    scorer: Box<dyn LabelScorer>,
    config: TaggingConfig,
}

impl ClipClassifier {
    pub fn new(scorer: Box<dyn LabelScorer>, config: TaggingConfig) -> Self {
        Self { scorer, config }
    }

    /// Score the image and select 2-3 tags.
    pub fn tags(&self, image: &DynamicImage) -> Result<Vec<String>, PipelineError> {
        let logits = self.scorer.logits(image)?;
        if logits.len() != CATEGORIES.len() {
            return Err(PipelineError::Inference {
                message: format!(
                    "{} returned {} scores for {} labels",
                    self.scorer.name(),
                    logits.len(),
                    CATEGORIES.len()
                ),
            });
        }
        if let Some(idx) = logits.iter().position(|l| !l.is_finite()) {
            return Err(PipelineError::Inference {
                message: format!(
                    "{} returned non-finite score {} for label {:?}",
                    self.scorer.name(),
                    logits[idx],
                    CATEGORIES[idx]
                ),
            });
        }
        Ok(tags_from_logits(&logits, &self.config))
    }

    /// Tags for the image, degrading to the fallback on inference failure.
    pub fn tags_or_fallback(&self, image: &DynamicImage) -> Vec<String> {
        match self.tags(image) {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!("{} classification failed, using fallback: {e}", self.scorer.name());
                fallback_tags(SENTINEL_FILENAME)
            }
        }
    }
}

/// Classification strategy, selected once when the service starts.
pub enum Classifier {
    /// Pretrained model loaded successfully
    Clip(ClipClassifier),
    /// No model; tags come from the uploaded filename
    Fallback,
}

impl Classifier {
    pub fn kind(&self) -> ModelKind {
        match self {
            Classifier::Clip(_) => ModelKind::Clip,
            Classifier::Fallback => ModelKind::Fallback,
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self, Classifier::Clip(_))
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            model: self.kind(),
            model_loaded: self.is_model_loaded(),
        }
    }

    /// Classify a decoded image. Never fails.
    ///
    /// `filename` is only consulted by the fallback strategy.
    pub fn classify(&self, image: &DynamicImage, filename: &str) -> Classification {
        let (tags, confidence) = match self {
            Classifier::Clip(clip) => (clip.tags_or_fallback(image), Confidence::High),
            Classifier::Fallback => (fallback_tags(filename), Confidence::Low),
        };
        let category = category_path(&tags);

        Classification {
            tags,
            category,
            confidence,
            model: self.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    /// Returns the same logits for every image.
    struct FixedScorer(Vec<f32>);

    impl LabelScorer for FixedScorer {
        fn name(&self) -> &str {
            "fixed"
        }

        fn logits(&self, _image: &DynamicImage) -> Result<Vec<f32>, PipelineError> {
            Ok(self.0.clone())
        }
    }

    struct FailingScorer;

    impl LabelScorer for FailingScorer {
        fn name(&self) -> &str {
            "failing"
        }

        fn logits(&self, _image: &DynamicImage) -> Result<Vec<f32>, PipelineError> {
            Err(PipelineError::Inference {
                message: "unexpected output shape".to_string(),
            })
        }
    }

    fn image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(8, 8))
    }

    fn peaked_logits(peaks: &[(usize, f32)]) -> Vec<f32> {
        let mut logits = vec![0.0; CATEGORIES.len()];
        for &(idx, value) in peaks {
            logits[idx] = value;
        }
        logits
    }

    fn clip(scorer: impl LabelScorer + 'static) -> Classifier {
        Classifier::Clip(ClipClassifier::new(
            Box::new(scorer),
            TaggingConfig::default(),
        ))
    }

    #[test]
    fn test_clip_classification() {
        // animals and pets dominate
        let classifier = clip(FixedScorer(peaked_logits(&[(1, 10.0), (14, 9.5)])));
        let result = classifier.classify(&image(), "IMG_001.png");

        assert_eq!(result.tags, vec!["animals", "pets"]);
        assert_eq!(result.category, "Animals/Pets");
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.model, ModelKind::Clip);
    }

    #[test]
    fn test_clip_ignores_filename() {
        let classifier = clip(FixedScorer(peaked_logits(&[(2, 10.0), (15, 10.0)])));
        let result = classifier.classify(&image(), "my_dog_photo.jpg");
        assert_eq!(result.tags, vec!["nature", "landscape"]);
    }

    #[test]
    fn test_clip_failure_degrades_to_sentinel_fallback() {
        let classifier = clip(FailingScorer);
        let result = classifier.classify(&image(), "my_dog_photo.jpg");

        assert_eq!(result.tags, vec!["abstract", "general", "art"]);
        assert_eq!(result.category, "Abstract/General");
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.model, ModelKind::Clip);
    }

    #[test]
    fn test_wrong_score_count_is_an_inference_error() {
        let inner = ClipClassifier::new(
            Box::new(FixedScorer(vec![1.0, 2.0])),
            TaggingConfig::default(),
        );
        let err = inner.tags(&image()).unwrap_err();
        assert!(err.to_string().contains("2 scores for 21 labels"));
    }

    #[test]
    fn test_non_finite_scores_take_sentinel_fallback() {
        let inner = ClipClassifier::new(
            Box::new(FixedScorer(peaked_logits(&[(3, f32::NAN)]))),
            TaggingConfig::default(),
        );
        let err = inner.tags(&image()).unwrap_err();
        assert!(err.to_string().contains("non-finite"));

        let classifier = clip(FixedScorer(peaked_logits(&[(0, f32::INFINITY)])));
        let result = classifier.classify(&image(), "IMG_001.png");
        assert_eq!(result.tags, vec!["abstract", "general", "art"]);
        assert_eq!(result.model, ModelKind::Clip);
    }

    #[test]
    fn test_fallback_classification() {
        let result = Classifier::Fallback.classify(&image(), "my_dog_photo.jpg");

        assert_eq!(result.tags, vec!["animals", "pets", "outdoor"]);
        assert_eq!(result.category, "Animals/Pets");
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.model, ModelKind::Fallback);
    }

    #[test]
    fn test_health_matches_strategy() {
        let health = Classifier::Fallback.health();
        assert!(!health.model_loaded);
        assert_eq!(health.model, ModelKind::Fallback);

        let health = clip(FixedScorer(peaked_logits(&[]))).health();
        assert!(health.model_loaded);
        assert_eq!(health.model, ModelKind::Clip);
        assert_eq!(health.status, "healthy");
    }
}
