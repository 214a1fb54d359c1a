//! Image tagging: the category vocabulary, the model-backed and filename
//! strategies, and category path derivation.

pub mod category;
pub mod classifier;
pub mod fallback;
pub mod scorer;
pub mod vocabulary;

pub use category::category_path;
pub use classifier::{Classifier, ClipClassifier, LabelScorer};
pub use fallback::fallback_tags;
pub use vocabulary::CATEGORIES;
