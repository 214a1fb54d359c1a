//! Turns per-label similarity logits into a short tag list.
//!
//! Softmax over the whole vocabulary, take the `top_k` best, keep those above
//! `min_probability`. The threshold is advisory: when too few labels clear it
//! the top `min_tags` are returned regardless.

use crate::config::TaggingConfig;
use crate::math::{softmax, top_k_indices};

use super::vocabulary::CATEGORIES;

/// Select tags from softmax probabilities aligned with [`CATEGORIES`].
///
/// Always returns between `min_tags` and `top_k` labels when the vocabulary
/// is at least `min_tags` long.
pub fn select_tags(probs: &[f32], config: &TaggingConfig) -> Vec<String> {
    let top = top_k_indices(probs, config.top_k);

    let confident: Vec<usize> = top
        .iter()
        .copied()
        .filter(|&idx| probs[idx] > config.min_probability)
        .collect();

    let chosen = if confident.len() < config.min_tags {
        &top[..config.min_tags.min(top.len())]
    } else {
        &confident[..]
    };

    chosen.iter().map(|&idx| CATEGORIES[idx].to_string()).collect()
}

/// Softmax the logits and select tags in one step.
pub fn tags_from_logits(logits: &[f32], config: &TaggingConfig) -> Vec<String> {
    let probs = softmax(logits);
    tracing::debug!(
        "Top probabilities: {:?}",
        top_k_indices(&probs, config.top_k)
            .into_iter()
            .map(|i| (CATEGORIES[i], probs[i]))
            .collect::<Vec<_>>()
    );
    select_tags(&probs, config)
}
