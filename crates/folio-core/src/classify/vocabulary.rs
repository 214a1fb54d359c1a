//! The fixed category vocabulary scored against every image.

/// Candidate labels, in scoring order. Index positions line up with rows of
/// the label bank.
pub const CATEGORIES: [&str; 21] = [
    "people",
    "animals",
    "nature",
    "urban",
    "food",
    "indoor",
    "outdoor",
    "sports",
    "technology",
    "vehicles",
    "architecture",
    "art",
    "documents",
    "abstract",
    "pets",
    "landscape",
    "portrait",
    "wildlife",
    "city",
    "building",
    "transportation",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let unique: HashSet<_> = CATEGORIES.iter().collect();
        assert_eq!(unique.len(), CATEGORIES.len());
    }

    #[test]
    fn test_vocabulary_is_lowercase() {
        assert!(CATEGORIES
            .iter()
            .all(|c| c.chars().all(|ch| ch.is_ascii_lowercase())));
    }
}
