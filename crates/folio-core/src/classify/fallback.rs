//! Filename keyword classification, used when no model is available.

/// Filename used when a model-backed request degrades to the fallback.
pub const SENTINEL_FILENAME: &str = "unknown.jpg";

/// Tags returned when no keyword matches.
pub const DEFAULT_TAGS: [&str; 3] = ["abstract", "general", "art"];

/// Keyword table. Order matters: the first keyword found in the filename wins.
const KEYWORD_TAGS: &[(&str, [&str; 3])] = &[
    ("dog", ["animals", "pets", "outdoor"]),
    ("cat", ["animals", "pets", "indoor"]),
    ("car", ["vehicles", "transportation", "urban"]),
    ("food", ["food", "indoor", "art"]),
    ("nature", ["nature", "outdoor", "landscape"]),
    ("city", ["urban", "architecture", "outdoor"]),
    ("people", ["people", "portrait", "outdoor"]),
    ("building", ["architecture", "urban", "outdoor"]),
    ("beach", ["nature", "outdoor", "landscape"]),
    ("mountain", ["nature", "landscape", "outdoor"]),
    ("selfie", ["people", "portrait", "indoor"]),
    ("sunset", ["nature", "outdoor", "landscape"]),
    ("street", ["urban", "outdoor", "architecture"]),
];

/// Pick three tags from keywords in `filename`. Never fails.
///
/// Matching is a case-insensitive substring test, so `"Scattered.png"`
/// matches `cat`.
pub fn fallback_tags(filename: &str) -> Vec<String> {
    let lower = filename.to_lowercase();

    let tags = KEYWORD_TAGS
        .iter()
        .find(|(keyword, _)| lower.contains(*keyword))
        .map(|(_, tags)| tags)
        .unwrap_or(&DEFAULT_TAGS);

    tags.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match() {
        assert_eq!(
            fallback_tags("my_dog_photo.jpg"),
            vec!["animals", "pets", "outdoor"]
        );
        assert_eq!(
            fallback_tags("sunset_over_bay.png"),
            vec!["nature", "outdoor", "landscape"]
        );
    }

    #[test]
    fn test_no_match_returns_default() {
        assert_eq!(fallback_tags("IMG_001.png"), vec!["abstract", "general", "art"]);
        assert_eq!(fallback_tags(""), vec!["abstract", "general", "art"]);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(fallback_tags("BEACH-DAY.JPG"), fallback_tags("beach-day.jpg"));
        assert_eq!(
            fallback_tags("Selfie.HEIC"),
            vec!["people", "portrait", "indoor"]
        );
    }

    #[test]
    fn test_first_table_entry_wins() {
        // "dog" precedes "cat" in the table regardless of position in the name
        assert_eq!(
            fallback_tags("cat_and_dog.jpg"),
            vec!["animals", "pets", "outdoor"]
        );
        // "car" precedes "city"
        assert_eq!(
            fallback_tags("city_car.jpg"),
            vec!["vehicles", "transportation", "urban"]
        );
    }

    #[test]
    fn test_substring_match_inside_words() {
        // "scattered" contains "cat"
        assert_eq!(
            fallback_tags("scattered_leaves.png"),
            vec!["animals", "pets", "indoor"]
        );
    }

    #[test]
    fn test_sentinel_maps_to_default() {
        assert_eq!(fallback_tags(SENTINEL_FILENAME), DEFAULT_TAGS.to_vec());
    }
}
