//! Folder-style category path derivation.

/// Path used when there are no tags at all.
pub const UNCATEGORIZED: &str = "Uncategorized/General";

/// Secondary component used when only one tag is available.
const GENERAL: &str = "General";

/// Build a `"Primary/Secondary"` path from the first two tags.
///
/// Tags past the second never affect the result.
pub fn category_path<S: AsRef<str>>(tags: &[S]) -> String {
    let Some(first) = tags.first() else {
        return UNCATEGORIZED.to_string();
    };

    let primary = capitalize(first.as_ref());
    let secondary = tags
        .get(1)
        .map(|t| capitalize(t.as_ref()))
        .unwrap_or_else(|| GENERAL.to_string());

    format!("{primary}/{secondary}")
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
