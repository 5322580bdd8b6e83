// Raw model labels -> human-readable category names.
//
// The mapping is fixed for the process lifetime. Labels the model may emit
// that have no entry here pass through unchanged rather than being dropped,
// so every score the model produces reaches the caller.

/// Mapping from the model's short machine labels to the category names the
/// API exposes.
pub const CATEGORY_MAPPING: [(&str, &str); 9] = [
    ("H", "Hate Speech"),
    ("H2", "Hate Speech (Severe)"),
    ("HR", "Hate Speech (Racial)"),
    ("OK", "Safe Content"),
    ("S", "Sexual Content"),
    ("S3", "Sexual Content (Explicit)"),
    ("SH", "Sexual Harassment"),
    ("V", "Violence"),
    ("V2", "Violence (Severe)"),
];

/// Translate a raw model label to its human-readable category. Unknown
/// labels are returned as-is (pass-through fallback, never dropped).
pub fn map_label(raw: &str) -> &str {
    CATEGORY_MAPPING
        .iter()
        .find(|(label, _)| *label == raw)
        .map(|(_, category)| *category)
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_categories() {
        assert_eq!(map_label("OK"), "Safe Content");
        assert_eq!(map_label("V"), "Violence");
        assert_eq!(map_label("H2"), "Hate Speech (Severe)");
    }

    #[test]
    fn unknown_label_passes_through() {
        assert_eq!(map_label("X9"), "X9");
    }

    #[test]
    fn categories_are_distinct() {
        let mut names: Vec<_> = CATEGORY_MAPPING.iter().map(|(_, c)| *c).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATEGORY_MAPPING.len());
    }
}
