//! Recently used tag values offered when tagging a verse.

use serde::Serialize;

/// Maximum number of remembered tag values.
pub const MAX_SUGGESTIONS: usize = 10;

/// Most-recent-first list of distinct (case-insensitive) tag values.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TagSuggestions {
    values: Vec<String>,
}

impl TagSuggestions {
    /// Record a freshly added tag value. An existing case-insensitive match is
    /// moved to the front and takes the new casing; the list never exceeds
    /// `MAX_SUGGESTIONS`.
    pub fn record(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let lowered = value.to_lowercase();
        self.values.retain(|v| v.to_lowercase() != lowered);
        self.values.insert(0, value.to_string());
        self.values.truncate(MAX_SUGGESTIONS);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Suggestions starting with `prefix`, case-insensitively, in list order.
    pub fn matching(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.trim().to_lowercase();
        self.values
            .iter()
            .filter(|v| v.to_lowercase().starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first() {
        let mut s = TagSuggestions::default();
        s.record("faith");
        s.record("hope");
        assert_eq!(s.as_slice(), &["hope".to_string(), "faith".to_string()]);
    }

    #[test]
    fn test_capped_at_ten_without_duplicates() {
        let mut s = TagSuggestions::default();
        for i in 0..11 {
            s.record(&format!("tag{i}"));
        }
        s.record("TAG10");
        assert_eq!(s.len(), MAX_SUGGESTIONS);
        assert_eq!(s.as_slice()[0], "TAG10");
        assert_eq!(s.as_slice()[1], "tag9");
        assert!(!s.as_slice().iter().any(|v| v == "tag0" || v == "tag10"));
    }

    #[test]
    fn test_blank_ignored() {
        let mut s = TagSuggestions::default();
        s.record("   ");
        assert!(s.is_empty());
    }

    #[test]
    fn test_matching_prefix() {
        let mut s = TagSuggestions::default();
        s.record("Faith");
        s.record("family");
        s.record("hope");
        assert_eq!(s.matching("fa"), vec!["family", "Faith"]);
    }
}
