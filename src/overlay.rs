//! Display overlay for verse edits.
//!
//! An overlay splits a verse's raw text into plain spans and replaced spans.
//! Edits are applied oldest first; each one scans only the plain spans left
//! by earlier edits, so replacement text is never matched again.
//!
//! Matching is a literal, case-insensitive, leftmost-first, non-overlapping
//! substring scan. It is not word-aware: "love" also matches inside "beloved".
//! Case is compared with Unicode simple case folding.

use log::warn;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::annotation::VerseEdit;

/// One span of an overlaid verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OverlayNode {
    Text(String),
    Replaced { original: String, replacement: String },
}

impl OverlayNode {
    /// Text as it appears in the underlying verse.
    pub fn source(&self) -> &str {
        match self {
            OverlayNode::Text(s) => s,
            OverlayNode::Replaced { original, .. } => original,
        }
    }

    /// Text as it reads once replacements are applied.
    pub fn display(&self) -> &str {
        match self {
            OverlayNode::Text(s) => s,
            OverlayNode::Replaced { replacement, .. } => replacement,
        }
    }
}

/// Split `text` into overlay nodes for the given edits.
///
/// Empty `text` always yields a single empty text node. Edits whose trimmed
/// original is blank are skipped.
pub fn build_overlay_nodes(text: &str, edits: &[VerseEdit]) -> Vec<OverlayNode> {
    let mut nodes = vec![OverlayNode::Text(text.to_string())];
    if text.is_empty() {
        return nodes;
    }

    for edit in edits {
        let Some(pattern) = literal_pattern(&edit.original) else {
            continue;
        };
        let mut next = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                OverlayNode::Text(plain) => split_plain(&plain, &pattern, &edit.replacement, &mut next),
                replaced => next.push(replaced),
            }
        }
        nodes = next;
    }
    nodes
}

/// Raw verse text reconstructed from its nodes.
pub fn source_text(nodes: &[OverlayNode]) -> String {
    nodes.iter().map(OverlayNode::source).collect()
}

/// Verse text with every replacement applied.
pub fn display_text(nodes: &[OverlayNode]) -> String {
    nodes.iter().map(OverlayNode::display).collect()
}

fn literal_pattern(original: &str) -> Option<Regex> {
    let needle = original.trim();
    if needle.is_empty() {
        return None;
    }
    match RegexBuilder::new(&regex::escape(needle)).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("skipping edit {needle:?}: {e}");
            None
        }
    }
}

fn split_plain(plain: &str, pattern: &Regex, replacement: &str, out: &mut Vec<OverlayNode>) {
    let mut last = 0;
    for m in pattern.find_iter(plain) {
        if m.start() > last {
            out.push(OverlayNode::Text(plain[last..m.start()].to_string()));
        }
        out.push(OverlayNode::Replaced {
            original: m.as_str().to_string(),
            replacement: replacement.to_string(),
        });
        last = m.end();
    }
    if last < plain.len() {
        out.push(OverlayNode::Text(plain[last..].to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationId;

    fn edit(original: &str, replacement: &str) -> VerseEdit {
        VerseEdit {
            id: AnnotationId(0),
            original: original.into(),
            replacement: replacement.into(),
            created_at_utc: 0,
        }
    }

    fn text(s: &str) -> OverlayNode {
        OverlayNode::Text(s.into())
    }

    fn replaced(original: &str, replacement: &str) -> OverlayNode {
        OverlayNode::Replaced { original: original.into(), replacement: replacement.into() }
    }

    #[test]
    fn test_no_edits_passes_text_through() {
        assert_eq!(build_overlay_nodes("Jesus wept.", &[]), vec![text("Jesus wept.")]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(build_overlay_nodes("", &[]), vec![text("")]);
        assert_eq!(build_overlay_nodes("", &[edit("a", "b")]), vec![text("")]);
    }

    #[test]
    fn test_every_occurrence_keeps_matched_casing() {
        let nodes = build_overlay_nodes("Love is patient, love is kind", &[edit("love", "charity")]);
        assert_eq!(
            nodes,
            vec![
                replaced("Love", "charity"),
                text(" is patient, "),
                replaced("love", "charity"),
                text(" is kind"),
            ]
        );
        assert_eq!(source_text(&nodes), "Love is patient, love is kind");
        assert_eq!(display_text(&nodes), "charity is patient, charity is kind");
    }

    #[test]
    fn test_matches_inside_words() {
        let nodes = build_overlay_nodes("my beloved son", &[edit("love", "X")]);
        assert_eq!(nodes, vec![text("my be"), replaced("love", "X"), text("d son")]);
    }

    #[test]
    fn test_replacements_not_rescanned() {
        let edits = [edit("love", "X"), edit("X", "Y")];
        let nodes = build_overlay_nodes("love is patient", &edits);
        assert_eq!(nodes, vec![replaced("love", "X"), text(" is patient")]);
    }

    #[test]
    fn test_order_matters() {
        let text_in = "the Lord God";
        let a = build_overlay_nodes(text_in, &[edit("Lord God", "LORD"), edit("God", "Elohim")]);
        let b = build_overlay_nodes(text_in, &[edit("God", "Elohim"), edit("Lord God", "LORD")]);
        assert_eq!(a, vec![text("the "), replaced("Lord God", "LORD")]);
        assert_eq!(b, vec![text("the Lord "), replaced("God", "Elohim")]);
        assert_eq!(a, build_overlay_nodes(text_in, &[edit("Lord God", "LORD"), edit("God", "Elohim")]));
    }

    #[test]
    fn test_blank_originals_skipped_anywhere() {
        let edits = [edit("  ", "x"), edit("wept", "cried"), edit("", "y")];
        let nodes = build_overlay_nodes("Jesus wept.", &edits);
        assert_eq!(nodes, vec![text("Jesus "), replaced("wept", "cried"), text(".")]);
    }

    #[test]
    fn test_original_is_trimmed_and_literal() {
        let nodes = build_overlay_nodes("a.b a+b", &[edit(" a+b ", "sum"), edit(".", "dot")]);
        assert_eq!(nodes, vec![text("a"), replaced(".", "dot"), text("b "), replaced("a+b", "sum")]);
    }

    #[test]
    fn test_non_overlapping_left_to_right() {
        let nodes = build_overlay_nodes("aaa", &[edit("aa", "b")]);
        assert_eq!(nodes, vec![replaced("aa", "b"), text("a")]);
    }

    #[test]
    fn test_case_folding_is_unicode_aware() {
        // Long s folds to "s" under Unicode simple case folding.
        let nodes = build_overlay_nodes("ſ and s", &[edit("s", "x")]);
        assert_eq!(nodes, vec![replaced("ſ", "x"), text(" and "), replaced("s", "x")]);
        assert_eq!(source_text(&nodes), "ſ and s");
    }

    #[test]
    fn test_missing_original_is_noop() {
        let nodes = build_overlay_nodes("Jesus wept.", &[edit("laughed", "smiled")]);
        assert_eq!(nodes, vec![text("Jesus wept.")]);
    }
}
