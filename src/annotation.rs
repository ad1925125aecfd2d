//! Annotation data structures attached to individual verses.
//!
//! Edits are display-time word replacements, notes are free text and tags are
//! short labels. Notes and tags carry the `VerseRef` captured when they were
//! created so aggregate views can show context without re-fetching verses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::verse::VerseRef;

/// Opaque, creation-ordered identifier shared by all annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for AnnotationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(AnnotationId)
    }
}

/// Monotonic id source. Ids never repeat within one generator.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        IdGenerator { next: 1 }
    }
}

impl IdGenerator {
    pub fn next_id(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next);
        self.next += 1;
        id
    }
}

/// A word or phrase replacement shown over one verse's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseEdit {
    pub id: AnnotationId,
    pub original: String,
    pub replacement: String,
    pub created_at_utc: i64,
}

/// Free-text note on a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseNote {
    pub id: AnnotationId,
    pub text: String,
    /// Absent only for notes recorded before references were captured.
    #[serde(default, rename = "ref")]
    pub verse_ref: Option<VerseRef>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// Short label on a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseTag {
    pub id: AnnotationId,
    pub value: String,
    #[serde(default, rename = "ref")]
    pub verse_ref: Option<VerseRef>,
    pub created_at_utc: i64,
}

/// Anything that remembers which verse it was attached to.
pub trait Referenced {
    fn verse_ref(&self) -> Option<&VerseRef>;
}

impl Referenced for VerseNote {
    fn verse_ref(&self) -> Option<&VerseRef> {
        self.verse_ref.as_ref()
    }
}

impl Referenced for VerseTag {
    fn verse_ref(&self) -> Option<&VerseRef> {
        self.verse_ref.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut gen = IdGenerator::default();
        let a = gen.next_id();
        let b = gen.next_id();
        let c = gen.next_id();
        assert_eq!(a, AnnotationId(1));
        assert!(a < b && b < c);
    }

    #[test]
    fn test_parse_id_accepts_hash_prefix() {
        assert_eq!("#12".parse::<AnnotationId>().unwrap(), AnnotationId(12));
        assert_eq!(" 3 ".parse::<AnnotationId>().unwrap(), AnnotationId(3));
        assert!("abc".parse::<AnnotationId>().is_err());
    }

    #[test]
    fn test_display_respects_width() {
        assert_eq!(format!("{:<4}|", AnnotationId(7)), "7   |");
    }

    #[test]
    fn test_note_ref_field_name() {
        let json = r#"{"id":4,"text":"hello","createdAtUtc":0,"updatedAtUtc":0}"#;
        let note: VerseNote = serde_json::from_str(json).unwrap();
        assert!(note.verse_ref.is_none());
        let out = serde_json::to_string(&note).unwrap();
        assert!(out.contains("\"ref\":null"));
    }
}
