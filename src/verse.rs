//! Bible content records and the captured verse reference.
//!
//! `Book`, `Verse` and `Translation` mirror what a content provider hands out.
//! `VerseRef` is the snapshot an annotation keeps of where (and what) its verse
//! was at the moment the annotation was created.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A book of the Bible as listed by a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u32,
    pub name: String,
    /// "OT", "NT" or a free-form label for deuterocanonical collections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testament: Option<String>,
}

/// Book identity as embedded in a verse record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfo {
    pub id: u32,
    pub name: String,
}

/// A single verse as supplied by a content provider.
///
/// `id` is the provider-wide verse identifier used to key annotations;
/// `verse_id` is the 1-based verse number within its chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub id: u32,
    pub verse_id: u32,
    pub chapter_id: u32,
    pub verse: String,
    pub book: BookInfo,
}

/// A translation available from a content provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub id: String,
    pub name: String,
}

/// Immutable snapshot of a verse's location captured when an annotation is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRef {
    pub verse_id: u32,
    pub chapter_id: u32,
    pub book_id: u32,
    pub book_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl VerseRef {
    /// Capture a reference, including the verse's current text.
    pub fn from_verse(verse: &Verse) -> Self {
        VerseRef {
            verse_id: verse.verse_id,
            chapter_id: verse.chapter_id,
            book_id: verse.book.id,
            book_name: verse.book.name.clone(),
            text: Some(verse.verse.clone()),
        }
    }

    /// Human-readable location, e.g. "Genesis 1:1".
    pub fn label(&self) -> String {
        format_reference(Some(&self.book_name), self.chapter_id, self.verse_id)
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Format a "Book chapter:verse" label; unnamed books print as "Verse".
pub fn format_reference(book_name: Option<&str>, chapter_id: u32, verse_id: u32) -> String {
    format!("{} {}:{}", book_name.unwrap_or("Verse"), chapter_id, verse_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genesis_1_1() -> Verse {
        Verse {
            id: 1,
            verse_id: 1,
            chapter_id: 1,
            verse: "In the beginning God created the heaven and the earth.".into(),
            book: BookInfo { id: 1, name: "Genesis".into() },
        }
    }

    #[test]
    fn test_ref_captures_location_and_text() {
        let r = VerseRef::from_verse(&genesis_1_1());
        assert_eq!(r.book_id, 1);
        assert_eq!(r.chapter_id, 1);
        assert_eq!(r.verse_id, 1);
        assert_eq!(r.label(), "Genesis 1:1");
        assert!(r.text.unwrap().starts_with("In the beginning"));
    }

    #[test]
    fn test_verse_deserialises_camel_case() {
        let json = r#"{"id":7,"verseId":3,"chapterId":2,"verse":"text","book":{"id":2,"name":"Exodus"}}"#;
        let v: Verse = serde_json::from_str(json).unwrap();
        assert_eq!(v.verse_id, 3);
        assert_eq!(v.chapter_id, 2);
        assert_eq!(v.book.name, "Exodus");
    }

    #[test]
    fn test_format_reference_without_book() {
        assert_eq!(format_reference(None, 4, 9), "Verse 4:9");
    }
}
