//! "All notes" and "all tags" views.
//!
//! Both views group annotations by the verse location captured in their
//! `VerseRef` and order the groups by book, chapter and verse, giving Bible
//! reading order regardless of when things were annotated. Annotations
//! without a captured reference fall into a group keyed only by their store
//! key, with book and chapter 0.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::annotation::{Referenced, VerseNote, VerseTag};
use crate::store::{NoteMap, TagMap, VerseKey};
use crate::verse::format_reference;

/// Sort and grouping key. Unreferenced groups sort before referenced ones
/// with the same coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    book_id: u32,
    chapter_id: u32,
    verse_id: u32,
    referenced: bool,
}

/// Notes on one verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteGroup {
    pub verse_id: u32,
    pub chapter_id: u32,
    pub book_id: u32,
    pub book_name: Option<String>,
    pub verse_text: Option<String>,
    pub notes: Vec<VerseNote>,
}

/// Tags on one verse, with that verse's current notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagGroup {
    pub verse_id: u32,
    pub chapter_id: u32,
    pub book_id: u32,
    pub book_name: Option<String>,
    pub verse_text: Option<String>,
    pub tags: Vec<VerseTag>,
    pub notes: Vec<VerseNote>,
}

impl NoteGroup {
    pub fn label(&self) -> String {
        format_reference(self.book_name.as_deref(), self.chapter_id, self.verse_id)
    }
}

impl TagGroup {
    pub fn label(&self) -> String {
        format_reference(self.book_name.as_deref(), self.chapter_id, self.verse_id)
    }
}

/// Items sharing a key, plus the store keys they came from in encounter order.
struct Bucket<T> {
    header: Header,
    items: Vec<T>,
    store_keys: Vec<VerseKey>,
}

struct Header {
    verse_id: u32,
    chapter_id: u32,
    book_id: u32,
    book_name: Option<String>,
    verse_text: Option<String>,
}

fn group_by_ref<T: Referenced + Clone>(map: &BTreeMap<VerseKey, Vec<T>>) -> Vec<Bucket<T>> {
    let mut buckets: BTreeMap<GroupKey, Bucket<T>> = BTreeMap::new();
    for (&store_key, items) in map {
        for item in items {
            let (key, header) = match item.verse_ref() {
                Some(r) => (
                    GroupKey { book_id: r.book_id, chapter_id: r.chapter_id, verse_id: r.verse_id, referenced: true },
                    Header {
                        verse_id: r.verse_id,
                        chapter_id: r.chapter_id,
                        book_id: r.book_id,
                        book_name: Some(r.book_name.clone()),
                        verse_text: r.text.clone(),
                    },
                ),
                None => (
                    GroupKey { book_id: 0, chapter_id: 0, verse_id: store_key, referenced: false },
                    Header { verse_id: store_key, chapter_id: 0, book_id: 0, book_name: None, verse_text: None },
                ),
            };
            let bucket = buckets.entry(key).or_insert_with(|| Bucket {
                header,
                items: Vec::new(),
                store_keys: Vec::new(),
            });
            bucket.items.push(item.clone());
            if !bucket.store_keys.contains(&store_key) {
                bucket.store_keys.push(store_key);
            }
        }
    }
    buckets.into_values().collect()
}

/// Group every note by verse, in reading order.
pub fn aggregate_notes(notes: &NoteMap) -> Vec<NoteGroup> {
    group_by_ref(notes)
        .into_iter()
        .map(|b| NoteGroup {
            verse_id: b.header.verse_id,
            chapter_id: b.header.chapter_id,
            book_id: b.header.book_id,
            book_name: b.header.book_name,
            verse_text: b.header.verse_text,
            notes: b.items,
        })
        .collect()
}

/// Group every tag by verse, in reading order. Each group's notes are looked
/// up live in `notes` by the store keys its tags were filed under, ascending.
pub fn aggregate_tags(tags: &TagMap, notes: &NoteMap) -> Vec<TagGroup> {
    group_by_ref(tags)
        .into_iter()
        .map(|b| {
            let verse_notes = b
                .store_keys
                .iter()
                .filter_map(|k| notes.get(k))
                .flatten()
                .cloned()
                .collect();
            TagGroup {
                verse_id: b.header.verse_id,
                chapter_id: b.header.chapter_id,
                book_id: b.header.book_id,
                book_name: b.header.book_name,
                verse_text: b.header.verse_text,
                tags: b.items,
                notes: verse_notes,
            }
        })
        .collect()
}
