//! In-memory annotation store.
//!
//! `AnnotationStore` owns the per-verse edit, note and tag lists together with
//! the tag suggestion list. Every mutation goes through the methods below so
//! the invariants hold in one place:
//!
//! - a verse key is present in a map only while its list is non-empty;
//! - stored edit originals, note texts and tag values are trimmed and non-empty;
//! - tag values are unique per verse, ignoring case.
//!
//! Every operation is total: invalid input is a logged no-op, never an error.

use std::collections::BTreeMap;

use chrono::Utc;
use log::debug;

use crate::annotation::{AnnotationId, IdGenerator, VerseEdit, VerseNote, VerseTag};
use crate::suggestions::TagSuggestions;
use crate::verse::VerseRef;

/// Provider-wide verse identifier (`Verse::id`) used to key annotations.
pub type VerseKey = u32;

pub type EditMap = BTreeMap<VerseKey, Vec<VerseEdit>>;
pub type NoteMap = BTreeMap<VerseKey, Vec<VerseNote>>;
pub type TagMap = BTreeMap<VerseKey, Vec<VerseTag>>;

/// What `add_or_update_note` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOutcome {
    Created(AnnotationId),
    Updated(AnnotationId),
    Removed(AnnotationId),
    Unchanged,
}

#[derive(Debug, Default)]
pub struct AnnotationStore {
    edits: EditMap,
    notes: NoteMap,
    tags: TagMap,
    suggestions: TagSuggestions,
    ids: IdGenerator,
    version: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented on every effective mutation; derived views may cache on it.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn edits(&self) -> &EditMap {
        &self.edits
    }

    pub fn notes(&self) -> &NoteMap {
        &self.notes
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub fn suggestions(&self) -> &TagSuggestions {
        &self.suggestions
    }

    pub fn edits_for(&self, verse: VerseKey) -> &[VerseEdit] {
        self.edits.get(&verse).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn notes_for(&self, verse: VerseKey) -> &[VerseNote] {
        self.notes.get(&verse).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tags_for(&self, verse: VerseKey) -> &[VerseTag] {
        self.tags.get(&verse).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a replacement of `original` by `replacement` to a verse.
    /// Returns `None` when either value is blank after trimming.
    pub fn add_edit(&mut self, verse: VerseKey, original: &str, replacement: &str) -> Option<AnnotationId> {
        let original = original.trim();
        let replacement = replacement.trim();
        if original.is_empty() || replacement.is_empty() {
            debug!("ignoring edit on verse {verse}: blank original or replacement");
            return None;
        }
        let id = self.ids.next_id();
        self.edits.entry(verse).or_default().push(VerseEdit {
            id,
            original: original.to_string(),
            replacement: replacement.to_string(),
            created_at_utc: Utc::now().timestamp(),
        });
        self.touch();
        debug!("added edit {id} on verse {verse}: {original:?} -> {replacement:?}");
        Some(id)
    }

    pub fn remove_edit(&mut self, verse: VerseKey, id: AnnotationId) -> bool {
        let removed = remove_from(&mut self.edits, verse, |e| e.id == id);
        self.after_remove("edit", verse, id, removed)
    }

    /// Create, update or delete a note depending on `note_id` and whether
    /// `text` is blank. A blank text with an id deletes that note; a blank
    /// text without an id does nothing. Updating an unknown id does nothing.
    pub fn add_or_update_note(
        &mut self,
        verse: VerseKey,
        verse_ref: VerseRef,
        note_id: Option<AnnotationId>,
        text: &str,
    ) -> NoteOutcome {
        let text = text.trim();
        match (note_id, text.is_empty()) {
            (Some(id), true) => {
                if self.remove_note(verse, id) {
                    NoteOutcome::Removed(id)
                } else {
                    NoteOutcome::Unchanged
                }
            }
            (None, true) => {
                debug!("ignoring blank note on verse {verse}");
                NoteOutcome::Unchanged
            }
            (Some(id), false) => {
                let Some(note) = self
                    .notes
                    .get_mut(&verse)
                    .and_then(|notes| notes.iter_mut().find(|n| n.id == id))
                else {
                    debug!("note {id} not found on verse {verse}");
                    return NoteOutcome::Unchanged;
                };
                note.text = text.to_string();
                note.updated_at_utc = Utc::now().timestamp();
                self.touch();
                debug!("updated note {id} on verse {verse}");
                NoteOutcome::Updated(id)
            }
            (None, false) => {
                let id = self.ids.next_id();
                let now = Utc::now().timestamp();
                self.notes.entry(verse).or_default().push(VerseNote {
                    id,
                    text: text.to_string(),
                    verse_ref: Some(verse_ref),
                    created_at_utc: now,
                    updated_at_utc: now,
                });
                self.touch();
                debug!("added note {id} on verse {verse}");
                NoteOutcome::Created(id)
            }
        }
    }

    pub fn remove_note(&mut self, verse: VerseKey, id: AnnotationId) -> bool {
        let removed = remove_from(&mut self.notes, verse, |n| n.id == id);
        self.after_remove("note", verse, id, removed)
    }

    /// Tag a verse. Blank values and case-insensitive duplicates within the
    /// verse are ignored; a successful add is recorded in the suggestions.
    pub fn add_tag(&mut self, verse: VerseKey, verse_ref: VerseRef, value: &str) -> Option<AnnotationId> {
        let value = value.trim();
        if value.is_empty() {
            debug!("ignoring blank tag on verse {verse}");
            return None;
        }
        let lowered = value.to_lowercase();
        if self.tags_for(verse).iter().any(|t| t.value.to_lowercase() == lowered) {
            debug!("verse {verse} already tagged {value:?}");
            return None;
        }
        let id = self.ids.next_id();
        self.tags.entry(verse).or_default().push(VerseTag {
            id,
            value: value.to_string(),
            verse_ref: Some(verse_ref),
            created_at_utc: Utc::now().timestamp(),
        });
        self.suggestions.record(value);
        self.touch();
        debug!("added tag {id} {value:?} on verse {verse}");
        Some(id)
    }

    pub fn remove_tag(&mut self, verse: VerseKey, id: AnnotationId) -> bool {
        let removed = remove_from(&mut self.tags, verse, |t| t.id == id);
        self.after_remove("tag", verse, id, removed)
    }

    fn after_remove(&mut self, kind: &str, verse: VerseKey, id: AnnotationId, removed: bool) -> bool {
        if removed {
            self.touch();
            debug!("removed {kind} {id} from verse {verse}");
        } else {
            debug!("{kind} {id} not found on verse {verse}");
        }
        removed
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}

/// Remove the first item matching `pred` from a verse's list, dropping the
/// key once the list is empty.
fn remove_from<T>(map: &mut BTreeMap<VerseKey, Vec<T>>, verse: VerseKey, pred: impl Fn(&T) -> bool) -> bool {
    let Some(list) = map.get_mut(&verse) else {
        return false;
    };
    let Some(pos) = list.iter().position(pred) else {
        return false;
    };
    list.remove(pos);
    if list.is_empty() {
        map.remove(&verse);
    }
    true
}
