//! Reader session state.
//!
//! A `Session` holds the content provider, the translation and chapter being
//! read, and the process-wide `AnnotationStore`. Commands address verses by
//! their number within the open chapter; the session turns that into the
//! provider's verse key and a captured `VerseRef` before calling the store.

use log::{info, warn};

use crate::aggregate::{aggregate_notes, aggregate_tags, NoteGroup, TagGroup};
use crate::annotation::AnnotationId;
use crate::content::ContentProvider;
use crate::error::{ContentError, SessionError};
use crate::overlay::{build_overlay_nodes, OverlayNode};
use crate::store::{AnnotationStore, NoteOutcome, VerseKey};
use crate::verse::{Book, Translation, Verse, VerseRef};

/// The chapter currently on screen.
#[derive(Debug, Clone)]
pub struct OpenChapter {
    pub book: Book,
    pub chapter_id: u32,
    pub verses: Vec<Verse>,
}

impl OpenChapter {
    pub fn label(&self) -> String {
        format!("{} {}", self.book.name, self.chapter_id)
    }
}

pub struct Session {
    provider: Box<dyn ContentProvider>,
    translation: String,
    chapter: Option<OpenChapter>,
    store: AnnotationStore,
}

impl Session {
    /// Start a session on `translation`, or on the first available one.
    pub fn new(provider: Box<dyn ContentProvider>, translation: Option<&str>) -> Result<Self, SessionError> {
        let available = provider.translations();
        let translation = match translation {
            Some(id) => available
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.id.clone())
                .ok_or_else(|| ContentError::UnknownTranslation(id.to_string()))?,
            None => available.first().map(|t| t.id.clone()).ok_or(SessionError::NoTranslations)?,
        };
        info!("session started with translation '{translation}'");
        Ok(Session {
            provider,
            translation,
            chapter: None,
            store: AnnotationStore::new(),
        })
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    pub fn translations(&self) -> Vec<Translation> {
        self.provider.translations()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn open(&self) -> Option<&OpenChapter> {
        self.chapter.as_ref()
    }

    /// Switch translation, re-opening the current chapter in it when possible.
    /// Returns the label of the chapter that had to be closed, if any.
    pub fn select_translation(&mut self, id: &str) -> Result<Option<String>, SessionError> {
        self.provider.books(id)?;
        self.translation = id.to_string();
        let mut closed = None;
        if let Some(open) = self.chapter.take() {
            match self.provider.verses(id, open.book.id, open.chapter_id) {
                Ok(verses) => {
                    self.chapter = Some(OpenChapter { verses, ..open });
                }
                Err(e) => {
                    warn!("closing {} after switching to '{id}': {e}", open.label());
                    closed = Some(open.label());
                }
            }
        }
        info!("switched to translation '{id}'");
        Ok(closed)
    }

    pub fn books(&self) -> Result<Vec<Book>, SessionError> {
        Ok(self.provider.books(&self.translation)?)
    }

    /// Resolve a book by id, exact name or unique name prefix (case-insensitive).
    pub fn resolve_book(&self, identifier: &str) -> Result<Book, SessionError> {
        let books = self.books()?;
        let identifier = identifier.trim();
        if let Ok(id) = identifier.parse::<u32>() {
            return books
                .into_iter()
                .find(|b| b.id == id)
                .ok_or(SessionError::Content(ContentError::UnknownBook(id)));
        }

        let wanted = identifier.to_lowercase();
        if let Some(book) = books.iter().find(|b| b.name.to_lowercase() == wanted) {
            return Ok(book.clone());
        }
        let matches: Vec<&Book> = books
            .iter()
            .filter(|b| b.name.to_lowercase().starts_with(&wanted))
            .collect();
        match matches.len() {
            0 => Err(SessionError::BookNotFound(identifier.to_string())),
            1 => Ok(matches[0].clone()),
            _ => Err(SessionError::AmbiguousBook {
                name: identifier.to_string(),
                candidates: matches
                    .iter()
                    .map(|b| format!("{} ({})", b.name, b.id))
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Chapters of the named book, or of the open book when `book` is `None`.
    pub fn chapters(&self, book: Option<&str>) -> Result<(Book, Vec<u32>), SessionError> {
        let book = match book {
            Some(identifier) => self.resolve_book(identifier)?,
            None => self.chapter.as_ref().map(|c| c.book.clone()).ok_or(SessionError::NoChapterOpen)?,
        };
        let chapters = self.provider.chapters(&self.translation, book.id)?;
        Ok((book, chapters))
    }

    pub fn open_chapter(&mut self, book: &str, chapter_id: u32) -> Result<&OpenChapter, SessionError> {
        let book = self.resolve_book(book)?;
        self.load_chapter(book, chapter_id)
    }

    /// Move to the following chapter, continuing into the next book.
    pub fn next_chapter(&mut self) -> Result<&OpenChapter, SessionError> {
        self.step_chapter(true)
    }

    /// Move to the preceding chapter, continuing into the previous book.
    pub fn previous_chapter(&mut self) -> Result<&OpenChapter, SessionError> {
        self.step_chapter(false)
    }

    fn step_chapter(&mut self, forward: bool) -> Result<&OpenChapter, SessionError> {
        let open = self.chapter.as_ref().ok_or(SessionError::NoChapterOpen)?;
        let (book, current) = (open.book.clone(), open.chapter_id);

        let chapters = self.provider.chapters(&self.translation, book.id)?;
        let within = if forward {
            chapters.iter().copied().find(|&c| c > current)
        } else {
            chapters.iter().rev().copied().find(|&c| c < current)
        };
        if let Some(chapter) = within {
            return self.load_chapter(book, chapter);
        }

        let books = self.books()?;
        let pos = books.iter().position(|b| b.id == book.id);
        let neighbours: Vec<Book> = match (pos, forward) {
            (Some(p), true) => books[p + 1..].to_vec(),
            (Some(p), false) => books[..p].iter().rev().cloned().collect(),
            (None, _) => Vec::new(),
        };
        for next in neighbours {
            let chapters = self.provider.chapters(&self.translation, next.id)?;
            let target = if forward { chapters.first() } else { chapters.last() };
            if let Some(&chapter) = target {
                return self.load_chapter(next, chapter);
            }
        }
        Err(SessionError::NoMoreChapters(if forward { "last" } else { "first" }))
    }

    fn load_chapter(&mut self, book: Book, chapter_id: u32) -> Result<&OpenChapter, SessionError> {
        let verses = self.provider.verses(&self.translation, book.id, chapter_id)?;
        info!("opened {} {} ({} verses)", book.name, chapter_id, verses.len());
        Ok(&*self.chapter.insert(OpenChapter { book, chapter_id, verses }))
    }

    /// Verse `number` of the open chapter.
    pub fn verse(&self, number: u32) -> Result<&Verse, SessionError> {
        let open = self.chapter.as_ref().ok_or(SessionError::NoChapterOpen)?;
        open.verses
            .iter()
            .find(|v| v.verse_id == number)
            .ok_or_else(|| SessionError::VerseNotFound { verse: number, chapter: open.label() })
    }

    fn locate(&self, number: u32) -> Result<(VerseKey, VerseRef), SessionError> {
        let verse = self.verse(number)?;
        Ok((verse.id, VerseRef::from_verse(verse)))
    }

    /// Overlay nodes for a verse using its current edits.
    pub fn overlay(&self, verse: &Verse) -> Vec<OverlayNode> {
        build_overlay_nodes(&verse.verse, self.store.edits_for(verse.id))
    }

    pub fn edit(&mut self, number: u32, original: &str, replacement: &str) -> Result<Option<AnnotationId>, SessionError> {
        let (key, _) = self.locate(number)?;
        Ok(self.store.add_edit(key, original, replacement))
    }

    pub fn remove_edit(&mut self, number: u32, id: AnnotationId) -> Result<bool, SessionError> {
        let (key, _) = self.locate(number)?;
        Ok(self.store.remove_edit(key, id))
    }

    pub fn note(&mut self, number: u32, note_id: Option<AnnotationId>, text: &str) -> Result<NoteOutcome, SessionError> {
        let (key, verse_ref) = self.locate(number)?;
        Ok(self.store.add_or_update_note(key, verse_ref, note_id, text))
    }

    pub fn remove_note(&mut self, number: u32, id: AnnotationId) -> Result<bool, SessionError> {
        let (key, _) = self.locate(number)?;
        Ok(self.store.remove_note(key, id))
    }

    pub fn tag(&mut self, number: u32, value: &str) -> Result<Option<AnnotationId>, SessionError> {
        let (key, verse_ref) = self.locate(number)?;
        Ok(self.store.add_tag(key, verse_ref, value))
    }

    pub fn remove_tag(&mut self, number: u32, id: AnnotationId) -> Result<bool, SessionError> {
        let (key, _) = self.locate(number)?;
        Ok(self.store.remove_tag(key, id))
    }

    pub fn note_groups(&self) -> Vec<NoteGroup> {
        aggregate_notes(self.store.notes())
    }

    pub fn tag_groups(&self) -> Vec<TagGroup> {
        aggregate_tags(self.store.tags(), self.store.notes())
    }
}
