//! Content provider interface and a file-backed implementation.
//!
//! A library directory holds one JSON file per translation, named
//! `<translation-id>.json`:
//!
//! ```json
//! {
//!   "name": "King James Version",
//!   "books": [{ "id": 1, "name": "Genesis", "testament": "OT" }],
//!   "verses": [
//!     { "id": 1, "verseId": 1, "chapterId": 1, "verse": "In the beginning...",
//!       "book": { "id": 1, "name": "Genesis" } }
//!   ]
//! }
//! ```
//!
//! `books` is optional; without it books are derived from the verses.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use crate::error::ContentError;
use crate::verse::{Book, Translation, Verse};

/// Read-only source of translations, books, chapters and verses.
pub trait ContentProvider {
    fn translations(&self) -> Vec<Translation>;

    /// Books ascending by id.
    fn books(&self, translation: &str) -> Result<Vec<Book>, ContentError>;

    /// Distinct chapter numbers of a book, ascending.
    fn chapters(&self, translation: &str, book_id: u32) -> Result<Vec<u32>, ContentError>;

    /// Verses of one chapter, ascending by verse number.
    fn verses(&self, translation: &str, book_id: u32, chapter_id: u32) -> Result<Vec<Verse>, ContentError>;
}

#[derive(Debug, Deserialize)]
struct TranslationFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    books: Vec<Book>,
    verses: Vec<Verse>,
}

/// One loaded translation, indexed by book and chapter.
#[derive(Debug)]
struct LoadedTranslation {
    info: Translation,
    books: Vec<Book>,
    chapters: BTreeMap<u32, BTreeMap<u32, Vec<Verse>>>,
}

impl LoadedTranslation {
    fn from_file(id: &str, file: TranslationFile) -> Self {
        let mut chapters: BTreeMap<u32, BTreeMap<u32, Vec<Verse>>> = BTreeMap::new();
        let mut derived: BTreeMap<u32, Book> = BTreeMap::new();
        for verse in file.verses {
            derived.entry(verse.book.id).or_insert_with(|| Book {
                id: verse.book.id,
                name: verse.book.name.clone(),
                testament: None,
            });
            chapters
                .entry(verse.book.id)
                .or_default()
                .entry(verse.chapter_id)
                .or_default()
                .push(verse);
        }
        for verses in chapters.values_mut().flat_map(|c| c.values_mut()) {
            verses.sort_by_key(|v| v.verse_id);
        }

        let mut books = if file.books.is_empty() {
            derived.into_values().collect()
        } else {
            file.books
        };
        books.sort_by_key(|b| b.id);

        LoadedTranslation {
            info: Translation {
                id: id.to_string(),
                name: file.name.unwrap_or_else(|| id.to_string()),
            },
            books,
            chapters,
        }
    }
}

/// Translations loaded from a directory of JSON files.
#[derive(Debug, Default)]
pub struct JsonLibrary {
    translations: BTreeMap<String, LoadedTranslation>,
}

impl JsonLibrary {
    /// Load every `*.json` file in `dir`. Unreadable or malformed files are
    /// skipped with a warning; a missing directory yields an empty library.
    pub fn open(dir: &Path) -> Result<Self, ContentError> {
        let mut library = JsonLibrary::default();
        if !dir.exists() {
            return Ok(library);
        }
        let entries = fs::read_dir(dir).map_err(|source| ContentError::Io { path: dir.to_path_buf(), source })?;
        for entry in entries {
            let entry = entry.map_err(|source| ContentError::Io { path: dir.to_path_buf(), source })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match library.load_file(&path) {
                Ok(id) => info!("loaded translation '{id}' from {}", path.display()),
                Err(e) => warn!("skipping translation file: {e}"),
            }
        }
        Ok(library)
    }

    /// Load a single translation file, keyed by its file stem.
    pub fn load_file(&mut self, path: &Path) -> Result<String, ContentError> {
        let id = translation_id(path);
        let data = fs::read_to_string(path).map_err(|source| ContentError::Io { path: path.to_path_buf(), source })?;
        let file: TranslationFile =
            serde_json::from_str(&data).map_err(|source| ContentError::Parse { path: path.to_path_buf(), source })?;
        self.translations.insert(id.clone(), LoadedTranslation::from_file(&id, file));
        Ok(id)
    }

    fn translation(&self, id: &str) -> Result<&LoadedTranslation, ContentError> {
        self.translations
            .get(id)
            .ok_or_else(|| ContentError::UnknownTranslation(id.to_string()))
    }
}

fn translation_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

impl ContentProvider for JsonLibrary {
    fn translations(&self) -> Vec<Translation> {
        self.translations.values().map(|t| t.info.clone()).collect()
    }

    fn books(&self, translation: &str) -> Result<Vec<Book>, ContentError> {
        Ok(self.translation(translation)?.books.clone())
    }

    fn chapters(&self, translation: &str, book_id: u32) -> Result<Vec<u32>, ContentError> {
        let t = self.translation(translation)?;
        match t.chapters.get(&book_id) {
            Some(chapters) => Ok(chapters.keys().copied().collect()),
            None if t.books.iter().any(|b| b.id == book_id) => Ok(Vec::new()),
            None => Err(ContentError::UnknownBook(book_id)),
        }
    }

    fn verses(&self, translation: &str, book_id: u32, chapter_id: u32) -> Result<Vec<Verse>, ContentError> {
        let t = self.translation(translation)?;
        let chapters = t.chapters.get(&book_id).ok_or(ContentError::UnknownBook(book_id))?;
        chapters
            .get(&chapter_id)
            .cloned()
            .ok_or(ContentError::UnknownChapter { book: book_id, chapter: chapter_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KJV: &str = r#"{
        "name": "King James Version",
        "verses": [
            {"id": 3, "verseId": 2, "chapterId": 1, "verse": "And the earth was without form", "book": {"id": 1, "name": "Genesis"}},
            {"id": 1, "verseId": 1, "chapterId": 1, "verse": "In the beginning", "book": {"id": 1, "name": "Genesis"}},
            {"id": 50, "verseId": 1, "chapterId": 2, "verse": "Thus the heavens", "book": {"id": 1, "name": "Genesis"}},
            {"id": 1000, "verseId": 1, "chapterId": 1, "verse": "Now these are the names", "book": {"id": 2, "name": "Exodus"}}
        ]
    }"#;

    fn write_file(dir: &Path, name: &str, body: &str) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn test_open_indexes_translation() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "kjv.json", KJV);
        let lib = JsonLibrary::open(dir.path()).unwrap();

        let translations = lib.translations();
        assert_eq!(translations.len(), 1);
        assert_eq!(translations[0].id, "kjv");
        assert_eq!(translations[0].name, "King James Version");

        let books = lib.books("kjv").unwrap();
        let names: Vec<_> = books.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Genesis", "Exodus"]);

        assert_eq!(lib.chapters("kjv", 1).unwrap(), vec![1, 2]);
        let verses = lib.verses("kjv", 1, 1).unwrap();
        let numbers: Vec<_> = verses.iter().map(|v| v.verse_id).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_lookup_errors() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "kjv.json", KJV);
        let lib = JsonLibrary::open(dir.path()).unwrap();
        assert!(matches!(lib.books("web"), Err(ContentError::UnknownTranslation(_))));
        assert!(matches!(lib.chapters("kjv", 66), Err(ContentError::UnknownBook(66))));
        assert!(matches!(
            lib.verses("kjv", 1, 40),
            Err(ContentError::UnknownChapter { book: 1, chapter: 40 })
        ));
    }

    #[test]
    fn test_malformed_files_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "kjv.json", KJV);
        write_file(dir.path(), "broken.json", "{ not json");
        write_file(dir.path(), "readme.txt", "ignored");
        let lib = JsonLibrary::open(dir.path()).unwrap();
        let ids: Vec<_> = lib.translations().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["kjv"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let lib = JsonLibrary::open(&dir.path().join("nope")).unwrap();
        assert!(lib.translations().is_empty());
    }

    #[test]
    fn test_explicit_books_keep_testament() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"books":[{"id":40,"name":"Matthew","testament":"NT"},{"id":1,"name":"Genesis","testament":"OT"}],"verses":[]}"#;
        write_file(dir.path(), "web.json", body);
        let lib = JsonLibrary::open(dir.path()).unwrap();
        let books = lib.books("web").unwrap();
        assert_eq!(books[0].name, "Genesis");
        assert_eq!(books[1].testament.as_deref(), Some("NT"));
        assert_eq!(lib.translations()[0].name, "web");
        assert!(lib.chapters("web", 40).unwrap().is_empty());
    }
}
