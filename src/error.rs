//! Error types for content loading and reader sessions.
//!
//! The annotation core itself never fails; these cover the content provider
//! and resolving user input against the open chapter.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading translation files or looking up content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Translation '{0}' not found")]
    UnknownTranslation(String),

    #[error("Book {0} not found")]
    UnknownBook(u32),

    #[error("Chapter {chapter} not found in book {book}")]
    UnknownChapter { book: u32, chapter: u32 },
}

/// Failures while handling a reader command.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("No translations available")]
    NoTranslations,

    #[error("No chapter is open; use `open <book> <chapter>` first")]
    NoChapterOpen,

    #[error("No book found with name '{0}'")]
    BookNotFound(String),

    #[error("Multiple books match '{name}': {candidates}. Please use the book ID instead.")]
    AmbiguousBook { name: String, candidates: String },

    #[error("Verse {verse} not found in {chapter}")]
    VerseNotFound { verse: u32, chapter: String },

    #[error("Already at the {0} chapter")]
    NoMoreChapters(&'static str),
}
