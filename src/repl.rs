//! Interactive reader commands.
//!
//! Each input line is split into words (double quotes group words, `""`
//! inside quotes is a literal quote) and parsed with clap as one
//! `ReplCommand`. Verses are addressed by number within the open chapter.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};

use crate::annotation::AnnotationId;
use crate::error::SessionError;
use crate::render::{format_books, format_chapters, format_edits, format_translations, Renderer};
use crate::session::Session;
use crate::store::NoteOutcome;

#[derive(Parser, Debug)]
#[command(name = "vn", no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ReplCommand {
    /// List available translations.
    Translations,

    /// Switch translation, keeping the open chapter if it exists there.
    Translation { id: String },

    /// List books grouped by testament.
    Books,

    /// List chapters of a book (defaults to the open book).
    Chapters { book: Option<String> },

    /// Open a chapter by book name or ID.
    Open { book: String, chapter: u32 },

    /// Open the next chapter.
    Next,

    /// Open the previous chapter.
    Prev,

    /// Print the open chapter, or a single verse.
    Read { verse: Option<u32> },

    /// Replace a word or phrase when displaying a verse.
    Edit { verse: u32, original: String, replacement: String },

    /// List a verse's edits.
    Edits { verse: u32 },

    /// Remove an edit from a verse.
    Unedit { verse: u32, id: AnnotationId },

    /// Add a note, or update one with --id. An empty text deletes the note given by --id.
    Note {
        verse: u32,
        /// Note to update instead of adding a new one.
        #[arg(long)]
        id: Option<AnnotationId>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Remove a note from a verse.
    Unnote { verse: u32, id: AnnotationId },

    /// Tag a verse.
    Tag {
        verse: u32,
        #[arg(trailing_var_arg = true)]
        value: Vec<String>,
    },

    /// Remove a tag from a verse.
    Untag { verse: u32, id: AnnotationId },

    /// Show recently used tags, optionally filtered by prefix.
    Suggestions { prefix: Option<String> },

    /// Show all notes in reading order.
    Notes {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show all tagged verses in reading order, with their notes.
    Tags {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Leave the reader.
    #[command(alias = "exit")]
    Quit,
}

/// Result of executing one command.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let words = split_line(trimmed)?;
    ReplLine::try_parse_from(words)
        .map(|l| Some(l.command))
        .map_err(|e| e.to_string())
}

/// Split a command line into words, honouring double quotes.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                    in_word = true;
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_quotes {
        return Err("Unterminated quote".into());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Run one command against the session.
pub fn execute(session: &mut Session, renderer: &Renderer, command: ReplCommand) -> Result<Reply, SessionError> {
    let text = match command {
        ReplCommand::Quit => return Ok(Reply::Quit),
        ReplCommand::Translations => format_translations(&session.translations(), session.translation()),
        ReplCommand::Translation { id } => {
            let closed = session.select_translation(&id)?;
            match (session.open(), closed) {
                (Some(open), _) => format!("Switched to {id}; showing {}.\n", open.label()),
                (None, Some(label)) => format!("Switched to {id}; {label} is not in this translation, chapter closed.\n"),
                (None, None) => format!("Switched to {id}.\n"),
            }
        }
        ReplCommand::Books => format_books(&session.books()?),
        ReplCommand::Chapters { book } => {
            let (book, chapters) = session.chapters(book.as_deref())?;
            format_chapters(&book, &chapters)
        }
        ReplCommand::Open { book, chapter } => {
            session.open_chapter(&book, chapter)?;
            read_chapter(session, renderer)?
        }
        ReplCommand::Next => {
            session.next_chapter()?;
            read_chapter(session, renderer)?
        }
        ReplCommand::Prev => {
            session.previous_chapter()?;
            read_chapter(session, renderer)?
        }
        ReplCommand::Read { verse: None } => read_chapter(session, renderer)?,
        ReplCommand::Read { verse: Some(n) } => read_verse(session, renderer, n)?,
        ReplCommand::Edit { verse, original, replacement } => match session.edit(verse, &original, &replacement)? {
            Some(id) => format!("Added edit #{id} to verse {verse}.\n"),
            None => "Edit ignored: both original and replacement are required.\n".into(),
        },
        ReplCommand::Edits { verse } => {
            let key = session.verse(verse)?.id;
            format_edits(session.store().edits_for(key))
        }
        ReplCommand::Unedit { verse, id } => removal_message("edit", verse, id, session.remove_edit(verse, id)?),
        ReplCommand::Note { verse, id, text } => match session.note(verse, id, &text.join(" "))? {
            NoteOutcome::Created(id) => format!("Added note #{id} to verse {verse}.\n"),
            NoteOutcome::Updated(id) => format!("Updated note #{id}.\n"),
            NoteOutcome::Removed(id) => format!("Removed note #{id}.\n"),
            NoteOutcome::Unchanged => "No note changed.\n".into(),
        },
        ReplCommand::Unnote { verse, id } => removal_message("note", verse, id, session.remove_note(verse, id)?),
        ReplCommand::Tag { verse, value } => {
            let value = value.join(" ");
            match session.tag(verse, &value)? {
                Some(id) => format!("Tagged verse {verse} with '{}' (#{id}).\n", value.trim()),
                None => "Tag ignored: blank or already on this verse.\n".into(),
            }
        }
        ReplCommand::Untag { verse, id } => removal_message("tag", verse, id, session.remove_tag(verse, id)?),
        ReplCommand::Suggestions { prefix } => {
            let suggestions = session.store().suggestions();
            let values: Vec<&str> = match prefix {
                Some(p) => suggestions.matching(&p),
                None => suggestions.as_slice().iter().map(String::as_str).collect(),
            };
            if values.is_empty() {
                "No tag suggestions.\n".into()
            } else {
                format!("{}\n", values.join(", "))
            }
        }
        ReplCommand::Notes { json: true } => to_json(&session.note_groups()),
        ReplCommand::Notes { json: false } => renderer.note_groups(&session.note_groups()),
        ReplCommand::Tags { json: true } => to_json(&session.tag_groups()),
        ReplCommand::Tags { json: false } => renderer.tag_groups(&session.tag_groups()),
    };
    Ok(Reply::Output(text))
}

/// Read commands from `input` until it ends or `quit`. Command errors are
/// reported to `out` and the loop continues.
pub fn run_repl(
    session: &mut Session,
    renderer: &Renderer,
    input: impl BufRead,
    out: &mut impl Write,
    prompt: bool,
) -> io::Result<()> {
    if prompt {
        write!(out, "> ")?;
        out.flush()?;
    }
    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(command)) => match execute(session, renderer, command) {
                Ok(Reply::Quit) => return Ok(()),
                Ok(Reply::Output(text)) => write!(out, "{text}")?,
                Err(e) => writeln!(out, "Error: {e}")?,
            },
            Err(message) => writeln!(out, "{}", message.trim_end())?,
        }
        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
    }
    Ok(())
}

fn read_chapter(session: &Session, renderer: &Renderer) -> Result<String, SessionError> {
    let open = session.open().ok_or(SessionError::NoChapterOpen)?;
    let store = session.store();
    let heading = format!("{} ({})", open.label(), session.translation());
    Ok(renderer.chapter(
        &heading,
        open.verses
            .iter()
            .map(|v| (v, session.overlay(v), store.tags_for(v.id), store.notes_for(v.id))),
    ))
}

fn read_verse(session: &Session, renderer: &Renderer, number: u32) -> Result<String, SessionError> {
    let verse = session.verse(number)?;
    let store = session.store();
    Ok(renderer.verse(verse, &session.overlay(verse), store.tags_for(verse.id), store.notes_for(verse.id)))
}

fn removal_message(kind: &str, verse: u32, id: AnnotationId, removed: bool) -> String {
    if removed {
        format!("Removed {kind} #{id}.\n")
    } else {
        format!("No {kind} #{id} on verse {verse}.\n")
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(s) => format!("{s}\n"),
        Err(e) => format!("Failed to serialise: {e}\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_quotes() {
        assert_eq!(split_line(r#"edit 3 "the LORD" God"#).unwrap(), vec!["edit", "3", "the LORD", "God"]);
        assert_eq!(split_line(r#"note 1 "say ""amen""""#).unwrap(), vec!["note", "1", r#"say "amen""#]);
        assert_eq!(split_line(r#"note 1 --id 4 """#).unwrap(), vec!["note", "1", "--id", "4", ""]);
        assert!(split_line(r#"edit 1 "open"#).is_err());
    }

    #[test]
    fn test_parse_blank_and_comment() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# comment").unwrap(), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("open genesis 1").unwrap(),
            Some(ReplCommand::Open { book: "genesis".into(), chapter: 1 })
        );
        assert_eq!(
            parse_line("note 2 --id 7 grace upon grace").unwrap(),
            Some(ReplCommand::Note {
                verse: 2,
                id: Some(AnnotationId(7)),
                text: vec!["grace".into(), "upon".into(), "grace".into()],
            })
        );
        assert_eq!(
            parse_line("tag 4 Faith").unwrap(),
            Some(ReplCommand::Tag { verse: 4, value: vec!["Faith".into()] })
        );
        assert_eq!(parse_line("exit").unwrap(), Some(ReplCommand::Quit));
        assert_eq!(parse_line("notes --json").unwrap(), Some(ReplCommand::Notes { json: true }));
    }

    #[test]
    fn test_parse_errors_are_messages() {
        assert!(parse_line("open genesis one").is_err());
        assert!(parse_line("frobnicate").is_err());
    }
}
