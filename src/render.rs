//! Plain-text rendering for the reader.
//!
//! Everything here returns a `String` so the REPL and one-shot commands can
//! write it wherever they like. With colour enabled, replaced words are shown
//! struck through (SGR 9) followed by the replacement in bold; without it the
//! original is wrapped in `~~`.

use std::fmt::Write as _;

use crate::aggregate::{NoteGroup, TagGroup};
use crate::annotation::{VerseEdit, VerseNote, VerseTag};
use crate::overlay::OverlayNode;
use crate::verse::{Book, Translation, Verse};

const STRIKE: &str = "\x1b[9m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Width used when previewing verse text in aggregate listings.
const PREVIEW_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    pub color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Renderer { color }
    }

    /// Render overlay nodes as one line of text.
    pub fn overlay(&self, nodes: &[OverlayNode]) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                OverlayNode::Text(s) => out.push_str(s),
                OverlayNode::Replaced { original, replacement } if self.color => {
                    let _ = write!(out, "{STRIKE}{original}{RESET} {BOLD}{replacement}{RESET}");
                }
                OverlayNode::Replaced { original, replacement } => {
                    let _ = write!(out, "~~{original}~~ {replacement}");
                }
            }
        }
        out
    }

    /// A verse line followed by its tags and notes, indented under the number.
    pub fn verse(&self, verse: &Verse, nodes: &[OverlayNode], tags: &[VerseTag], notes: &[VerseNote]) -> String {
        let mut out = format!("{:>4}  {}\n", verse.verse_id, self.overlay(nodes));
        if !tags.is_empty() {
            let _ = writeln!(out, "      {}", self.dim(&format!("tags: {}", format_tags(tags))));
        }
        for note in notes {
            let _ = writeln!(out, "      {}", self.dim(&format!("note #{}: {}", note.id, note.text)));
        }
        out
    }

    /// Heading plus every verse of a chapter.
    pub fn chapter<'a>(
        &self,
        heading: &str,
        verses: impl IntoIterator<Item = (&'a Verse, Vec<OverlayNode>, &'a [VerseTag], &'a [VerseNote])>,
    ) -> String {
        let mut out = format!("{}\n\n", self.bold(heading));
        for (verse, nodes, tags, notes) in verses {
            out.push_str(&self.verse(verse, &nodes, tags, notes));
        }
        out
    }

    /// The "all notes" view.
    pub fn note_groups(&self, groups: &[NoteGroup]) -> String {
        if groups.is_empty() {
            return "No notes yet.\n".into();
        }
        let mut out = String::new();
        for g in groups {
            let _ = writeln!(out, "{}", self.bold(&g.label()));
            if let Some(text) = &g.verse_text {
                let _ = writeln!(out, "  {}", self.dim(&truncate(text, PREVIEW_WIDTH)));
            }
            for note in &g.notes {
                let _ = writeln!(out, "  #{:<5} {}", note.id, note.text);
            }
        }
        out
    }

    /// The "all tags" view, with each verse's notes beneath its tags.
    pub fn tag_groups(&self, groups: &[TagGroup]) -> String {
        if groups.is_empty() {
            return "No tags yet.\n".into();
        }
        let mut out = String::new();
        for g in groups {
            let _ = writeln!(out, "{}", self.bold(&g.label()));
            if let Some(text) = &g.verse_text {
                let _ = writeln!(out, "  {}", self.dim(&truncate(text, PREVIEW_WIDTH)));
            }
            let _ = writeln!(out, "  tags: {}", format_tags(&g.tags));
            for note in &g.notes {
                let _ = writeln!(out, "  note #{}: {}", note.id, note.text);
            }
        }
        out
    }

    fn bold(&self, s: &str) -> String {
        if self.color {
            format!("{BOLD}{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.color {
            format!("{DIM}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Tags as `#id value` pairs separated by commas.
pub fn format_tags(tags: &[VerseTag]) -> String {
    tags.iter()
        .map(|t| format!("#{} {}", t.id, t.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Table of a verse's edits in application order.
pub fn format_edits(edits: &[VerseEdit]) -> String {
    if edits.is_empty() {
        return "No edits on this verse.\n".into();
    }
    let mut out = format!("{:<6} {:<24} {}\n", "ID", "Original", "Replacement");
    for e in edits {
        let _ = writeln!(out, "{:<6} {:<24} {}", e.id, truncate(&e.original, 24), e.replacement);
    }
    out
}

/// Translation list with the current one marked.
pub fn format_translations(translations: &[Translation], current: &str) -> String {
    let mut out = String::new();
    for t in translations {
        let marker = if t.id == current { '*' } else { ' ' };
        let _ = writeln!(out, "{marker} {:<12} {}", t.id, t.name);
    }
    out
}

/// Section title for a book's testament label.
pub fn testament_title(testament: Option<&str>) -> String {
    match testament {
        Some("OT") => "Old Testament".into(),
        Some("NT") => "New Testament".into(),
        Some(other) => other.to_string(),
        None => "Other".into(),
    }
}

/// Books grouped into testament sections: Old Testament, New Testament, any
/// other labels in first-seen order, then unlabelled books. Unlabelled books
/// share a section with books labelled "Other". Each section is ascending by
/// book id.
pub fn group_books(books: &[Book]) -> Vec<(String, Vec<&Book>)> {
    let mut sections: Vec<(String, Vec<&Book>)> = vec![
        (testament_title(Some("OT")), Vec::new()),
        (testament_title(Some("NT")), Vec::new()),
    ];
    let mut unlabelled = Vec::new();
    for book in books {
        let Some(testament) = book.testament.as_deref() else {
            unlabelled.push(book);
            continue;
        };
        let title = testament_title(Some(testament));
        match sections.iter_mut().find(|(t, _)| *t == title) {
            Some((_, list)) => list.push(book),
            None => sections.push((title, vec![book])),
        }
    }
    let fallback = testament_title(None);
    match sections.iter_mut().find(|(t, _)| *t == fallback) {
        Some((_, list)) => list.extend(unlabelled),
        None => sections.push((fallback, unlabelled)),
    }
    sections.retain(|(_, list)| !list.is_empty());
    for (_, list) in sections.iter_mut() {
        list.sort_by_key(|b| b.id);
    }
    sections
}

pub fn format_books(books: &[Book]) -> String {
    let mut out = String::new();
    for (title, list) in group_books(books) {
        let _ = writeln!(out, "{title}");
        for b in list {
            let _ = writeln!(out, "  {:>3}  {}", b.id, b.name);
        }
    }
    out
}

pub fn format_chapters(book: &Book, chapters: &[u32]) -> String {
    let list = chapters.iter().map(u32::to_string).collect::<Vec<_>>().join(" ");
    format!("{}: {}\n", book.name, if list.is_empty() { "-".into() } else { list })
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: u32, name: &str, testament: Option<&str>) -> Book {
        Book { id, name: name.into(), testament: testament.map(str::to_string) }
    }

    #[test]
    fn test_overlay_plain_and_color() {
        let nodes = vec![
            OverlayNode::Replaced { original: "Love".into(), replacement: "Charity".into() },
            OverlayNode::Text(" suffereth long".into()),
        ];
        assert_eq!(Renderer::new(false).overlay(&nodes), "~~Love~~ Charity suffereth long");
        assert_eq!(
            Renderer::new(true).overlay(&nodes),
            "\x1b[9mLove\x1b[0m \x1b[1mCharity\x1b[0m suffereth long"
        );
    }

    #[test]
    fn test_books_grouped_by_testament() {
        let books = vec![
            book(40, "Matthew", Some("NT")),
            book(2, "Exodus", Some("OT")),
            book(1, "Genesis", Some("OT")),
            book(70, "Tobit", Some("Apocrypha")),
            book(99, "Loose", None),
        ];
        let sections = group_books(&books);
        let titles: Vec<_> = sections.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["Old Testament", "New Testament", "Apocrypha", "Other"]);
        let ot: Vec<_> = sections[0].1.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(ot, vec!["Genesis", "Exodus"]);
    }

    #[test]
    fn test_unlabelled_books_join_existing_other_section() {
        let books = vec![book(80, "Enoch", Some("Other")), book(5, "Loose", None)];
        let sections = group_books(&books);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "Other");
        let names: Vec<_> = sections[0].1.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Loose", "Enoch"]);
    }

    #[test]
    fn test_empty_sections_omitted() {
        let books = vec![book(1, "Genesis", None)];
        let sections = group_books(&books);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].0, "Other");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("In the beginning", 6), "In th…");
    }

    #[test]
    fn test_empty_views() {
        let r = Renderer::default();
        assert_eq!(r.note_groups(&[]), "No notes yet.\n");
        assert_eq!(r.tag_groups(&[]), "No tags yet.\n");
        assert_eq!(format_edits(&[]), "No edits on this verse.\n");
    }
}
