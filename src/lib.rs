//! # verse-notes
//!
//! Read Bible translations from local JSON files and annotate verses with
//! personal word replacements, free-text notes and tags.
//!
//! The annotation core is small and pure:
//!
//! - [`store::AnnotationStore`] owns every edit, note and tag, keyed by verse,
//!   plus the recently used tag list. Its methods are the only way to mutate
//!   annotations, and none of them fail.
//! - [`overlay::build_overlay_nodes`] splits a verse's text into plain and
//!   replaced spans for display.
//! - [`aggregate::aggregate_notes`] and [`aggregate::aggregate_tags`] group
//!   annotations by verse in Bible reading order.
//!
//! Around it, [`content`] loads translations, [`session::Session`] tracks the
//! open chapter and [`repl`] turns typed commands into calls on the session.
//! Annotations live in memory for the length of a session only.
//!
//! ```
//! use verse_notes::store::AnnotationStore;
//! use verse_notes::overlay::{build_overlay_nodes, display_text};
//!
//! let mut store = AnnotationStore::new();
//! store.add_edit(1, "love", "charity");
//! let nodes = build_overlay_nodes("Love suffereth long", store.edits_for(1));
//! assert_eq!(display_text(&nodes), "charity suffereth long");
//! ```

pub mod aggregate;
pub mod annotation;
pub mod cli;
pub mod cmd;
pub mod content;
pub mod error;
pub mod overlay;
pub mod render;
pub mod repl;
pub mod session;
pub mod store;
pub mod suggestions;
pub mod verse;
