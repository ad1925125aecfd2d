use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Bible reader with personal word edits, notes and tags.
/// Translations are JSON files in ~/.verse-notes/library or a directory passed via --library.
#[derive(Parser)]
#[command(name = "vn", version, about = "Read and annotate Bible translations")]
pub struct Cli {
    /// Directory of translation JSON files.
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Translation to start with (file stem); defaults to the first found.
    #[arg(long, global = true)]
    pub translation: Option<String>,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
