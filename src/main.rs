//! `vn` - read and annotate Bible translations in the terminal.
//!
//! ```bash
//! # Start the reader on the first translation found in ~/.verse-notes/library
//! vn
//!
//! # Print a chapter from a specific library
//! vn --library ./bibles read John 3
//!
//! # Replay a command script
//! vn run study.vn
//! ```
//!
//! Inside the reader:
//!
//! ```text
//! > open genesis 1
//! > edit 1 "the heaven" "the heavens"
//! > note 1 God speaks creation into being
//! > tag 1 creation
//! > notes
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use verse_notes::cli::Cli;
use verse_notes::cmd::*;
use verse_notes::content::JsonLibrary;
use verse_notes::render::Renderer;
use verse_notes::session::Session;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let renderer = Renderer::new(!cli.no_color && std::io::stdout().is_terminal());

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Shell => cmd_shell(&mut open_session(cli.library, cli.translation), &renderer),
        Commands::Run { script } => cmd_run(&mut open_session(cli.library, cli.translation), &renderer, &script),
        Commands::Translations => cmd_translations(&open_session(cli.library, cli.translation)),
        Commands::Books => cmd_books(&open_session(cli.library, cli.translation)),
        Commands::Read { book, chapter } => {
            cmd_read(&mut open_session(cli.library, cli.translation), &renderer, book, chapter)
        }
    }
}

/// Load the translation library and start a session, exiting on failure.
fn open_session(library: Option<PathBuf>, translation: Option<String>) -> Session {
    // Determine library directory
    let library_dir = library.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".verse-notes").join("library");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create library directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir
    });
    info!("using library {}", library_dir.display());

    let library = match JsonLibrary::open(&library_dir) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("Failed to load library: {e}");
            std::process::exit(1);
        }
    };

    match Session::new(Box::new(library), translation.as_deref()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{e} in {}", library_dir.display());
            std::process::exit(1);
        }
    }
}
