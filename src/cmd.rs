//! Command implementations for the CLI interface.
//!
//! `shell` and `run` drive the interactive reader; the remaining commands are
//! one-shot views over the translation library.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::render::{format_books, format_translations, Renderer};
use crate::repl::{execute, run_repl, ReplCommand, Reply};
use crate::session::Session;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive reader (default).
    Shell,

    /// Execute reader commands from a file, one per line.
    Run {
        /// Script path; `-` reads standard input.
        script: PathBuf,
    },

    /// List available translations.
    Translations,

    /// List books of the current translation grouped by testament.
    Books,

    /// Print a chapter.
    Read {
        /// Book name or ID.
        book: String,
        chapter: u32,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Run the interactive reader on standard input.
pub fn cmd_shell(session: &mut Session, renderer: &Renderer) {
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    if prompt {
        println!("Type `help` for commands, `quit` to leave.");
    }
    if let Err(e) = run_repl(session, renderer, stdin.lock(), &mut io::stdout(), prompt) {
        eprintln!("Reader error: {e}");
        std::process::exit(1);
    }
}

/// Execute a command script.
pub fn cmd_run(session: &mut Session, renderer: &Renderer, script: &Path) {
    let result = if script == Path::new("-") {
        run_repl(session, renderer, io::stdin().lock(), &mut io::stdout(), false)
    } else {
        match File::open(script) {
            Ok(f) => run_repl(session, renderer, BufReader::new(f), &mut io::stdout(), false),
            Err(e) => {
                eprintln!("Failed to open {}: {e}", script.display());
                std::process::exit(1);
            }
        }
    };
    if let Err(e) = result {
        eprintln!("Reader error: {e}");
        std::process::exit(1);
    }
}

/// List translations, marking the current one.
pub fn cmd_translations(session: &Session) {
    print!("{}", format_translations(&session.translations(), session.translation()));
}

/// List books grouped by testament.
pub fn cmd_books(session: &Session) {
    match session.books() {
        Ok(books) => print!("{}", format_books(&books)),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Print one chapter.
pub fn cmd_read(session: &mut Session, renderer: &Renderer, book: String, chapter: u32) {
    match execute(session, renderer, ReplCommand::Open { book, chapter }) {
        Ok(Reply::Output(text)) => print!("{text}"),
        Ok(Reply::Quit) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}
