// SPDX-License-Identifier: MIT
//
// med: a small modal terminal text editor.
//
// This is the binary that wires the two crates together:
//
//   med-term → raw mode, key parsing, stdin polling, ANSI writers
//   med-core → the byte buffer and every editing operation
//
// The loop is single-threaded. Each iteration draws a full frame, blocks on
// stdin (or a short ESC timeout while a sequence is half-read), and feeds
// the parsed keys to the editor:
//
//   draw → poll/read stdin → parser → Editor::handle_key → Buffer
//
// A SIGWINCH interrupts the poll; the loop picks up the new size and
// redraws.

mod editor;
mod screen;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use med_core::{Buffer, Options};
use med_term::input;
use med_term::reader;
use med_term::terminal::Terminal;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::editor::Editor;

/// How long a lone ESC waits for the rest of an escape sequence.
const ESCAPE_TIMEOUT: Duration = Duration::from_millis(25);

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "med", version, about = "A small modal terminal text editor")]
struct Args {
    /// File to edit. Created on the first save if it does not exist.
    file: PathBuf,

    /// Columns per tab stop.
    #[arg(long, env = "MED_TAB_WIDTH", value_name = "N")]
    tab_width: Option<usize>,

    /// Append logs to this file (filter with RUST_LOG).
    #[arg(long, env = "MED_LOG", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Set an option, e.g. `--set tabstop=8`. May be repeated.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,
}

impl Args {
    /// Options from `--tab-width` first, then each `--set` in order.
    fn options(&self) -> Result<Options> {
        let mut options = Options::new();
        if let Some(width) = self.tab_width {
            options = options.with_tab_width(width);
        }
        for assignment in &self.set {
            options
                .apply(assignment)
                .with_context(|| format!("invalid --set {assignment}"))?;
        }
        Ok(options)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Send `tracing` output to `path`. The terminal belongs to the editor, so
/// without a log file nothing is installed at all.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("med=info,med_core=info"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

// ─── Main loop ──────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<()> {
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let options = args.options()?;
    let buffer = Buffer::open_with_options(&args.file, options)
        .with_context(|| format!("cannot open {}", args.file.display()))?;

    info!(path = %args.file.display(), tab_width = options.tab_width(), "editing");

    let mut editor = Editor::new(buffer);
    let mut term = Terminal::enter().context("failed to initialize terminal")?;

    let result = event_loop(&mut editor, &mut term);

    // Restore the terminal before any error is printed.
    term.leave().context("failed to restore terminal")?;
    result
}

fn event_loop(editor: &mut Editor, term: &mut Terminal) -> Result<()> {
    let size = term.size();
    editor.resize(size.width(), size.height());

    let mut parser = input::Parser::new();
    let mut frame = Vec::with_capacity(16 * 1024);

    loop {
        frame.clear();
        screen::render(editor, &mut frame)?;
        let mut out = io::stdout().lock();
        out.write_all(&frame)?;
        out.flush()?;
        drop(out);

        let timeout = parser.has_pending().then_some(ESCAPE_TIMEOUT);
        let keys = match reader::wait_for_input(timeout)? {
            Some(bytes) => parser.advance(&bytes),
            // Timed out with a lone ESC, or interrupted by a signal.
            None if parser.has_pending() => parser.flush(),
            None => Vec::new(),
        };

        for key in keys {
            editor.handle_key(key);
            if editor.should_quit() {
                info!("quit");
                return Ok(());
            }
        }

        if reader::take_resize() {
            let size = term.refresh_size();
            debug!(cols = size.cols, rows = size.rows, "terminal resized");
            editor.resize(size.width(), size.height());
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("med: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn file_argument_is_required() {
        assert!(Args::try_parse_from(["med"]).is_err());
    }

    #[test]
    fn defaults_without_flags() {
        let args = parse(&["med", "notes.txt"]);
        assert_eq!(args.file, PathBuf::from("notes.txt"));
        assert!(args.set.is_empty());
        assert_eq!(args.options().unwrap(), Options::new());
    }

    #[test]
    fn tab_width_flag() {
        let args = parse(&["med", "--tab-width", "8", "a.txt"]);
        assert_eq!(args.options().unwrap().tab_width(), 8);
    }

    #[test]
    fn set_is_repeatable_and_applied_in_order() {
        let args = parse(&["med", "a.txt", "--set", "ts=2", "--set", "tabstop=3"]);
        assert_eq!(args.set, ["ts=2", "tabstop=3"]);
        assert_eq!(args.options().unwrap().tab_width(), 3);
    }

    #[test]
    fn set_overrides_tab_width_flag() {
        let args = parse(&["med", "--tab-width", "8", "--set", "ts=2", "a.txt"]);
        assert_eq!(args.options().unwrap().tab_width(), 2);
    }

    #[test]
    fn bad_set_is_reported() {
        let args = parse(&["med", "a.txt", "--set", "wrap=1"]);
        let err = format!("{:#}", args.options().unwrap_err());
        assert!(err.contains("invalid --set wrap=1"), "{err}");
        assert!(err.contains("unknown option: wrap"), "{err}");
    }
}
