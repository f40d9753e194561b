//! colfm - A keyboard-driven Miller-column file browser.
//!
//! Usage:
//!   colfm [PATH]              Browse, starting at PATH
//!   colfm --resume            Start in the directory left at the last exit
//!   colfm marks               Print the saved marks
//!   colfm marks --clear       Forget the saved marks
//!   colfm --help              Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};

use colfm_core::{Browser, Config, MarkSet, SortKey, StateStore};

#[derive(Parser)]
#[command(
    name = "colfm",
    version,
    about = "A keyboard-driven Miller-column file browser",
    long_about = "colfm shows the directory path as a row of columns, one per level.\n\n\
                  Run `colfm [PATH]` to start browsing. Marks and the last directory \
                  are kept between runs; `colfm marks` prints them without starting \
                  the browser."
)]
struct Cli {
    /// Directory to start in (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for marks, last directory and the log
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Start in the directory active at the last exit
    #[arg(short, long)]
    resume: bool,

    /// Show dotfiles
    #[arg(short = 'a', long)]
    hidden: bool,

    /// Show the preview sidebar
    #[arg(short, long)]
    sidebar: bool,

    /// Sort key (name, extension, size, atime, ctime, mtime)
    #[arg(long, value_name = "KEY")]
    sort: Option<SortKey>,

    /// Reverse the sort order
    #[arg(short = 'R', long)]
    reverse: bool,

    /// Log filter, e.g. `info` or `colfm_core=debug` (overrides COLFM_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print or clear the saved marks
    Marks {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Remove every saved mark
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let store = StateStore::locate(cli.state_dir.clone()).context("No state directory")?;

    match cli.command {
        Some(Command::Marks { format, clear }) => run_marks(&store, format, clear),
        None => run_browser(&cli, &store),
    }
}

fn run_browser(cli: &Cli, store: &StateStore) -> Result<()> {
    let _log_guard = colfm_tui::logging::init(&store.log_path(), cli.log_level.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Invalid config {}", path.display()))?,
        None => Config::load(),
    };
    if cli.hidden {
        config.show_hidden = true;
    }
    if cli.sidebar {
        config.sidebar = true;
    }
    if cli.reverse {
        config.reverse = true;
    }
    if let Some(sort) = cli.sort {
        config.sort = sort;
    }

    let marks = store.load_marks().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read saved marks");
        MarkSet::new()
    });
    let start = start_directory(cli, store)?;
    tracing::info!(start = %start.display(), "starting");

    let browser = colfm_tui::run(Browser::new(config, &start, marks))?;
    save_state(store, &browser);
    Ok(())
}

/// The last directory when resuming and it still exists, else `cli.path`.
fn start_directory(cli: &Cli, store: &StateStore) -> Result<PathBuf> {
    if cli.resume {
        match store.load_lastdir() {
            Ok(Some(dir)) if dir.is_dir() => return Ok(dir),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "could not read last directory"),
        }
    }
    cli.path.canonicalize().context("Invalid path")
}

/// Write marks and the last directory. Failures are logged only.
fn save_state(store: &StateStore, browser: &Browser) {
    if let Err(e) = store.save_marks(browser.marks()) {
        tracing::warn!(error = %e, "could not save marks");
    }
    if let Some(dir) = browser.working_directory()
        && let Err(e) = store.save_lastdir(dir)
    {
        tracing::warn!(error = %e, "could not save last directory");
    }
}

fn run_marks(store: &StateStore, format: OutputFormat, clear: bool) -> Result<()> {
    let marks = store.load_marks().context("Failed to read saved marks")?;

    if clear {
        store.clear_marks().context("Failed to clear marks")?;
        eprintln!("Cleared {} mark(s)", marks.len());
        return Ok(());
    }

    match format {
        OutputFormat::Text => {
            for path in marks.iter() {
                println!("{}", path.display());
            }
        }
        OutputFormat::Json => {
            let paths: Vec<&Path> = marks.iter().collect();
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
    }
    Ok(())
}
