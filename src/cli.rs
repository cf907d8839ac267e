//! Command-line orchestration for tidydesk.
//!
//! This module wires the pieces together for one invocation: load settings,
//! run the organize engine (for real or as a preview), render the result,
//! and append the run to the history store. It also serves the history
//! listing and theme-preference commands.
//!
//! A failure to persist the history record is reported as a warning after
//! the run; it never turns a successful reorganization into a failure.

use crate::config::Settings;
use crate::history::{HistoryStore, Theme};
use crate::organizer::{self, Organizer, RunMode, RunRecord};
use crate::output::OutputFormatter;
use std::path::{Path, PathBuf};

/// A single tidydesk invocation.
#[derive(Debug, Clone)]
pub enum Command {
    /// Organize a folder (or plan the organization without moving anything).
    Organize {
        /// Target folder; falls back to the configured or platform default.
        folder: Option<PathBuf>,
        /// If true, compute the plan without touching the filesystem.
        preview: bool,
    },
    /// Print the stored run history, newest first.
    ShowHistory,
    /// Persist a new theme preference.
    SetTheme(Theme),
}

/// Runs one command against the given settings file (or the default
/// settings lookup when `config_path` is `None`).
///
/// # Examples
///
/// ```no_run
/// use tidydesk::cli::{Command, run_command};
/// use std::path::PathBuf;
///
/// let command = Command::Organize {
///     folder: Some(PathBuf::from("/home/user/Downloads")),
///     preview: true,
/// };
/// if let Err(e) = run_command(command, None) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_command(command: Command, config_path: Option<&Path>) -> Result<(), String> {
    let settings =
        Settings::load(config_path).map_err(|e| format!("Error loading settings: {}", e))?;
    let store = HistoryStore::new(settings.history_path());

    match command {
        Command::Organize { folder, preview } => {
            let folder = folder.unwrap_or_else(|| settings.target_folder());
            organize_folder(&folder, preview, &store)
        }
        Command::ShowHistory => {
            show_history(&store);
            Ok(())
        }
        Command::SetTheme(theme) => {
            store
                .set_theme(theme)
                .map_err(|e| format!("Error: {}", e))?;
            OutputFormatter::success(&format!("Theme preference set to {}.", theme));
            Ok(())
        }
    }
}

/// Runs the engine over `folder` and renders and records the result.
fn organize_folder(folder: &Path, preview: bool, store: &HistoryStore) -> Result<(), String> {
    let mode = if preview {
        RunMode::Preview
    } else {
        RunMode::Execute
    };

    if preview {
        OutputFormatter::preview_notice(&format!(
            "Analyzing contents of: {}",
            folder.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", folder.display()));
    }

    let progress = OutputFormatter::create_progress_bar(organizer::estimated_moves(folder));
    let record = Organizer::new()
        .run_with(folder, mode, |_| progress.inc(1))
        .map_err(|e| format!("Error: {}", e))?;
    progress.finish_and_clear();

    render_run(&record, folder, preview);

    if !record.failures.is_empty() {
        OutputFormatter::warning(&format!(
            "{} file(s) could not be moved:",
            record.failures.len()
        ));
        for failure in &record.failures {
            OutputFormatter::error(&format!("{}: {}", failure.path.display(), failure.reason));
        }
    }

    if preview {
        OutputFormatter::plain("");
        OutputFormatter::success("Preview complete. No files were modified.");
        return Ok(());
    }

    // History persistence is reported separately from run success.
    match store.append(record) {
        Ok(()) => {
            OutputFormatter::plain("");
            OutputFormatter::success(&format!(
                "Organization complete. History saved to {}.",
                store.path().display()
            ));
        }
        Err(e) => {
            OutputFormatter::plain("");
            OutputFormatter::success("Organization complete.");
            OutputFormatter::warning(&format!("Could not save history: {}", e));
        }
    }

    Ok(())
}

/// Prints a run's move list and summary.
fn render_run(record: &RunRecord, folder: &Path, preview: bool) {
    if record.moves.is_empty() {
        OutputFormatter::plain("No files to move.");
    } else {
        for record_move in &record.moves {
            let name = record_move
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| record_move.source.display().to_string());
            let destination = record_move
                .destination
                .strip_prefix(folder)
                .unwrap_or(&record_move.destination);
            if preview {
                OutputFormatter::plain(&format!(
                    " - {} -> {} (would move)",
                    name,
                    destination.display()
                ));
            } else {
                OutputFormatter::plain(&format!(" - {} -> {}", name, destination.display()));
            }
        }
    }

    OutputFormatter::summary_table(&record.counts, record.moved + record.merged, record.skipped);
}

/// Prints the stored run history, newest first.
fn show_history(store: &HistoryStore) {
    let document = store.load();
    if document.runs.is_empty() {
        OutputFormatter::plain("No runs yet.");
        return;
    }

    for run in &document.runs {
        OutputFormatter::header(&format!("{} • {} file(s)", run.label, run.total_moves()));
        for record_move in &run.moves {
            let name = record_move
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| record_move.source.display().to_string());
            let destination = record_move
                .destination
                .strip_prefix(&run.folder)
                .unwrap_or(&record_move.destination);
            OutputFormatter::plain(&format!("   {} -> {}", name, destination.display()));
        }
        if !run.failures.is_empty() {
            OutputFormatter::warning(&format!("   {} failure(s)", run.failures.len()));
        }
    }
    OutputFormatter::plain(&format!(
        "\nHistory is saved to {}.",
        store.path().display()
    ));
}
