use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tidydesk::cli::{Command, run_command};
use tidydesk::history::Theme;

/// Sort a folder's files into Documents, Media, and Other subfolders.
#[derive(Parser, Debug)]
#[command(name = "tidydesk", version, about)]
struct Cli {
    /// Folder to organize (defaults to the configured folder, then Downloads)
    folder: Option<PathBuf>,

    /// Show the move plan without touching any file
    #[arg(long)]
    preview: bool,

    /// Print the stored run history instead of organizing
    #[arg(long, conflicts_with_all = ["preview", "set_theme"])]
    show_history: bool,

    /// Persist a theme preference (light or dark) instead of organizing
    #[arg(long, value_name = "THEME", conflicts_with = "preview")]
    set_theme: Option<Theme>,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let command = if cli.show_history {
        Command::ShowHistory
    } else if let Some(theme) = cli.set_theme {
        Command::SetTheme(theme)
    } else {
        Command::Organize {
            folder: cli.folder,
            preview: cli.preview,
        }
    };

    if let Err(e) = run_command(command, cli.config.as_deref()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
