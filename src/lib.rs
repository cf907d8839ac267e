//! tidydesk - sort a folder's files into category subfolders
//!
//! This library classifies files by extension into a fixed set of
//! destination buckets (Documents/Excel, Documents/Word, Documents/PDF,
//! Documents/Text, Media/Images, Media/Videos, Other), moves them without
//! ever overwriting an existing file, folds legacy top-level category
//! folders into the `Documents/*` layout, and keeps a JSON-backed history
//! of runs together with a theme preference for the shell on top.

pub mod category;
pub mod cli;
pub mod collision;
pub mod config;
pub mod history;
pub mod organizer;
pub mod output;

pub use category::{Category, RuleSet};
pub use config::{ConfigError, Settings};
pub use history::{HistoryDocument, HistoryStore, Theme};
pub use organizer::{MoveRecord, OrganizeError, Organizer, RunMode, RunRecord};

pub use cli::{Command, run_command};
