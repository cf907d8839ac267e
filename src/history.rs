/// JSON-backed run history and theme preference.
///
/// The history lives in a single document at a per-user path (by default
/// `Documents/tidydesk/organizer_history.json`). Runs are stored newest
/// first and capped at [`HISTORY_CAP`]; the document also carries the UI
/// theme preference, so a theme change and a run append go through the same
/// load-modify-write cycle without disturbing each other.
///
/// Loading fails soft: a missing or unparseable file yields an empty
/// document, never an error. Writes go to a temporary file in the same
/// directory and are renamed into place, so a reader never observes a
/// partially written document.
use crate::organizer::RunRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Maximum number of runs retained in the document.
pub const HISTORY_CAP: usize = 20;

/// UI theme preference, persisted alongside the run history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}' (expected light or dark)", other)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// The full persisted document: theme preference plus ordered run records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(default)]
    pub theme: Theme,
    /// Run records, newest first.
    #[serde(default, rename = "history")]
    pub runs: Vec<RunRecord>,
}

/// Errors from persisting the history document.
///
/// Read-side problems are deliberately absent: loading fails soft.
#[derive(Debug)]
pub enum HistoryError {
    /// The document could not be written (disk full, permissions, ...).
    WriteFailed { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WriteFailed { path, source } => {
                write!(
                    f,
                    "Failed to write history file {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for HistoryError {}

/// Reads and writes the history document at a fixed path.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Creates a store over an explicit file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The conventional per-user history location:
    /// `<Documents>/tidydesk/organizer_history.json`, falling back to the
    /// home directory when no Documents folder is known.
    pub fn default_path() -> PathBuf {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tidydesk")
            .join("organizer_history.json")
    }

    /// The file path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full document.
    ///
    /// A missing file or unparseable content yields an empty document; the
    /// tool stays usable even if the history is lost.
    pub fn load(&self) -> HistoryDocument {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => HistoryDocument::default(),
        }
    }

    /// Appends a run record and writes the document back.
    ///
    /// The new run goes to the front; the document keeps at most
    /// [`HISTORY_CAP`] runs. The theme preference is carried over unchanged.
    pub fn append(&self, run: RunRecord) -> Result<(), HistoryError> {
        let mut document = self.load();
        document.runs.insert(0, run);
        document.runs.truncate(HISTORY_CAP);
        self.write(&document)
    }

    /// Persists a new theme preference without disturbing the run list.
    pub fn set_theme(&self, theme: Theme) -> Result<(), HistoryError> {
        let mut document = self.load();
        document.theme = theme;
        self.write(&document)
    }

    /// The stored theme preference.
    pub fn theme(&self) -> Theme {
        self.load().theme
    }

    /// Writes the document atomically: serialize into a temporary file in
    /// the destination directory, then rename over the target.
    fn write(&self, document: &HistoryDocument) -> Result<(), HistoryError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        fs::create_dir_all(&parent).map_err(|e| HistoryError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        let json = serde_json::to_string_pretty(document).map_err(|e| {
            HistoryError::WriteFailed {
                path: self.path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            }
        })?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent).map_err(|e| {
            HistoryError::WriteFailed {
                path: self.path.clone(),
                source: e,
            }
        })?;
        temp.write_all(json.as_bytes())
            .map_err(|e| HistoryError::WriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        temp.persist(&self.path)
            .map_err(|e| HistoryError::WriteFailed {
                path: self.path.clone(),
                source: e.error,
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::{Organizer, RunMode};
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> HistoryStore {
        HistoryStore::new(temp_dir.path().join("history.json"))
    }

    fn sample_run(temp_dir: &TempDir, name: &str) -> RunRecord {
        let folder = temp_dir.path().join(name);
        fs::create_dir_all(&folder).expect("Failed to create folder");
        fs::write(folder.join("a.pdf"), "data").expect("Failed to write file");
        Organizer::new()
            .run(&folder, RunMode::Execute)
            .expect("Run failed")
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);

        let document = store.load();
        assert!(document.runs.is_empty());
        assert_eq!(document.theme, Theme::Light);
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);
        fs::write(store.path(), "{not valid json!").expect("Failed to write file");

        let document = store.load();
        assert!(document.runs.is_empty());
    }

    #[test]
    fn test_append_after_corrupt_file_recovers() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);
        fs::write(store.path(), "garbage").expect("Failed to write file");

        let run = sample_run(&temp_dir, "target");
        store.append(run).expect("Append failed");

        let document = store.load();
        assert_eq!(document.runs.len(), 1);
        assert_eq!(document.runs[0].moved, 1);
    }

    #[test]
    fn test_append_is_newest_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);

        let first = sample_run(&temp_dir, "first");
        let second = sample_run(&temp_dir, "second");
        store.append(first).expect("Append failed");
        store.append(second).expect("Append failed");

        let document = store.load();
        assert_eq!(document.runs.len(), 2);
        assert!(document.runs[0].folder.ends_with("second"));
        assert!(document.runs[1].folder.ends_with("first"));
    }

    #[test]
    fn test_history_cap_drops_oldest() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);

        let template = sample_run(&temp_dir, "target");
        for i in 0..(HISTORY_CAP + 1) {
            let mut run = template.clone();
            run.label = format!("run {}", i);
            store.append(run).expect("Append failed");
        }

        let document = store.load();
        assert_eq!(document.runs.len(), HISTORY_CAP);
        assert_eq!(document.runs[0].label, format!("run {}", HISTORY_CAP));
        // "run 0" fell off the end.
        assert!(document.runs.iter().all(|r| r.label != "run 0"));
    }

    #[test]
    fn test_theme_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);

        assert_eq!(store.theme(), Theme::Light);
        store.set_theme(Theme::Dark).expect("Set theme failed");
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn test_theme_survives_append() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);

        store.set_theme(Theme::Dark).expect("Set theme failed");
        store
            .append(sample_run(&temp_dir, "target"))
            .expect("Append failed");

        let document = store.load();
        assert_eq!(document.theme, Theme::Dark);
        assert_eq!(document.runs.len(), 1);
    }

    #[test]
    fn test_set_theme_keeps_runs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);

        store
            .append(sample_run(&temp_dir, "target"))
            .expect("Append failed");
        store.set_theme(Theme::Dark).expect("Set theme failed");

        let document = store.load();
        assert_eq!(document.runs.len(), 1);
    }

    #[test]
    fn test_document_wire_format() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);
        store
            .append(sample_run(&temp_dir, "target"))
            .expect("Append failed");

        let raw = fs::read_to_string(store.path()).expect("Failed to read file");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("Invalid JSON");
        assert_eq!(value["theme"], "light");
        assert!(value["history"].is_array());
        let run = &value["history"][0];
        assert!(run["label"].is_string());
        assert!(run["base"].is_string());
        assert_eq!(run["moves"][0]["category"], "Documents/PDF");
        assert!(run["moves"][0]["src"].is_string());
        assert!(run["moves"][0]["dest"].is_string());
    }

    #[test]
    fn test_loads_documents_from_earlier_versions() {
        // Earlier versions stored only label, base, and bare src/dest
        // moves; such a document must load, not vanish as corrupt.
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = store_in(&temp_dir);
        let raw = r#"{
            "theme": "dark",
            "history": [
                {
                    "label": "2024-01-01 10:00:00 • /tmp/inbox",
                    "base": "/tmp/inbox",
                    "moves": [
                        {"src": "/tmp/inbox/a.pdf", "dest": "/tmp/inbox/Documents/PDF/a.pdf"}
                    ]
                }
            ]
        }"#;
        fs::write(store.path(), raw).expect("Failed to write file");

        let document = store.load();
        assert_eq!(document.theme, Theme::Dark);
        assert_eq!(document.runs.len(), 1);
        let run = &document.runs[0];
        assert_eq!(run.moves.len(), 1);
        assert!(run.moves[0].destination.ends_with("Documents/PDF/a.pdf"));
        // Fields the old format never wrote come back as defaults.
        assert!(run.moves[0].category.is_empty());
        assert_eq!(run.moved, 0);
        assert!(run.failures.is_empty());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = HistoryStore::new(temp_dir.path().join("nested/dir/history.json"));

        store
            .append(sample_run(&temp_dir, "target"))
            .expect("Append failed");
        assert!(store.path().is_file());
    }
}
