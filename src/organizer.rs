/// The organize engine: one run against one target folder.
///
/// A run snapshots the folder's top-level entries once, then works in two
/// phases. First, legacy top-level folders (`Excel`, `Word`, `PDF`, `Text`)
/// left over from the pre-`Documents/*` layout are merged into their current
/// destinations. Second, each remaining top-level file is classified by
/// extension and moved into its category subfolder. Both phases share the
/// collision resolver, so nothing on disk is ever overwritten.
///
/// The engine is synchronous and sequential; it owns no threads and performs
/// no persistence. The finished [`RunRecord`] is handed back to the caller,
/// which may append it to the history store.
use crate::category::{Category, RuleSet};
use crate::collision;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Legacy top-level folders merged into `Documents/*` before classification.
const LEGACY_FOLDERS: &[(&str, Category)] = &[
    ("Excel", Category::Excel),
    ("Word", Category::Word),
    ("PDF", Category::Pdf),
    ("Text", Category::Text),
];

/// Whether a run performs moves or only plans them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Move files on disk.
    Execute,
    /// Compute the full move plan without touching the filesystem.
    ///
    /// Preview resolves collisions against the filesystem plus the set of
    /// destinations already planned in the same run, so on an unchanged
    /// folder the plan matches what an immediate execute run would do.
    Preview,
}

/// One classified file (or merged legacy entry) move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Path of the entry before the move.
    #[serde(rename = "src")]
    pub source: PathBuf,
    /// Collision-resolved destination path.
    #[serde(rename = "dest")]
    pub destination: PathBuf,
    /// Category label, e.g. `Documents/PDF`. Absent in documents written
    /// by earlier versions, which stored only `src` and `dest`.
    #[serde(default)]
    pub category: String,
    /// When the move was performed (or planned).
    #[serde(default)]
    pub timestamp: String,
}

/// A file that could not be moved. The run continues past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// The frozen result of one organize run.
///
/// Everything beyond `label`, `base`, and the move list defaults on
/// deserialization, so history documents written by earlier versions
/// (which recorded only those three) still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Display label: `<timestamp> • <folder>`.
    pub label: String,
    /// The organized folder.
    #[serde(rename = "base")]
    pub folder: PathBuf,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub finished_at: String,
    /// All moves in the order they were performed.
    #[serde(default)]
    pub moves: Vec<MoveRecord>,
    /// Per-category move counts, keyed by category label.
    #[serde(default)]
    pub counts: BTreeMap<String, usize>,
    /// Loose top-level files moved in the classification phase.
    #[serde(default)]
    pub moved: usize,
    /// Entries relocated out of legacy folders in the merge phase.
    #[serde(default)]
    pub merged: usize,
    /// Top-level entries left alone (subfolders and non-file entries).
    #[serde(default)]
    pub skipped: usize,
    /// Per-file failures; never fatal for the run.
    #[serde(default)]
    pub failures: Vec<MoveFailure>,
    /// True when the run was a preview and nothing was moved on disk.
    #[serde(default)]
    pub preview: bool,
}

impl RunRecord {
    fn new(folder: &Path, preview: bool) -> Self {
        let started = chrono::Local::now();
        Self {
            label: format!(
                "{} • {}",
                started.format("%Y-%m-%d %H:%M:%S"),
                folder.display()
            ),
            folder: folder.to_path_buf(),
            started_at: started.to_rfc3339(),
            finished_at: String::new(),
            moves: Vec::new(),
            counts: BTreeMap::new(),
            moved: 0,
            merged: 0,
            skipped: 0,
            failures: Vec::new(),
            preview,
        }
    }

    /// Total entries relocated by this run (both phases).
    pub fn total_moves(&self) -> usize {
        self.moves.len()
    }

    fn record_move(&mut self, record: &MoveRecord) {
        *self.counts.entry(record.category.clone()).or_insert(0) += 1;
        self.moves.push(record.clone());
    }

    fn record_failure(&mut self, path: PathBuf, reason: String) {
        self.failures.push(MoveFailure { path, reason });
    }
}

/// Errors that abort a run before any filesystem mutation.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target folder is missing or not a directory.
    InvalidTarget { path: PathBuf },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTarget { path } => {
                write!(
                    f,
                    "Invalid target folder {}: not an existing directory",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organize runs.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A top-level entry captured when the run starts.
///
/// Both phases work from this snapshot, so a folder the merge phase creates
/// (`Documents`, say) is never mistaken for a user subfolder by the
/// classification phase, and preview and execute see identical input.
struct TopLevelEntry {
    path: PathBuf,
    name: String,
    is_file: bool,
    is_dir: bool,
}

impl TopLevelEntry {
    fn legacy_category(&self) -> Option<Category> {
        if !self.is_dir {
            return None;
        }
        LEGACY_FOLDERS
            .iter()
            .find(|(name, _)| *name == self.name)
            .map(|(_, category)| *category)
    }
}

/// Orchestrates organize runs.
pub struct Organizer {
    rules: RuleSet,
}

impl Organizer {
    /// Creates an organizer with the standard category rules.
    pub fn new() -> Self {
        Self::with_rules(RuleSet::default())
    }

    /// Creates an organizer with a custom rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Runs one organize pass over `folder`.
    ///
    /// Fails with [`OrganizeError::InvalidTarget`] before touching any file
    /// when the folder is missing or not a directory. Per-file move failures
    /// are recorded in the result and never abort the run.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidydesk::organizer::{Organizer, RunMode};
    /// use std::path::Path;
    ///
    /// let organizer = Organizer::new();
    /// let record = organizer.run(Path::new("/home/user/Downloads"), RunMode::Preview)?;
    /// println!("{} file(s) would move", record.total_moves());
    /// # Ok::<(), tidydesk::organizer::OrganizeError>(())
    /// ```
    pub fn run(&self, folder: &Path, mode: RunMode) -> OrganizeResult<RunRecord> {
        self.run_with(folder, mode, |_| {})
    }

    /// Like [`Organizer::run`], invoking `observer` after each completed
    /// (or, in preview, planned) move. The callback exists so a front end
    /// can drive a progress bar; the engine has no other presentation
    /// awareness.
    pub fn run_with<F>(
        &self,
        folder: &Path,
        mode: RunMode,
        mut observer: F,
    ) -> OrganizeResult<RunRecord>
    where
        F: FnMut(&MoveRecord),
    {
        if !folder.is_dir() {
            return Err(OrganizeError::InvalidTarget {
                path: folder.to_path_buf(),
            });
        }

        let entries = snapshot_top_level(folder);
        let mut run = RunRecord::new(folder, mode == RunMode::Preview);
        let mut planned: HashSet<PathBuf> = HashSet::new();

        // Phase 1: fold legacy folders into Documents/*.
        for entry in &entries {
            if let Some(category) = entry.legacy_category() {
                self.merge_legacy_folder(
                    folder,
                    entry,
                    category,
                    mode,
                    &mut run,
                    &mut planned,
                    &mut observer,
                );
            }
        }

        // Phase 2: classify and move the remaining loose files.
        for entry in &entries {
            if entry.legacy_category().is_some() {
                continue; // handled above
            }
            if !entry.is_file {
                run.skipped += 1;
                continue;
            }
            self.classify_and_move(folder, entry, mode, &mut run, &mut planned, &mut observer);
        }

        run.finished_at = chrono::Local::now().to_rfc3339();
        Ok(run)
    }

    /// Moves one legacy folder's contents into its `Documents/*`
    /// destination, then drops the emptied legacy folder.
    #[allow(clippy::too_many_arguments)]
    fn merge_legacy_folder<F>(
        &self,
        folder: &Path,
        legacy: &TopLevelEntry,
        category: Category,
        mode: RunMode,
        run: &mut RunRecord,
        planned: &mut HashSet<PathBuf>,
        observer: &mut F,
    ) where
        F: FnMut(&MoveRecord),
    {
        let dest_dir = folder.join(category.rel_dir());
        if mode == RunMode::Execute
            && let Err(e) = fs::create_dir_all(&dest_dir)
        {
            run.record_failure(
                dest_dir,
                format!("Could not create destination directory: {}", e),
            );
            return;
        }

        for item in snapshot_top_level(&legacy.path) {
            let proposed = dest_dir.join(&item.name);
            let resolved = if item.is_dir {
                self.resolve_dir(&proposed, mode, planned)
            } else {
                self.resolve_file(&proposed, mode, planned)
            };

            match relocate(&item.path, &resolved, mode) {
                Ok(()) => {
                    let record = MoveRecord {
                        source: item.path,
                        destination: resolved,
                        category: category.label().to_string(),
                        timestamp: chrono::Local::now().to_rfc3339(),
                    };
                    run.merged += 1;
                    observer(&record);
                    run.record_move(&record);
                }
                Err(e) => run.record_failure(item.path, e.to_string()),
            }
        }

        if mode == RunMode::Execute {
            // Entries that failed to move keep the folder non-empty; those
            // failures are already recorded above.
            let _ = fs::remove_dir(&legacy.path);
        }
    }

    /// Classifies one loose file and moves it into its category subfolder.
    fn classify_and_move<F>(
        &self,
        folder: &Path,
        entry: &TopLevelEntry,
        mode: RunMode,
        run: &mut RunRecord,
        planned: &mut HashSet<PathBuf>,
        observer: &mut F,
    ) where
        F: FnMut(&MoveRecord),
    {
        let category = self.rules.classify(&entry.name);
        let dest_dir = folder.join(category.rel_dir());
        if mode == RunMode::Execute
            && let Err(e) = fs::create_dir_all(&dest_dir)
        {
            run.record_failure(
                entry.path.clone(),
                format!("Could not create destination directory: {}", e),
            );
            return;
        }

        let resolved = self.resolve_file(&dest_dir.join(&entry.name), mode, planned);
        match relocate(&entry.path, &resolved, mode) {
            Ok(()) => {
                let record = MoveRecord {
                    source: entry.path.clone(),
                    destination: resolved,
                    category: category.label().to_string(),
                    timestamp: chrono::Local::now().to_rfc3339(),
                };
                run.moved += 1;
                observer(&record);
                run.record_move(&record);
            }
            Err(e) => run.record_failure(entry.path.clone(), e.to_string()),
        }
    }

    fn resolve_file(
        &self,
        proposed: &Path,
        mode: RunMode,
        planned: &mut HashSet<PathBuf>,
    ) -> PathBuf {
        let resolved = match mode {
            RunMode::Execute => collision::unique_path(proposed),
            RunMode::Preview => {
                collision::resolve_file(proposed, |p| p.exists() || planned.contains(p))
            }
        };
        if mode == RunMode::Preview {
            planned.insert(resolved.clone());
        }
        resolved
    }

    fn resolve_dir(
        &self,
        proposed: &Path,
        mode: RunMode,
        planned: &mut HashSet<PathBuf>,
    ) -> PathBuf {
        let resolved = match mode {
            RunMode::Execute => collision::unique_dir(proposed),
            RunMode::Preview => {
                collision::resolve_dir(proposed, |p| p.exists() || planned.contains(p))
            }
        };
        if mode == RunMode::Preview {
            planned.insert(resolved.clone());
        }
        resolved
    }
}

impl Default for Organizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper bound on the number of moves a run over `folder` can perform.
///
/// Legacy folders contribute one move per contained entry; every other
/// top-level entry contributes at most one. Suitable for sizing a progress
/// bar: the observer fires once per move, so the tick count never exceeds
/// this bound.
pub fn estimated_moves(folder: &Path) -> u64 {
    snapshot_top_level(folder)
        .iter()
        .map(|entry| {
            if entry.legacy_category().is_some() {
                snapshot_top_level(&entry.path).len() as u64
            } else {
                1
            }
        })
        .sum()
}

fn relocate(source: &Path, destination: &Path, mode: RunMode) -> std::io::Result<()> {
    match mode {
        RunMode::Execute => fs::rename(source, destination),
        RunMode::Preview => Ok(()),
    }
}

/// Captures a directory's entries, sorted by file name.
///
/// `read_dir` order is platform-dependent; runs are specified to be
/// deterministic, so entries are always processed in name order. An
/// unreadable directory yields an empty snapshot (it vanished mid-run;
/// nothing left to do with it).
fn snapshot_top_level(dir: &Path) -> Vec<TopLevelEntry> {
    let mut entries: Vec<TopLevelEntry> = match fs::read_dir(dir) {
        Ok(iter) => iter
            .flatten()
            .map(|entry| {
                let file_type = entry.file_type();
                TopLevelEntry {
                    path: entry.path(),
                    name: entry.file_name().to_string_lossy().to_string(),
                    is_file: file_type.as_ref().map(|t| t.is_file()).unwrap_or(false),
                    is_dir: file_type.as_ref().map(|t| t.is_dir()).unwrap_or(false),
                }
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}
