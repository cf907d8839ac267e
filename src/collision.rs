/// Collision-avoiding destination paths.
///
/// When a move target already exists, these helpers append an incrementing
/// counter to the name (`report.pdf` -> `report (1).pdf`, `Excel` ->
/// `Excel (1)`) until a free path is found. Existing entries are never
/// overwritten.
///
/// The resolvers are generic over an occupancy predicate so that preview
/// runs can treat planned-but-not-performed moves as occupying their
/// destinations. The check-then-move sequence is not atomic against
/// concurrent external filesystem changes; that race is an accepted
/// limitation of a single-user tool.
use std::path::{Path, PathBuf};

/// Resolves a file destination against an occupancy predicate.
///
/// Returns `target` unchanged when unoccupied; otherwise inserts
/// ` (n)` between the file stem and extension, with the smallest free `n`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use tidydesk::collision::resolve_file;
///
/// let taken = [PathBuf::from("/docs/report.pdf")];
/// let resolved = resolve_file(Path::new("/docs/report.pdf"), |p| {
///     taken.iter().any(|t| t == p)
/// });
/// assert_eq!(resolved, PathBuf::from("/docs/report (1).pdf"));
/// ```
pub fn resolve_file<F>(target: &Path, occupied: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !occupied(target) {
        return target.to_path_buf();
    }

    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = target
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = target.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1u64;
    loop {
        let candidate = parent.join(format!("{} ({}){}", stem, counter, suffix));
        if !occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Resolves a directory destination against an occupancy predicate.
///
/// Directories get the counter after the full name: `Excel` -> `Excel (1)`.
pub fn resolve_dir<F>(target: &Path, occupied: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !occupied(target) {
        return target.to_path_buf();
    }

    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let parent = target.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 1u64;
    loop {
        let candidate = parent.join(format!("{} ({})", name, counter));
        if !occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Resolves a file destination against the filesystem.
pub fn unique_path(target: &Path) -> PathBuf {
    resolve_file(target, |p| p.exists())
}

/// Resolves a directory destination against the filesystem.
pub fn unique_dir(target: &Path) -> PathBuf {
    resolve_dir(target, |p| p.exists())
}
