//! Flat data-directory lookup tolerant of Unicode normalization differences.

use std::path::{Path, PathBuf};

use dashboard_core::normalize::{names_match, normalize_name};
use tracing::{debug, warn};

/// Regular files directly inside `dir`, sorted by file name.
///
/// A missing or unreadable directory yields an empty list.
fn flat_files(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// Find the file in `dir` whose name matches `target` under NFC or NFD.
///
/// Returns `None` when nothing matches, including when `dir` does not exist.
pub fn resolve_file(dir: &Path, target: &str) -> Option<PathBuf> {
    if !dir.is_dir() {
        warn!("Data path does not exist: {}", dir.display());
        return None;
    }

    let found = flat_files(dir).into_iter().find(|path| {
        path.file_name()
            .map(|name| names_match(&name.to_string_lossy(), target))
            .unwrap_or(false)
    });

    match &found {
        Some(path) => debug!("Resolved {} -> {}", target, path.display()),
        None => debug!("No entry in {} matches {}", dir.display(), target),
    }
    found
}

/// Human-readable file name of `path` for error messages, NFC-normalized.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| normalize_name(&name.to_string_lossy()))
        .unwrap_or_else(|| path.display().to_string())
}

/// Files directly inside `dir` whose extension equals `ext`, ignoring case.
pub fn list_files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    flat_files(dir)
        .into_iter()
        .filter(|path| {
            path.extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
                .unwrap_or(false)
        })
        .collect()
}
