//! Content fingerprint of a flat data directory.

use std::path::Path;
use std::time::SystemTime;

use dashboard_core::normalize::normalize_name;

/// Name, size and modification time of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    /// NFC-normalized file name.
    pub name: String,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Stamps of every regular file directly inside a directory, sorted by name.
///
/// Two captures compare equal when no file was added, removed, resized or
/// touched in between.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirFingerprint {
    files: Vec<FileStamp>,
}

impl DirFingerprint {
    /// Capture the current state of `dir`. A missing directory yields an
    /// empty fingerprint.
    pub fn capture(dir: &Path) -> Self {
        let mut files: Vec<FileStamp> = walkdir::WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let meta = entry.metadata().ok()?;
                Some(FileStamp {
                    name: normalize_name(&entry.file_name().to_string_lossy()),
                    len: meta.len(),
                    modified: meta.modified().ok(),
                })
            })
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Self { files }
    }

    pub fn files(&self) -> &[FileStamp] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_capture_sorted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.csv"), "bb").unwrap();
        std::fs::write(dir.path().join("a.csv"), "a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let fp = DirFingerprint::capture(dir.path());
        let names: Vec<&str> = fp.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
        assert_eq!(fp.files()[1].len, 2);
    }

    #[test]
    fn test_capture_is_stable() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.csv"), "a").unwrap();

        assert_eq!(
            DirFingerprint::capture(dir.path()),
            DirFingerprint::capture(dir.path())
        );
    }

    #[test]
    fn test_capture_detects_changes() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.csv"), "a").unwrap();
        let before = DirFingerprint::capture(dir.path());

        std::fs::write(dir.path().join("a.csv"), "abc").unwrap();
        assert_ne!(before, DirFingerprint::capture(dir.path()));

        let resized = DirFingerprint::capture(dir.path());
        std::fs::write(dir.path().join("c.csv"), "c").unwrap();
        assert_ne!(resized, DirFingerprint::capture(dir.path()));
    }

    #[test]
    fn test_capture_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(DirFingerprint::capture(&dir.path().join("nope")).is_empty());
    }
}
