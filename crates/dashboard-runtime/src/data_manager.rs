//! Fingerprint-cached data manager for the dashboard.
//!
//! Wraps [`load_dashboard`] with a per-directory cache. Callers use
//! [`DataManager::get_data`] to obtain a fresh-or-cached [`DashboardData`];
//! a cache entry is reused only while the directory fingerprint is unchanged.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashboard_core::error::Result;
use dashboard_core::experiment::ExperimentConfig;
use dashboard_data::analysis::{load_dashboard, DashboardData};
use dashboard_data::growth::GrowthSource;

use crate::fingerprint::DirFingerprint;

// ── Cache entry ───────────────────────────────────────────────────────────────

struct CacheEntry {
    fingerprint: DirFingerprint,
    data: Arc<DashboardData>,
    loaded_at: Instant,
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Cached wrapper around the full loading pipeline.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use dashboard_core::experiment::ExperimentConfig;
/// use dashboard_data::growth::GrowthSource;
/// use dashboard_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new(ExperimentConfig::default(), GrowthSource::Discover);
/// let data = mgr.get_data(Path::new("data"), false).unwrap();
/// println!("groups: {}", data.aggregation().summaries.len());
/// ```
pub struct DataManager {
    config: ExperimentConfig,
    growth_source: GrowthSource,
    /// Loaded dashboards keyed by canonical data directory.
    cache: HashMap<PathBuf, CacheEntry>,
    /// Human-readable description of the last load error.
    last_error: Option<String>,
}

impl DataManager {
    pub fn new(config: ExperimentConfig, growth_source: GrowthSource) -> Self {
        Self {
            config,
            growth_source,
            cache: HashMap::new(),
            last_error: None,
        }
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the dashboard for `dir`, using the cache when it is still valid.
    ///
    /// When `force_refresh` is `true` the cache is bypassed. A failed load
    /// drops any cached entry for `dir` and returns the error.
    pub fn get_data(&mut self, dir: &Path, force_refresh: bool) -> Result<Arc<DashboardData>> {
        let key = cache_key(dir);
        let fingerprint = DirFingerprint::capture(&key);

        if !force_refresh {
            if let Some(entry) = self.cache.get(&key) {
                if entry.fingerprint == fingerprint {
                    tracing::debug!(dir = %key.display(), "returning cached dashboard");
                    return Ok(Arc::clone(&entry.data));
                }
                tracing::debug!(dir = %key.display(), "data directory changed; reloading");
            }
        }

        self.cache.remove(&key);

        match load_dashboard(&key, &self.config, &self.growth_source) {
            Ok(data) => {
                let data = Arc::new(data);
                tracing::debug!(
                    dir = %key.display(),
                    files = fingerprint.files().len(),
                    "dashboard cache updated"
                );
                self.cache.insert(
                    key,
                    CacheEntry {
                        fingerprint,
                        data: Arc::clone(&data),
                        loaded_at: Instant::now(),
                    },
                );
                self.last_error = None;
                Ok(data)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dashboard load failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Discard the cache entry for `dir`, forcing the next load.
    pub fn invalidate(&mut self, dir: &Path) {
        if self.cache.remove(&cache_key(dir)).is_some() {
            tracing::debug!(dir = %dir.display(), "cache invalidated");
        }
    }

    /// Discard every cache entry.
    pub fn clear(&mut self) {
        self.cache.clear();
        tracing::debug!("cache cleared");
    }

    /// Age of the cache entry for `dir`, or `None` if nothing is cached.
    pub fn cache_age(&self, dir: &Path) -> Option<Duration> {
        self.cache
            .get(&cache_key(dir))
            .map(|entry| entry.loaded_at.elapsed())
    }

    /// Human-readable description of the last load error, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Canonical form of `dir`, or `dir` itself when it cannot be canonicalized.
fn cache_key(dir: &Path) -> PathBuf {
    dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::error::DashboardError;
    use dashboard_core::experiment::Group;
    use dashboard_core::models::growth_columns as cols;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    const ENV_HEADER: &str = "time,temperature,humidity,ph,ec\n";

    fn write_env(dir: &Path, rows: &[&str]) {
        let mut body = String::from(ENV_HEADER);
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        std::fs::write(dir.join("A_환경데이터.csv"), body).unwrap();
    }

    fn write_growth(dir: &Path, weights: &[f64]) {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name("A").unwrap();
        ws.write_string(0, 0, cols::FRESH_WEIGHT).unwrap();
        ws.write_string(0, 1, cols::LEAF_COUNT).unwrap();
        ws.write_string(0, 2, cols::SHOOT_LENGTH).unwrap();
        for (i, w) in weights.iter().enumerate() {
            let row = (i + 1) as u32;
            ws.write_number(row, 0, *w).unwrap();
            ws.write_number(row, 1, 5.0).unwrap();
            ws.write_number(row, 2, 40.0).unwrap();
        }
        workbook.save(dir.join("생육결과.xlsx")).unwrap();
    }

    /// Returns a DataManager + TempDir holding a one-group data directory.
    fn make_manager_with_dir() -> (DataManager, TempDir) {
        let dir = TempDir::new().unwrap();
        write_env(dir.path(), &["2025-05-26 10:00:00,20,60,6.0,1.0"]);
        write_growth(dir.path(), &[2.0, 4.0]);
        let config = ExperimentConfig::new(vec![Group::new("A", 1.0)]).unwrap();
        (DataManager::new(config, GrowthSource::Discover), dir)
    }

    // ── cache hit ─────────────────────────────────────────────────────────

    #[test]
    fn test_second_call_is_cache_hit() {
        let (mut mgr, dir) = make_manager_with_dir();

        assert!(mgr.cache_age(dir.path()).is_none());
        let first = mgr.get_data(dir.path(), false).unwrap();
        let second = mgr.get_data(dir.path(), false).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(mgr.cache_age(dir.path()).unwrap() < Duration::from_secs(5));
        assert!(mgr.last_error().is_none());
    }

    // ── reload on change ──────────────────────────────────────────────────

    #[test]
    fn test_modified_file_triggers_reload() {
        let (mut mgr, dir) = make_manager_with_dir();

        let first = mgr.get_data(dir.path(), false).unwrap();
        assert_eq!(first.aggregation().summaries[0].environment_rows, 1);

        write_env(
            dir.path(),
            &[
                "2025-05-26 10:00:00,20,60,6.0,1.0",
                "2025-05-26 11:00:00,22,62,6.0,1.0",
            ],
        );
        let second = mgr.get_data(dir.path(), false).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.aggregation().summaries[0].environment_rows, 2);
    }

    #[test]
    fn test_force_refresh_bypasses_cache() {
        let (mut mgr, dir) = make_manager_with_dir();

        let first = mgr.get_data(dir.path(), false).unwrap();
        let second = mgr.get_data(dir.path(), true).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
    }

    // ── invalidation ──────────────────────────────────────────────────────

    #[test]
    fn test_invalidate_forces_reload() {
        let (mut mgr, dir) = make_manager_with_dir();

        let first = mgr.get_data(dir.path(), false).unwrap();
        mgr.invalidate(dir.path());
        assert!(mgr.cache_age(dir.path()).is_none());

        let second = mgr.get_data(dir.path(), false).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_clear() {
        let (mut mgr, dir) = make_manager_with_dir();

        mgr.get_data(dir.path(), false).unwrap();
        mgr.clear();
        assert!(mgr.cache_age(dir.path()).is_none());
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn test_failed_load_drops_stale_entry() {
        let (mut mgr, dir) = make_manager_with_dir();

        mgr.get_data(dir.path(), false).unwrap();
        std::fs::remove_file(dir.path().join("A_환경데이터.csv")).unwrap();

        let err = mgr.get_data(dir.path(), false).unwrap_err();
        assert!(matches!(err, DashboardError::MissingFile { .. }));
        assert!(mgr.cache_age(dir.path()).is_none());
        assert!(mgr.last_error().unwrap().contains("A_환경데이터.csv"));

        write_env(dir.path(), &["2025-05-26 10:00:00,20,60,6.0,1.0"]);
        mgr.get_data(dir.path(), false).unwrap();
        assert!(mgr.last_error().is_none());
    }

    #[test]
    fn test_missing_dir_is_error() {
        let (mut mgr, dir) = make_manager_with_dir();

        let err = mgr.get_data(&dir.path().join("nope"), false).unwrap_err();
        assert!(matches!(err, DashboardError::DataPathNotFound(_)));
    }

    #[test]
    fn test_directories_are_cached_separately() {
        let (mut mgr, dir) = make_manager_with_dir();
        let other = TempDir::new().unwrap();
        write_env(other.path(), &["2025-05-26 10:00:00,30,60,6.0,1.0"]);
        write_growth(other.path(), &[8.0]);

        let a = mgr.get_data(dir.path(), false).unwrap();
        let b = mgr.get_data(other.path(), false).unwrap();

        assert_eq!(a.aggregation().best.as_ref().unwrap().mean_fresh_weight, 3.0);
        assert_eq!(b.aggregation().best.as_ref().unwrap().mean_fresh_weight, 8.0);
        assert!(mgr.cache_age(dir.path()).is_some());
        assert!(mgr.cache_age(other.path()).is_some());
    }
}
