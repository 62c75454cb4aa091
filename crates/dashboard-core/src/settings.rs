use clap::Parser;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::experiment::ExperimentConfig;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Compare plant growth across nutrient-solution EC levels
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ec-dashboard",
    about = "Compare plant growth across nutrient-solution EC levels",
    version
)]
pub struct Settings {
    /// Directory holding the environment CSV logs and the growth workbook
    #[arg(long, env = "EC_DASHBOARD_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Growth workbook filename inside the data directory (discovered if omitted)
    #[arg(long)]
    pub growth_file: Option<String>,

    /// Experiment definition (JSON); defaults to ~/.ec-dashboard/experiment.json
    /// or the built-in four-group trial
    #[arg(long, env = "EC_DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Write the per-group summary workbook to this path
    #[arg(long)]
    pub export_summary: Option<PathBuf>,

    /// Write the combined growth workbook to this path
    #[arg(long)]
    pub export_growth: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse CLI arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Resolve the experiment configuration.
    ///
    /// Order: `--config`, then `~/.ec-dashboard/experiment.json` when it
    /// exists, then [`ExperimentConfig::default`].
    pub fn experiment_config(&self) -> Result<ExperimentConfig> {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        self.experiment_config_in(&home)
    }

    /// [`Settings::experiment_config`] rooted at `home` (used for testing).
    pub fn experiment_config_in(&self, home: &Path) -> Result<ExperimentConfig> {
        if let Some(path) = &self.config {
            tracing::debug!("Loading experiment config from {}", path.display());
            return ExperimentConfig::load_from(path);
        }

        let default_path = default_config_path_in(home);
        if default_path.is_file() {
            tracing::debug!(
                "Loading experiment config from {}",
                default_path.display()
            );
            return ExperimentConfig::load_from(&default_path);
        }

        Ok(ExperimentConfig::default())
    }
}

/// `~/.ec-dashboard/experiment.json` rooted at `home`.
pub fn default_config_path_in(home: &Path) -> PathBuf {
    home.join(".ec-dashboard").join("experiment.json")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
