use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`DashboardError`].
///
/// Resolution and parse errors are fatal to a load; callers use the kind to
/// decide how to report the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required source file or directory could not be located.
    Resolution,
    /// A source file exists but its contents are structurally invalid.
    Parse,
    /// The experiment configuration is missing or invalid.
    Config,
    /// Any other I/O or export failure.
    Io,
}

/// All errors produced by the EC dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The data directory does not exist or is not a directory.
    #[error("Data path not found: {}", .0.display())]
    DataPathNotFound(PathBuf),

    /// A group's environment file is absent under every normalization form.
    #[error("Missing environment file for group '{group}': expected {expected} in {}", .dir.display())]
    MissingFile {
        group: String,
        expected: String,
        dir: PathBuf,
    },

    /// No growth workbook could be located in the data directory.
    #[error("No growth spreadsheet (.xlsx) found in {}", .0.display())]
    NoSourceFile(PathBuf),

    /// More than one candidate growth workbook was found.
    #[error("Multiple growth spreadsheets found in {}: {}", .dir.display(), .candidates.join(", "))]
    AmbiguousSource {
        dir: PathBuf,
        candidates: Vec<String>,
    },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A text file is not valid UTF-8.
    #[error("File {} is not valid UTF-8 text", .0.display())]
    Encoding(PathBuf),

    /// A table could not be framed into rows (bad quoting, ragged rows, ...).
    #[error("Malformed data in {source_name}: {detail}")]
    MalformedTable { source_name: String, detail: String },

    /// A required column header is absent.
    #[error("{source_name} is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },

    /// A cell could not be interpreted as the value its column requires.
    #[error("Invalid value '{value}' in {source_name}, row {row}, column '{column}'")]
    InvalidValue {
        source_name: String,
        row: usize,
        column: String,
        value: String,
    },

    /// A spreadsheet could not be opened or one of its sheets could not be read.
    #[error("Failed to read workbook {}: {detail}", .path.display())]
    Workbook { path: PathBuf, detail: String },

    /// Writing an export workbook failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl DashboardError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DataPathNotFound(_)
            | Self::MissingFile { .. }
            | Self::NoSourceFile(_)
            | Self::AmbiguousSource { .. } => ErrorKind::Resolution,
            Self::Encoding(_)
            | Self::MalformedTable { .. }
            | Self::MissingColumn { .. }
            | Self::InvalidValue { .. }
            | Self::Workbook { .. } => ErrorKind::Parse,
            Self::Config(_) | Self::JsonParse(_) => ErrorKind::Config,
            Self::FileRead { .. } | Self::Export(_) => ErrorKind::Io,
        }
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
