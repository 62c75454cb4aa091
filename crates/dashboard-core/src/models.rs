use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Suffix appended to a group name to form its environment log filename.
pub const ENVIRONMENT_FILE_SUFFIX: &str = "_환경데이터.csv";

/// Extension of the growth workbook.
pub const GROWTH_FILE_EXTENSION: &str = "xlsx";

/// Required column headers of an environment log, matched exactly.
pub mod environment_columns {
    pub const TIME: &str = "time";
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
    pub const PH: &str = "ph";
    pub const EC: &str = "ec";
}

/// Required column headers of a growth sheet, matched exactly.
pub mod growth_columns {
    pub const FRESH_WEIGHT: &str = "생중량(g)";
    pub const LEAF_COUNT: &str = "잎 수(장)";
    pub const SHOOT_LENGTH: &str = "지상부 길이(mm)";
}

/// Expected environment log filename for `group`.
pub fn environment_file_name(group: &str) -> String {
    format!("{group}{ENVIRONMENT_FILE_SUFFIX}")
}

/// Which of the two data sources a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Environment,
    Growth,
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataKind::Environment => f.write_str("environment"),
            DataKind::Growth => f.write_str("growth"),
        }
    }
}

/// One sensor reading from a group's environment log.
///
/// A `None` reading is an empty cell in the source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentRecord {
    pub timestamp: NaiveDateTime,
    /// Air temperature in °C.
    pub temperature: Option<f64>,
    /// Relative humidity in %.
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    /// Measured electrical conductivity.
    pub ec: Option<f64>,
}

/// A group's full environment time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentTable {
    /// File the records were read from.
    pub source: PathBuf,
    pub records: Vec<EnvironmentRecord>,
}

impl EnvironmentTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Measurements of one plant individual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthRecord {
    /// Fresh weight in grams.
    pub fresh_weight: Option<f64>,
    pub leaf_count: Option<f64>,
    /// Shoot length in millimetres.
    pub shoot_length: Option<f64>,
}

/// All individuals of one group, as read from one workbook sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthTable {
    /// Sheet name exactly as stored in the workbook.
    pub sheet: String,
    pub records: Vec<GrowthRecord>,
}

impl GrowthTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
