//! Per-group environment log loading.
//!
//! Each configured group has one CSV sensor log named
//! `<group>_환경데이터.csv` in the data directory.

use std::path::Path;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::experiment::ExperimentConfig;
use dashboard_core::models::{
    environment_columns as cols, environment_file_name, EnvironmentRecord, EnvironmentTable,
};
use dashboard_core::timestamp::TimestampParser;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::parse_optional_number;
use crate::resolver::{file_label, resolve_file};

/// Environment tables keyed by group name, in configuration order.
pub type EnvironmentData = IndexMap<String, EnvironmentTable>;

/// Load the environment log of every configured group.
///
/// Fails on the first group whose file cannot be resolved or parsed; no
/// partial mapping is ever returned.
pub fn load_environment_data(dir: &Path, config: &ExperimentConfig) -> Result<EnvironmentData> {
    let mut data = EnvironmentData::with_capacity(config.len());

    for group in config.groups() {
        let expected = environment_file_name(&group.name);
        let path = resolve_file(dir, &expected).ok_or_else(|| DashboardError::MissingFile {
            group: group.name.clone(),
            expected: expected.clone(),
            dir: dir.to_path_buf(),
        })?;

        let table = read_environment_file(&path)?;
        debug!("Group {}: {} environment rows", group.name, table.len());
        data.insert(group.name.clone(), table);
    }

    info!(
        "Loaded environment logs for {} groups from {}",
        data.len(),
        dir.display()
    );
    Ok(data)
}

/// Parse one environment CSV file.
///
/// The file must be UTF-8 (a leading BOM is accepted) with a header row
/// containing `time`, `temperature`, `humidity`, `ph` and `ec`. Empty readings
/// are kept as `None`.
pub fn read_environment_file(path: &Path) -> Result<EnvironmentTable> {
    let bytes = std::fs::read(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| DashboardError::Encoding(path.to_path_buf()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let source_name = file_label(path);
    let malformed = |e: csv::Error| DashboardError::MalformedTable {
        source_name: source_name.clone(),
        detail: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_reader(text.as_bytes());

    let headers = rdr.headers().map_err(malformed)?.clone();
    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DashboardError::MissingColumn {
                source_name: source_name.clone(),
                column: name.to_string(),
            })
    };

    let i_time = col(cols::TIME)?;
    let i_temperature = col(cols::TEMPERATURE)?;
    let i_humidity = col(cols::HUMIDITY)?;
    let i_ph = col(cols::PH)?;
    let i_ec = col(cols::EC)?;

    let mut records = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(malformed)?;
        let row = idx + 1;

        let invalid = |column: &str, value: &str| DashboardError::InvalidValue {
            source_name: source_name.clone(),
            row,
            column: column.to_string(),
            value: value.to_string(),
        };
        let reading = |i: usize, column: &str| -> Result<Option<f64>> {
            let raw = record.get(i).unwrap_or("");
            parse_optional_number(raw).map_err(|_| invalid(column, raw))
        };

        let raw_time = record.get(i_time).unwrap_or("");
        let timestamp = TimestampParser::parse(raw_time).ok_or_else(|| invalid(cols::TIME, raw_time))?;

        records.push(EnvironmentRecord {
            timestamp,
            temperature: reading(i_temperature, cols::TEMPERATURE)?,
            humidity: reading(i_humidity, cols::HUMIDITY)?,
            ph: reading(i_ph, cols::PH)?,
            ec: reading(i_ec, cols::EC)?,
        });
    }

    Ok(EnvironmentTable {
        source: path.to_path_buf(),
        records,
    })
}
