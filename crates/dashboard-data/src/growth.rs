//! Growth workbook loading.
//!
//! The growth results live in a single `.xlsx` workbook with one sheet per
//! group; each row is one plant individual.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::{growth_columns as cols, GrowthRecord, GrowthTable, GROWTH_FILE_EXTENSION};
use dashboard_core::normalize::normalize_name;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::parse_optional_number;
use crate::resolver::{file_label, list_files_with_extension, resolve_file};

/// Growth tables keyed by NFC-normalized sheet name, in workbook order.
pub type GrowthData = IndexMap<String, GrowthTable>;

/// How the growth workbook is located inside the data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GrowthSource {
    /// Require exactly one `.xlsx` file in the directory.
    #[default]
    Discover,
    /// Use the named file (matched with normalization tolerance).
    Named(String),
}

impl GrowthSource {
    /// `Named` when a filename is given, `Discover` otherwise.
    pub fn from_option(name: Option<&str>) -> Self {
        match name {
            Some(name) => GrowthSource::Named(name.to_string()),
            None => GrowthSource::Discover,
        }
    }

    /// Locate the workbook in `dir`.
    pub fn locate(&self, dir: &Path) -> Result<PathBuf> {
        match self {
            GrowthSource::Named(name) => {
                resolve_file(dir, name).ok_or_else(|| DashboardError::NoSourceFile(dir.to_path_buf()))
            }
            GrowthSource::Discover => {
                let mut candidates: Vec<PathBuf> = list_files_with_extension(dir, GROWTH_FILE_EXTENSION)
                    .into_iter()
                    .filter(|path| !is_lock_file(path))
                    .collect();

                match candidates.len() {
                    0 => Err(DashboardError::NoSourceFile(dir.to_path_buf())),
                    1 => Ok(candidates.remove(0)),
                    _ => Err(DashboardError::AmbiguousSource {
                        dir: dir.to_path_buf(),
                        candidates: candidates.iter().map(|p| file_label(p)).collect(),
                    }),
                }
            }
        }
    }
}

/// Office writes `~$name.xlsx` owner files next to open workbooks.
fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with("~$"))
        .unwrap_or(false)
}

/// Locate and parse the growth workbook in `dir`.
pub fn load_growth_data(dir: &Path, source: &GrowthSource) -> Result<GrowthData> {
    let path = source.locate(dir)?;
    let data = read_growth_workbook(&path)?;
    info!(
        "Loaded {} growth sheets from {}",
        data.len(),
        path.display()
    );
    Ok(data)
}

/// Parse every sheet of the workbook at `path`.
pub fn read_growth_workbook(path: &Path) -> Result<GrowthData> {
    let workbook_error = |detail: String| DashboardError::Workbook {
        path: path.to_path_buf(),
        detail,
    };

    let mut workbook =
        open_workbook::<Xlsx<_>, _>(path).map_err(|e| workbook_error(e.to_string()))?;
    let label = file_label(path);
    let mut data = GrowthData::new();

    for sheet in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| workbook_error(format!("sheet '{sheet}': {e}")))?;

        let key = normalize_name(&sheet);
        if let Some(existing) = data.get(&key) {
            return Err(DashboardError::MalformedTable {
                source_name: label,
                detail: format!(
                    "sheets '{}' and '{sheet}' both name group '{key}'",
                    existing.sheet
                ),
            });
        }

        let source_name = format!("{label}, sheet '{sheet}'");
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let rows: Vec<&[Data]> = range.rows().collect();
        let records = parse_sheet(&source_name, first_row, &rows)?;
        debug!("Sheet {}: {} individuals", sheet, records.len());

        data.insert(
            key,
            GrowthTable {
                sheet: sheet.clone(),
                records,
            },
        );
    }

    Ok(data)
}

/// Parse the header row and data rows of one sheet.
///
/// `rows` is the used range, which starts at sheet row `first_row`
/// (0-based); reported row numbers are sheet rows, so the first data row
/// under a header on the top line is row 1.
fn parse_sheet(source_name: &str, first_row: usize, rows: &[&[Data]]) -> Result<Vec<GrowthRecord>> {
    let headers: Vec<String> = rows
        .first()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DashboardError::MissingColumn {
                source_name: source_name.to_string(),
                column: name.to_string(),
            })
    };

    let i_fresh_weight = col(cols::FRESH_WEIGHT)?;
    let i_leaf_count = col(cols::LEAF_COUNT)?;
    let i_shoot_length = col(cols::SHOOT_LENGTH)?;

    let mut records = Vec::new();

    for (idx, row) in rows.iter().enumerate().skip(1) {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let value = |i: usize, column: &str| -> Result<Option<f64>> {
            cell_number(row.get(i).unwrap_or(&Data::Empty)).ok_or_else(|| {
                DashboardError::InvalidValue {
                    source_name: source_name.to_string(),
                    row: first_row + idx,
                    column: column.to_string(),
                    value: row.get(i).map(|c| c.to_string()).unwrap_or_default(),
                }
            })
        };

        records.push(GrowthRecord {
            fresh_weight: value(i_fresh_weight, cols::FRESH_WEIGHT)?,
            leaf_count: value(i_leaf_count, cols::LEAF_COUNT)?,
            shoot_length: value(i_shoot_length, cols::SHOOT_LENGTH)?,
        });
    }

    Ok(records)
}

/// Interpret a cell as an optional number; `None` means the cell is invalid.
fn cell_number(cell: &Data) -> Option<Option<f64>> {
    match cell {
        Data::Empty => Some(None),
        Data::Float(f) => Some(Some(*f)),
        Data::Int(i) => Some(Some(*i as f64)),
        Data::String(s) => parse_optional_number(s).ok(),
        _ => None,
    }
}
