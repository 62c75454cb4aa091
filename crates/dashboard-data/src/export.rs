//! Excel export of the summary table and of the pooled growth data.

use std::path::Path;

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::growth_columns;
use dashboard_core::statistic::Statistic;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::aggregator::GroupSummary;
use crate::growth::GrowthData;

/// Sheet name of the summary workbook.
pub const SUMMARY_SHEET: &str = "요약";
/// Sheet name of the pooled growth workbook.
pub const GROWTH_SHEET: &str = "생육 전체";

/// Column headers of the summary sheet, in column order.
pub const SUMMARY_HEADERS: [&str; 11] = [
    "학교",
    "목표 EC",
    "평균 온도",
    "평균 습도",
    "평균 pH",
    "평균 EC",
    "환경 측정 수",
    "평균 생중량(g)",
    "평균 잎 수(장)",
    "평균 지상부 길이(mm)",
    "개체수",
];

/// Leading column of the pooled growth sheet.
pub const GROUP_HEADER: &str = "학교";

fn export_error(e: XlsxError) -> DashboardError {
    DashboardError::Export(e.to_string())
}

/// Header row in bold, with the first column widened for group names.
fn write_header(ws: &mut Worksheet, headers: &[&str]) -> std::result::Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    ws.set_column_width(0, 12)?;
    Ok(())
}

/// `NoData` is left as a blank cell.
fn write_statistic(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    stat: Statistic,
) -> std::result::Result<(), XlsxError> {
    if let Statistic::Value(v) = stat {
        ws.write_number(row, col, v)?;
    }
    Ok(())
}

/// Render the per-group summary table as xlsx bytes.
pub fn summary_workbook(summaries: &[GroupSummary]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(SUMMARY_SHEET).map_err(export_error)?;
    write_header(ws, &SUMMARY_HEADERS).map_err(export_error)?;

    for (i, s) in summaries.iter().enumerate() {
        let row = (i + 1) as u32;
        let write_row = |ws: &mut Worksheet| -> std::result::Result<(), XlsxError> {
            ws.write_string(row, 0, s.group.as_str())?;
            ws.write_number(row, 1, s.target_ec)?;
            write_statistic(ws, row, 2, s.temperature)?;
            write_statistic(ws, row, 3, s.humidity)?;
            write_statistic(ws, row, 4, s.ph)?;
            write_statistic(ws, row, 5, s.ec)?;
            ws.write_number(row, 6, s.environment_rows as f64)?;
            write_statistic(ws, row, 7, s.fresh_weight)?;
            write_statistic(ws, row, 8, s.leaf_count)?;
            write_statistic(ws, row, 9, s.shoot_length)?;
            ws.write_number(row, 10, s.individuals as f64)?;
            Ok(())
        };
        write_row(ws).map_err(export_error)?;
    }

    workbook.save_to_buffer().map_err(export_error)
}

/// Render every growth table as one sheet with a leading group column.
pub fn growth_workbook(growth: &GrowthData) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.set_name(GROWTH_SHEET).map_err(export_error)?;
    write_header(
        ws,
        &[
            GROUP_HEADER,
            growth_columns::FRESH_WEIGHT,
            growth_columns::LEAF_COUNT,
            growth_columns::SHOOT_LENGTH,
        ],
    )
    .map_err(export_error)?;

    let mut row = 1u32;
    for (group, table) in growth {
        for record in &table.records {
            let write_row = |ws: &mut Worksheet| -> std::result::Result<(), XlsxError> {
                ws.write_string(row, 0, group.as_str())?;
                for (col, value) in [
                    record.fresh_weight,
                    record.leaf_count,
                    record.shoot_length,
                ]
                .into_iter()
                .enumerate()
                {
                    if let Some(v) = value {
                        ws.write_number(row, col as u16 + 1, v)?;
                    }
                }
                Ok(())
            };
            write_row(ws).map_err(export_error)?;
            row += 1;
        }
    }

    workbook.save_to_buffer().map_err(export_error)
}

/// Write export bytes to `path`, replacing any existing file.
pub fn write_workbook(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .map_err(|e| DashboardError::Export(format!("failed to write {}: {e}", path.display())))?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
