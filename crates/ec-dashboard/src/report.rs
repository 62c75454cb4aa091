//! Terminal and JSON rendering of a loaded dashboard.

use dashboard_core::formatting::{display_width, format_ec, format_statistic, pad, Align};
use dashboard_data::aggregator::{Aggregation, GroupSummary};
use dashboard_data::analysis::DashboardMetadata;
use serde::Serialize;

// ── Text table ─────────────────────────────────────────────────────────────────

const SUMMARY_COLUMNS: [(&str, Align); 10] = [
    ("학교", Align::Left),
    ("목표 EC", Align::Right),
    ("온도", Align::Right),
    ("습도", Align::Right),
    ("pH", Align::Right),
    ("EC", Align::Right),
    ("생중량(g)", Align::Right),
    ("잎 수", Align::Right),
    ("길이(mm)", Align::Right),
    ("개체수", Align::Right),
];

fn summary_cells(s: &GroupSummary) -> Vec<String> {
    vec![
        s.group.clone(),
        format_ec(s.target_ec),
        format_statistic(s.temperature, 1),
        format_statistic(s.humidity, 1),
        format_statistic(s.ph, 2),
        format_statistic(s.ec, 2),
        format_statistic(s.fresh_weight, 2),
        format_statistic(s.leaf_count, 1),
        format_statistic(s.shoot_length, 1),
        s.individuals.to_string(),
    ]
}

/// Lay out `rows` under `columns`, each column as wide as its widest cell.
fn render_grid(columns: &[(&str, Align)], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, (header, _))| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| display_width(cell))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(columns)
            .zip(&widths)
            .map(|((cell, (_, align)), width)| pad(cell, *width, *align))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(columns.iter().map(|(h, _)| *h).collect()));
    out.push("-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// Render the overview, summary table, best group and warnings as text.
pub fn render_table(aggregation: &Aggregation) -> String {
    let overview = &aggregation.overview;
    let mut out = String::new();

    out.push_str("개요\n");
    let facts = [
        ("총 개체수", overview.total_individuals.to_string()),
        ("평균 온도", format_statistic(overview.mean_temperature, 1)),
        ("평균 습도", format_statistic(overview.mean_humidity, 1)),
        ("분석 학교 수", overview.groups_summarized.to_string()),
    ];
    let label_width = facts.iter().map(|(l, _)| display_width(l)).max().unwrap_or(0);
    for (label, value) in &facts {
        out.push_str(&format!("  {}  {}\n", pad(label, label_width, Align::Left), value));
    }
    out.push('\n');

    let rows: Vec<Vec<String>> = aggregation.summaries.iter().map(summary_cells).collect();
    out.push_str(&render_grid(&SUMMARY_COLUMNS, &rows));
    out.push_str("\n\n");

    match &aggregation.best {
        Some(best) => out.push_str(&format!(
            "최고 생중량: {} (EC {}, {:.2} g)\n",
            best.group,
            format_ec(best.target_ec),
            best.mean_fresh_weight
        )),
        None => out.push_str("최고 생중량: -\n"),
    }

    if !aggregation.warnings.is_empty() {
        out.push_str("\n경고\n");
        for warning in &aggregation.warnings {
            out.push_str(&format!("  - {warning}\n"));
        }
    }

    out
}

// ── JSON ───────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a DashboardMetadata,
    #[serde(flatten)]
    aggregation: &'a Aggregation,
}

/// Render metadata and aggregation as one pretty-printed JSON document.
pub fn render_json(
    metadata: &DashboardMetadata,
    aggregation: &Aggregation,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        metadata,
        aggregation,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
