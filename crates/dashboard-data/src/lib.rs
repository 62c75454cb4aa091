//! Data ingestion layer for the EC dashboard.
//!
//! Resolves per-group files in the data directory, loads the environment CSV
//! logs and the growth workbook, aggregates them into per-group summaries and
//! writes the export workbooks.

pub mod aggregator;
pub mod analysis;
pub mod environment;
pub mod export;
pub mod growth;
pub mod resolver;

pub use dashboard_core as core;

/// Parse a text cell as an optional number; blank text is a missing value.
pub(crate) fn parse_optional_number(text: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<f64>().map(Some)
}
