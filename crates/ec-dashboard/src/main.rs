mod bootstrap;
mod report;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::export::{growth_workbook, summary_workbook, write_workbook};
use dashboard_data::growth::GrowthSource;
use dashboard_runtime::data_manager::DataManager;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("EC Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data dir: {}, format: {}",
        settings.data_dir.display(),
        settings.format
    );

    let config = settings
        .experiment_config()
        .context("failed to load experiment configuration")?;
    let growth_source = GrowthSource::from_option(settings.growth_file.as_deref());

    let mut manager = DataManager::new(config, growth_source);
    let data = manager
        .get_data(&settings.data_dir, false)
        .with_context(|| format!("failed to load data from {}", settings.data_dir.display()))?;

    match settings.format.as_str() {
        "json" => println!("{}", report::render_json(data.metadata(), data.aggregation())?),
        _ => print!("{}", report::render_table(data.aggregation())),
    }

    if let Some(path) = &settings.export_summary {
        let bytes = summary_workbook(&data.aggregation().summaries)?;
        write_workbook(path, &bytes)?;
    }

    if let Some(path) = &settings.export_growth {
        let bytes = growth_workbook(data.growth())?;
        write_workbook(path, &bytes)?;
    }

    Ok(())
}
