use std::path::PathBuf;

use clap::Parser;

use stamina_charts::config::{ChartConfig, ResolvedOutputs};
use stamina_charts::logging::init_logging;
use stamina_charts::runner::SweepRunner;

/// Turn-economy sweep harness producing heatmaps.
#[derive(Debug, Parser)]
#[command(
    name = "stamina-charts",
    author,
    version,
    about = "Deterministic turn-economy sweep and heatmap generator"
)]
struct Cli {
    /// Path to the sweep configuration YAML.
    #[arg(short, long, value_name = "FILE", default_value = "charts/sweep.yaml")]
    config: PathBuf,

    /// Override the run identifier used in {run_id} output templates.
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the bound on hand plus discard cards per cell.
    #[arg(long, value_name = "CARDS")]
    max_cards: Option<u32>,

    /// Exit after validating the configuration (no sweep is run).
    #[arg(long)]
    validate_only: bool,

    /// Emit per-cell DEBUG events to the telemetry log (requires structured logging).
    #[arg(long)]
    log_cell_details: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ChartConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(max_cards) = cli.max_cards {
        config.sweep.max_cards = max_cards;
    }

    if cli.log_cell_details {
        config.logging.cell_details = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let max_cards = config.sweep.max_cards;

    println!(
        "Loaded configuration '{run_id}' sweeping hand and discard counts up to {max_cards} cards"
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SweepRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: sweep execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Sweep complete for '{run_id}': {} cells ({} masked) at {}",
        summary.cells_written,
        summary.masked_cells,
        summary.cells_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for plot_path in &summary.plot_paths {
        println!("Heatmap: {}", plot_path.display());
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
