use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ChartConfig, ResolvedOutputs};
use crate::render::{RenderError, SweepReport, render_plots};
use crate::sweep::{ChartKind, SweepGrid};

const MAX_SWEEP_CARDS: u32 = 64;

/// Primary entry point for executing sweep runs.
#[derive(Debug)]
pub struct SweepRunner {
    config: ChartConfig,
    outputs: ResolvedOutputs,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub max_cards: u32,
    pub cells_written: usize,
    pub masked_cells: usize,
    pub cells_path: PathBuf,
    pub summary_path: PathBuf,
    pub plot_paths: Vec<PathBuf>,
}

impl SweepRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: ChartConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.sweep.max_cards > MAX_SWEEP_CARDS {
            return Err(RunnerError::SweepLimit {
                requested: config.sweep.max_cards,
                max: MAX_SWEEP_CARDS,
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        })
    }

    /// Execute the sweep, streaming JSONL cell rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.cells_jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if !self.outputs.plots_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.outputs.plots_dir)?;
        }

        let max_cards = self.config.sweep.max_cards;
        let mut writer = BufWriter::new(File::create(&self.outputs.cells_jsonl)?);
        let mut cells_written = 0usize;
        let mut masked_cells = 0usize;
        let mut grids = Vec::with_capacity(ChartKind::ALL.len());

        for chart in ChartKind::ALL {
            let grid = SweepGrid::compute(chart, max_cards);
            cells_written += self.write_cell_rows(&mut writer, &grid)?;
            masked_cells += grid.masked_cells();

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "stamina_charts::sweep",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    chart = ?grid.chart(),
                    cells = grid.cell_count() as u32,
                    masked = grid.masked_cells() as u32,
                    peak = grid.max_value()
                );
            }

            grids.push(grid);
        }

        writer.flush()?;

        let report = SweepReport::from_grids(&self.config.run_id, max_cards, &grids);
        report.write_markdown(&self.outputs.summary_md)?;

        let plot_paths = match render_plots(&grids, &self.outputs.plots_dir) {
            Ok(paths) => paths,
            Err(err) => {
                eprintln!("WARN: {}", err);
                Vec::new()
            }
        };

        Ok(RunSummary {
            max_cards,
            cells_written,
            masked_cells,
            cells_path: self.outputs.cells_jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            plot_paths,
        })
    }

    /// Per-cell DEBUG events only fire when structured logging is on; the
    /// `cell_details` flag alone has nowhere to write.
    fn cell_details_enabled(&self) -> bool {
        self.logging_enabled && self.config.logging.cell_details
    }

    fn write_cell_rows(
        &self,
        writer: &mut BufWriter<File>,
        grid: &SweepGrid,
    ) -> Result<usize, RunnerError> {
        let cell_details = self.cell_details_enabled();
        let mut rows_written = 0usize;

        for cell in grid.cells() {
            let row = CellRow {
                run_id: self.config.run_id.clone(),
                chart: grid.chart(),
                cell_id: format!("H{:02}_D{:02}", cell.hand, cell.discard),
                hand: cell.hand,
                discard: cell.discard,
                value: cell.value,
                masked: cell.value.is_none(),
            };

            serde_json::to_writer(&mut *writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;

            if cell_details && tracing::enabled!(Level::DEBUG) {
                event!(
                    target: "stamina_charts::cell",
                    Level::DEBUG,
                    run_id = %self.config.run_id,
                    chart = ?grid.chart(),
                    hand = cell.hand,
                    discard = cell.discard,
                    value = cell.value,
                    masked = cell.value.is_none()
                );
            }
        }

        Ok(rows_written)
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct CellRow {
    run_id: String,
    chart: ChartKind,
    cell_id: String,
    hand: u32,
    discard: u32,
    value: Option<u32>,
    masked: bool,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize cell row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("requested sweep of {requested} cards exceeds maximum of {max}")]
    SweepLimit { requested: u32, max: u32 },
    #[error("report generation failed: {0}")]
    Render(#[from] RenderError),
}
