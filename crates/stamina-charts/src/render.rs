use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use thiserror::Error;

use crate::sweep::{ChartKind, SweepCell, SweepGrid};

const PLOT_WIDTH: u32 = 860;
const PLOT_HEIGHT: u32 = 640;
const COLORBAR_SPLIT: u32 = 640;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Plot(String),
}

/// Per-chart figures collected for the summary table.
#[derive(Debug, Clone)]
pub struct ChartReport {
    pub chart: ChartKind,
    pub cells: usize,
    pub masked: usize,
    pub peak: Option<u32>,
}

/// Aggregated sweep results ready for reporting.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub run_id: String,
    pub max_cards: u32,
    pub charts: Vec<ChartReport>,
}

impl SweepReport {
    pub fn from_grids(run_id: &str, max_cards: u32, grids: &[SweepGrid]) -> Self {
        let charts = grids
            .iter()
            .map(|grid| ChartReport {
                chart: grid.chart(),
                cells: grid.cell_count(),
                masked: grid.masked_cells(),
                peak: grid.max_value(),
            })
            .collect();

        Self {
            run_id: run_id.to_string(),
            max_cards,
            charts,
        }
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let mut rows = String::new();
        rows.push_str("# Turn Economy Sweep\n\n");
        rows.push_str(&format!(
            "Run `{}` swept hand and discard counts up to {} cards each.\n\n",
            self.run_id, self.max_cards
        ));
        rows.push_str("| Chart | Title | Cells | Masked | Peak |\n");
        rows.push_str("|-------|-------|-------|--------|------|\n");

        for report in &self.charts {
            let peak = report
                .peak
                .map(|value| value.to_string())
                .unwrap_or_else(|| "-".to_string());
            rows.push_str(&format!(
                "| {chart:?} | {title} | {cells} | {masked} | {peak} |\n",
                chart = report.chart,
                title = report.chart.title(),
                cells = report.cells,
                masked = report.masked,
            ));
        }

        fs::write(path.as_ref(), rows).map_err(|e| RenderError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

/// Render one PNG heatmap per grid, returning the paths written.
pub fn render_plots(
    grids: &[SweepGrid],
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, RenderError> {
    let dir = dir.as_ref();
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(|e| RenderError::Io {
            context: "creating plots directory",
            source: e,
        })?;
    }

    let mut paths = Vec::with_capacity(grids.len());
    for grid in grids {
        let output_path = dir.join(format!("{}.png", grid.chart().file_stem()));
        render_heatmap(grid, output_path.clone())?;
        paths.push(output_path);
    }
    Ok(paths)
}

/// Draw a single heatmap with a colorbar strip on the right edge.
///
/// Masked cells are left unfilled so they show as background white.
fn render_heatmap(grid: &SweepGrid, output_path: PathBuf) -> Result<(), RenderError> {
    let side = grid.side();
    let vmax = grid.max_value().unwrap_or(0).max(1);
    let title = grid.chart().title();
    let value_label = grid.chart().value_label();
    let cells: Vec<SweepCell> = grid.cells().collect();

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));

    let plot_attempt = std::panic::catch_unwind(move || {
        let root = BitMapBackend::new(&output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::Plot(e.to_string()))?;

        let (heat_area, bar_area) = root.split_horizontally(COLORBAR_SPLIT);

        let mut chart = ChartBuilder::on(&heat_area)
            .margin(20)
            .caption(title, ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .build_cartesian_2d(0u32..side, 0u32..side)
            .map_err(|e| RenderError::Plot(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("cards in hand")
            .y_desc("cards in discard")
            .draw()
            .map_err(|e| RenderError::Plot(e.to_string()))?;

        chart
            .draw_series(cells.iter().filter_map(|cell| {
                let value = cell.value?;
                let color = ViridisRGB.get_color_normalized(value as f64, 0.0, vmax as f64);
                Some(Rectangle::new(
                    [
                        (cell.hand, cell.discard),
                        (cell.hand + 1, cell.discard + 1),
                    ],
                    color.filled(),
                ))
            }))
            .map_err(|e| RenderError::Plot(e.to_string()))?;

        drop(chart);

        let mut bar = ChartBuilder::on(&bar_area)
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .build_cartesian_2d(0u32..1u32, 0u32..(vmax + 1))
            .map_err(|e| RenderError::Plot(e.to_string()))?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc(value_label)
            .draw()
            .map_err(|e| RenderError::Plot(e.to_string()))?;

        bar.draw_series((0..=vmax).map(|value| {
            let color = ViridisRGB.get_color_normalized(value as f64, 0.0, vmax as f64);
            Rectangle::new([(0u32, value), (1u32, value + 1)], color.filled())
        }))
        .map_err(|e| RenderError::Plot(e.to_string()))?;

        drop(bar);

        root.present()
            .map_err(|e| RenderError::Plot(e.to_string()))?;

        drop(root);

        Ok(())
    });

    std::panic::set_hook(prev_hook);

    match plot_attempt {
        Ok(result) => result,
        Err(_) => Err(RenderError::Plot(
            "plotters panicked while rendering (missing font support?)".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids() -> Vec<SweepGrid> {
        ChartKind::ALL
            .iter()
            .map(|chart| SweepGrid::compute(*chart, 4))
            .collect()
    }

    #[test]
    fn report_collects_per_chart_figures() {
        let report = SweepReport::from_grids("report_test", 4, &grids());
        assert_eq!(report.charts.len(), 3);

        let turns = &report.charts[0];
        assert_eq!(turns.chart, ChartKind::MaxTurns);
        assert_eq!(turns.cells, 25);
        assert_eq!(turns.masked, 10);
        assert_eq!(turns.peak, Some(4));
    }

    #[test]
    fn markdown_lists_every_chart() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("summary.md");
        let report = SweepReport::from_grids("report_test", 4, &grids());
        report.write_markdown(&path).expect("write summary");

        let text = std::fs::read_to_string(&path).expect("summary readable");
        assert!(text.contains("# Turn Economy Sweep"));
        assert!(text.contains("| MaxTurns | Optimizing turns | 25 | 10 | 4 |"));
        assert!(text.contains("| DamagePreferHand | Preventing damage |"));
        assert!(text.contains("| DamageFromDiscard | Preventing damage from discard |"));
    }
}
