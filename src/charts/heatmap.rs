//! Mean error percentage over the iterations x threads grid

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{group_thousands, CategoryAxis, Chart, DrawResult, HEATMAP_ERROR};
use crate::dataset::ResultTable;
use crate::stats::ErrorGrid;
use crate::style::PlotStyle;

/// Yellow-orange-red color stops, low to high
const YL_OR_RD: [(u8, u8, u8); 7] = [
    (255, 255, 204),
    (254, 217, 118),
    (254, 178, 76),
    (253, 141, 60),
    (252, 78, 42),
    (227, 26, 28),
    (177, 0, 38),
];

const MISSING_CELL: RGBColor = RGBColor(230, 230, 230);
const GRADIENT_STEPS: usize = 240;

/// Interpolate the color scale at `t` in `[0, 1]`
pub(crate) fn scale_color(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (YL_OR_RD.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(YL_OR_RD.len() - 1);
    let frac = scaled - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = YL_OR_RD[lower];
    let (r1, g1, b1) = YL_OR_RD[upper];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    pub grid: ErrorGrid,
}

impl HeatmapChart {
    pub fn from_table(table: &ResultTable) -> Self {
        Self {
            grid: ErrorGrid::from_table(table),
        }
    }

    /// Dark text on light cells, light text at or above `threshold`
    pub fn text_color(value: f64, threshold: f64) -> RGBColor {
        if value < threshold {
            BLACK
        } else {
            WHITE
        }
    }

    /// Position of `value` on the color scale
    pub fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
        if max > min {
            (value - min) / (max - min)
        } else {
            0.0
        }
    }
}

impl Chart for HeatmapChart {
    fn stem(&self) -> &'static str {
        HEATMAP_ERROR
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &PlotStyle) -> DrawResult<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let family = style.font_family.as_str();
        let grid = &self.grid;
        let n_rows = grid.iterations.len();

        let columns = CategoryAxis::new(grid.threads.iter().map(|t| t.to_string()).collect());
        // First row (fewest iterations) is drawn at the top
        let rows = CategoryAxis::new(
            grid.iterations
                .iter()
                .rev()
                .map(|&i| group_thousands(i))
                .collect(),
        );
        let value_range = grid.value_range().unwrap_or((0.0, 0.0));

        let (width, _) = root.dim_in_pixel();
        let bar_width = (width / 8).max(100);
        let (heat_area, colorbar_area) = root.split_horizontally(width.saturating_sub(bar_width) as i32);

        let mut chart = ChartBuilder::on(&heat_area)
            .caption("Heatmap: mean error percentage", (family, style.caption_size))
            .margin(style.margin)
            .x_label_area_size(style.label_size * 3)
            .y_label_area_size(style.label_size * 5)
            .build_cartesian_2d(columns.range(), rows.range())?;

        chart
            .configure_mesh()
            .x_desc("Threads")
            .y_desc("Iterations per thread")
            .x_labels(columns.tick_count())
            .y_labels(rows.tick_count())
            .x_label_formatter(&|x| columns.label(*x))
            .y_label_formatter(&|y| rows.label(*y))
            .disable_x_mesh()
            .disable_y_mesh()
            .label_style((family, style.label_size))
            .axis_desc_style((family, style.label_size))
            .draw()?;

        let cell_text = |color: &RGBColor| {
            (family, style.annotation_size)
                .into_font()
                .color(color)
                .pos(Pos::new(HPos::Center, VPos::Center))
        };

        for (row, values) in grid.cells.iter().enumerate() {
            let y = (n_rows - 1 - row) as f64;
            for (col, value) in values.iter().enumerate() {
                let x = col as f64;
                let corners = [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)];

                let (fill, label, text_color) = match value {
                    Some(v) => (
                        scale_color(Self::normalize(*v, value_range)),
                        format!("{:.1}%", v),
                        Self::text_color(*v, style.heatmap_text_threshold),
                    ),
                    None => (MISSING_CELL, "n/a".to_string(), BLACK),
                };

                chart.draw_series(std::iter::once(Rectangle::new(corners, fill.filled())))?;
                chart.draw_series(std::iter::once(Text::new(
                    label,
                    (x, y),
                    cell_text(&text_color),
                )))?;
            }
        }

        let (min, max) = value_range;
        let top = if max > min { max } else { min + 1.0 };
        let mut bar_chart = ChartBuilder::on(&colorbar_area)
            .margin_top(60)
            .margin_bottom(60)
            .margin_left(20)
            .margin_right(20)
            .x_label_area_size(0)
            .y_label_area_size(style.label_size * 4)
            .build_cartesian_2d(0f64..1f64, min..top)?;

        bar_chart
            .configure_mesh()
            .x_labels(0)
            .disable_x_mesh()
            .disable_y_mesh()
            .y_desc("Error (%)")
            .label_style((family, style.label_size))
            .axis_desc_style((family, style.label_size))
            .draw()?;

        let step = (top - min) / GRADIENT_STEPS as f64;
        bar_chart.draw_series((0..GRADIENT_STEPS).map(|i| {
            let y0 = min + step * i as f64;
            let y1 = y0 + step;
            let color = scale_color(Self::normalize(y1, (min, top)));
            Rectangle::new([(0.0, y0), (1.0, y1)], color.filled())
        }))?;

        Ok(())
    }
}
