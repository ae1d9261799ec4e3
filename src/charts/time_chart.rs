//! Mean execution time against thread count, one series per iteration count

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{
    group_thousands, padded_range, Chart, DrawResult, Log2Axis, SERIES_COLORS, TIME_VS_THREADS,
};
use crate::dataset::ResultTable;
use crate::stats::group_by_threads;
use crate::style::PlotStyle;

/// Timing of one iteration count: `(threads, mean_ms, std_ms)` ascending by threads
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub iterations: u64,
    pub points: Vec<(u32, f64, f64)>,
}

impl TimeSeries {
    pub fn label(&self) -> String {
        format!("{} iterations", group_thousands(self.iterations))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeVsThreadsChart {
    pub series: Vec<TimeSeries>,
}

impl TimeVsThreadsChart {
    pub fn from_table(table: &ResultTable) -> Self {
        let series = table
            .iteration_counts()
            .into_iter()
            .map(|iterations| {
                let subset = table.filter(|r| r.iterations() == iterations);
                let points = group_by_threads(&subset)
                    .into_iter()
                    .map(|g| {
                        (
                            g.key,
                            g.stats.time_sec.mean * 1000.0,
                            g.stats.time_sec.spread() * 1000.0,
                        )
                    })
                    .collect();
                TimeSeries { iterations, points }
            })
            .collect();
        Self { series }
    }
}

impl Chart for TimeVsThreadsChart {
    fn stem(&self) -> &'static str {
        TIME_VS_THREADS
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &PlotStyle) -> DrawResult<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let family = style.font_family.as_str();
        let all_points = || self.series.iter().flat_map(|s| s.points.iter());
        let axis = Log2Axis::new(all_points().map(|&(threads, _, _)| threads));
        let y_range = padded_range(all_points().map(|&(_, mean, std)| (mean - std, mean + std)));

        let mut chart = ChartBuilder::on(root)
            .caption("Performance: mean execution time", (family, style.caption_size))
            .margin(style.margin)
            .x_label_area_size(style.label_size * 3)
            .y_label_area_size(style.label_size * 4)
            .build_cartesian_2d(axis.range(), y_range)?;

        chart
            .configure_mesh()
            .x_desc("Threads")
            .y_desc("Execution time (ms)")
            .x_labels(16)
            .x_label_formatter(&|x| Log2Axis::label(*x))
            .label_style((family, style.label_size))
            .axis_desc_style((family, style.label_size))
            .bold_line_style(BLACK.mix(0.15))
            .light_line_style(WHITE)
            .draw()?;

        for (idx, series) in self.series.iter().enumerate() {
            let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|&(threads, mean, _)| (Log2Axis::position(threads), mean))
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(series.label())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });

            chart.draw_series(series.points.iter().map(|&(threads, mean, std)| {
                ErrorBar::new_vertical(
                    Log2Axis::position(threads),
                    mean - std,
                    mean,
                    mean + std,
                    color.stroke_width(1),
                    8,
                )
            }))?;

            chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
        }

        chart
            .configure_series_labels()
            .label_font((family, style.legend_size))
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}
