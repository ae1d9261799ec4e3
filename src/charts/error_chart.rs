//! Error against thread count: absolute and relative panels side by side

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{
    padded_range, Chart, DrawResult, Log2Axis, ERROR_BLUE, ERROR_RED, ERROR_VS_THREADS,
    REFERENCE_GREEN,
};
use crate::dataset::ResultTable;
use crate::stats::group_by_threads;
use crate::style::PlotStyle;

/// Mean and spread of the error at one thread count
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPoint {
    pub threads: u32,
    pub error_mean: f64,
    pub error_std: f64,
    pub percent_mean: f64,
    pub percent_std: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorVsThreadsChart {
    pub points: Vec<ErrorPoint>,
}

impl ErrorVsThreadsChart {
    pub fn from_table(table: &ResultTable) -> Self {
        let points = group_by_threads(table)
            .into_iter()
            .map(|group| ErrorPoint {
                threads: group.key,
                error_mean: group.stats.error.mean,
                error_std: group.stats.error.spread(),
                percent_mean: group.stats.error_percent.mean,
                percent_std: group.stats.error_percent.spread(),
            })
            .collect();
        Self { points }
    }
}

/// One panel: `(threads, mean, std)` triples plus labels
struct Panel<'a> {
    caption: &'a str,
    y_desc: &'a str,
    legend: &'a str,
    color: RGBColor,
    values: Vec<(u32, f64, f64)>,
    zero_line: bool,
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel<'_>,
    axis: Log2Axis,
    style: &PlotStyle,
) -> DrawResult<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let family = style.font_family.as_str();
    let x_range = axis.range();

    let zero = panel.zero_line.then_some((0.0, 0.0));
    let y_range = padded_range(
        panel
            .values
            .iter()
            .map(|&(_, mean, std)| (mean - std, mean + std))
            .chain(zero),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(panel.caption, (family, style.caption_size))
        .margin(style.margin)
        .x_label_area_size(style.label_size * 3)
        .y_label_area_size(style.label_size * 4)
        .build_cartesian_2d(x_range.clone(), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Threads")
        .y_desc(panel.y_desc)
        .x_labels(16)
        .x_label_formatter(&|x| Log2Axis::label(*x))
        .label_style((family, style.label_size))
        .axis_desc_style((family, style.label_size))
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(WHITE)
        .draw()?;

    let color = panel.color;
    let points: Vec<(f64, f64)> = panel
        .values
        .iter()
        .map(|&(threads, mean, _)| (Log2Axis::position(threads), mean))
        .collect();

    chart
        .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
        .label(panel.legend)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

    chart.draw_series(panel.values.iter().map(|&(threads, mean, std)| {
        ErrorBar::new_vertical(
            Log2Axis::position(threads),
            mean - std,
            mean,
            mean + std,
            color.stroke_width(2),
            10,
        )
    }))?;

    chart.draw_series(points.iter().map(|&p| Circle::new(p, 5, color.filled())))?;

    if panel.zero_line {
        chart
            .draw_series(LineSeries::new(
                vec![(x_range.start, 0.0), (x_range.end, 0.0)],
                REFERENCE_GREEN.mix(0.5).stroke_width(2),
            ))?
            .label("Correct behavior")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], REFERENCE_GREEN.mix(0.5)));
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

impl Chart for ErrorVsThreadsChart {
    fn stem(&self) -> &'static str {
        ERROR_VS_THREADS
    }

    fn size(&self, style: &PlotStyle) -> (u32, u32) {
        style.wide_figure_size
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &PlotStyle) -> DrawResult<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let axis = Log2Axis::new(self.points.iter().map(|p| p.threads));
        let panels = root.split_evenly((1, 2));

        let absolute = Panel {
            caption: "Impact of parallelism on race conditions",
            y_desc: "Absolute error (balance lost)",
            legend: "Mean error",
            color: ERROR_RED,
            values: self
                .points
                .iter()
                .map(|p| (p.threads, p.error_mean, p.error_std))
                .collect(),
            zero_line: false,
        };
        let relative = Panel {
            caption: "Share of balance lost",
            y_desc: "Relative error (%)",
            legend: "Mean error (%)",
            color: ERROR_BLUE,
            values: self
                .points
                .iter()
                .map(|p| (p.threads, p.percent_mean, p.percent_std))
                .collect(),
            zero_line: true,
        };

        draw_panel(&panels[0], &absolute, axis, style)?;
        draw_panel(&panels[1], &relative, axis, style)?;
        Ok(())
    }
}
