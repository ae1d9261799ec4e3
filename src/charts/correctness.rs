//! Share of runs ending with the expected balance, one bar per thread count

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{
    CategoryAxis, Chart, DrawResult, CORRECTNESS_RATE, ERROR_RED, REFERENCE_GREEN, SUCCESS_GREEN,
};
use crate::dataset::ResultTable;
use crate::stats::group_by_threads;
use crate::style::PlotStyle;

const BAR_HALF_WIDTH: f64 = 0.35;

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectnessBar {
    pub threads: u32,
    pub success_rate: f64,
    /// Every run at this thread count was correct
    pub all_correct: bool,
}

impl CorrectnessBar {
    pub fn color(&self) -> RGBColor {
        if self.all_correct {
            SUCCESS_GREEN
        } else {
            ERROR_RED
        }
    }

    pub fn annotation(&self) -> String {
        format!("{:.1}%", self.success_rate)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectnessChart {
    pub bars: Vec<CorrectnessBar>,
}

impl CorrectnessChart {
    pub fn from_table(table: &ResultTable) -> Self {
        let bars = group_by_threads(table)
            .into_iter()
            .map(|g| CorrectnessBar {
                threads: g.key,
                success_rate: g.stats.success_rate(),
                all_correct: g.stats.all_correct(),
            })
            .collect();
        Self { bars }
    }
}

impl Chart for CorrectnessChart {
    fn stem(&self) -> &'static str {
        CORRECTNESS_RATE
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &PlotStyle) -> DrawResult<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let family = style.font_family.as_str();
        let axis = CategoryAxis::new(self.bars.iter().map(|b| b.threads.to_string()).collect());
        let x_range = axis.range();

        let mut chart = ChartBuilder::on(root)
            .caption(
                "Correct runs (final balance = expected)",
                (family, style.caption_size),
            )
            .margin(style.margin)
            .x_label_area_size(style.label_size * 3)
            .y_label_area_size(style.label_size * 4)
            .build_cartesian_2d(x_range.clone(), 0f64..105f64)?;

        chart
            .configure_mesh()
            .x_desc("Threads")
            .y_desc("Success rate (%)")
            .x_labels(axis.tick_count())
            .x_label_formatter(&|x| axis.label(*x))
            .disable_x_mesh()
            .label_style((family, style.label_size))
            .axis_desc_style((family, style.label_size))
            .bold_line_style(BLACK.mix(0.15))
            .light_line_style(WHITE)
            .draw()?;

        let corners = |i: usize, bar: &CorrectnessBar| {
            let x = i as f64;
            [
                (x - BAR_HALF_WIDTH, 0.0),
                (x + BAR_HALF_WIDTH, bar.success_rate),
            ]
        };

        chart.draw_series(
            self.bars
                .iter()
                .enumerate()
                .map(|(i, bar)| Rectangle::new(corners(i, bar), bar.color().mix(0.8).filled())),
        )?;
        chart.draw_series(
            self.bars
                .iter()
                .enumerate()
                .map(|(i, bar)| Rectangle::new(corners(i, bar), BLACK.stroke_width(2))),
        )?;

        let annotation_style = (family, style.annotation_size)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(self.bars.iter().enumerate().map(|(i, bar)| {
            Text::new(
                bar.annotation(),
                (i as f64, bar.success_rate + 1.0),
                annotation_style.clone(),
            )
        }))?;

        chart
            .draw_series(LineSeries::new(
                vec![(x_range.start, 100.0), (x_range.end, 100.0)],
                REFERENCE_GREEN.mix(0.7).stroke_width(2),
            ))?
            .label("100% correct")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], REFERENCE_GREEN.mix(0.7)));

        chart
            .configure_series_labels()
            .label_font((family, style.legend_size))
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}
