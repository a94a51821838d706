use std::ops::Range;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{Canvas, Chart, ChartText, DrawResult};
use crate::error::{PipelineError, PipelineResult};
use crate::series::TimeSeriesPoint;

const LINE_COLOR: RGBColor = RGBColor(34, 139, 34);

/// Points that have a mean, in chronological order.
pub fn drawable_points(points: &[TimeSeriesPoint]) -> Vec<(NaiveDate, f64)> {
    let mut drawable: Vec<(NaiveDate, f64)> = points
        .iter()
        .filter_map(|p| p.mean.map(|mean| (p.date, mean)))
        .collect();
    drawable.sort_by_key(|&(date, _)| date);
    drawable
}

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_label(day: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// x range in days, one day of padding on each side.
fn day_range(points: &[(NaiveDate, f64)]) -> Range<f64> {
    let first = points.first().map_or(0.0, |&(d, _)| day_number(d));
    let last = points.last().map_or(0.0, |&(d, _)| day_number(d));
    (first - 1.0)..(last + 1.0)
}

/// y range padded by 10% of the span, or by 0.5 when the series is flat.
fn value_range(points: &[(NaiveDate, f64)]) -> Range<f64> {
    let min = points.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|&(_, v)| v).fold(f64::NEG_INFINITY, f64::max);
    let pad = if max > min { (max - min) * 0.1 } else { 0.5 };
    (min - pad)..(max + pad)
}

pub fn render_time_series(
    path: &Path,
    canvas: &Canvas,
    points: &[TimeSeriesPoint],
    text: &ChartText,
) -> PipelineResult<()> {
    let drawable = drawable_points(points);
    let skipped = points.len() - drawable.len();
    if skipped > 0 {
        log::warn!("{} dates have no valid pixels and are left out of the plot", skipped);
    }
    if drawable.is_empty() {
        return Err(PipelineError::NoData("time series points".to_string()));
    }

    log::info!("Rendering time series of {} dates to {}", drawable.len(), path.display());
    canvas.render(
        path,
        &TimeSeriesChart {
            points: &drawable,
            text,
        },
    )
}

struct TimeSeriesChart<'a> {
    points: &'a [(NaiveDate, f64)],
    text: &'a ChartText<'a>,
}

impl Chart for TimeSeriesChart<'_> {
    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(self.text.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(day_range(self.points), value_range(self.points))?;

        chart
            .configure_mesh()
            .x_desc(self.text.x_desc)
            .y_desc(self.text.y_desc)
            .x_labels(8)
            .x_label_formatter(&|v| date_label(*v))
            .y_label_formatter(&|v| format!("{:.3}", v))
            .draw()?;

        let series: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|&(d, v)| (day_number(d), v))
            .collect();

        chart.draw_series(LineSeries::new(series.iter().copied(), LINE_COLOR.stroke_width(2)))?;
        chart.draw_series(
            series
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 5, LINE_COLOR.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}
