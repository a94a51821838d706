use std::path::Path;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{Canvas, Chart, ChartText, DrawResult};
use crate::error::PipelineResult;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over the finite values of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    /// `None` when there are no finite values or no bins were asked for.
    pub fn from_values<I>(values: I, bin_count: usize) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if values.is_empty() || bin_count == 0 {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // A constant column still gets a unit-wide range centred on its value.
        let (lower, width) = if max > min {
            (min, (max - min) / bin_count as f64)
        } else {
            (min - 0.5, 1.0 / bin_count as f64)
        };

        let mut counts = vec![0usize; bin_count];
        for v in values {
            let idx = (((v - lower) / width).floor() as usize).min(bin_count - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: lower + i as f64 * width,
                upper: lower + (i + 1) as f64 * width,
                count,
            })
            .collect();

        Some(Self { bins })
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

struct HistogramChart<'a> {
    histogram: &'a Histogram,
    text: &'a ChartText<'a>,
}

pub fn render_histogram(
    path: &Path,
    canvas: &Canvas,
    histogram: &Histogram,
    text: &ChartText,
) -> PipelineResult<()> {
    log::info!(
        "Rendering histogram of {} values to {}",
        histogram.total(),
        path.display()
    );
    canvas.render(path, &HistogramChart { histogram, text })
}

impl Chart for HistogramChart<'_> {
    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let bins = self.histogram.bins();
        let x_min = bins.first().map_or(0.0, |b| b.lower);
        let x_max = bins.last().map_or(1.0, |b| b.upper);
        let y_max = (self.histogram.max_count() as f64 * 1.1).max(1.0);

        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(self.text.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(self.text.x_desc)
            .y_desc(self.text.y_desc)
            .x_label_formatter(&|v| format!("{:.2}", v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()?;

        chart.draw_series(bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.lower, 0.0), (bin.upper, bin.count as f64)],
                RGBColor(30, 144, 255).mix(0.8).filled(),
            )
        }))?;

        root.present()?;
        Ok(())
    }
}
