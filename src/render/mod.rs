pub mod colormap;
pub mod heatmap;
pub mod histogram;
pub mod timeseries;

pub use heatmap::{HeatMapLayer, render_heat_map};
pub use histogram::{Histogram, render_histogram};
pub use timeseries::render_time_series;

use std::path::Path;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::{Config, ImageFormat};
use crate::error::{PipelineError, PipelineResult};

pub type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// A figure that can be drawn on any plotters backend.
pub trait Chart {
    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Output format and pixel size shared by every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub format: ImageFormat,
    pub size: (u32, u32),
}

impl Canvas {
    pub fn from_config(config: &Config) -> Self {
        Self {
            format: config.image_format(),
            size: config.image_size(),
        }
    }

    /// Draw `chart` into a new image file at `path`.
    pub fn render<C: Chart>(&self, path: &Path, chart: &C) -> PipelineResult<()> {
        let result = match self.format {
            ImageFormat::Png => chart.draw(BitMapBackend::new(path, self.size).into_drawing_area()),
            ImageFormat::Svg => chart.draw(SVGBackend::new(path, self.size).into_drawing_area()),
        };
        result.map_err(plot_error)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartText<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

fn plot_error(err: Box<dyn std::error::Error>) -> PipelineError {
    PipelineError::Plot(err.to_string())
}
