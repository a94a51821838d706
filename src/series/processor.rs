use std::fmt;
use std::path::PathBuf;

use super::aggregate::{TimeSeriesPoint, aggregate_by_date};
use super::ingest::RasterSeriesIngestor;
use crate::config::{Config, SeriesConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::render::{Canvas, ChartText, render_time_series};
use crate::utils::ValueSummary;

#[derive(Debug)]
pub struct SeriesReport {
    pub pixels: usize,
    pub summary: ValueSummary,
    pub points: Vec<TimeSeriesPoint>,
    pub output: PathBuf,
}

impl fmt::Display for SeriesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Series: {} pixels over {} dates", self.pixels, self.points.len())?;
        writeln!(f, "  {}", self.summary)?;
        for point in &self.points {
            writeln!(f, "  {}", point)?;
        }
        writeln!(f, "  Wrote {}", self.output.display())
    }
}

/// Series pipeline: ingest and join, aggregate by date, draw.
#[derive(Debug)]
pub struct SeriesPipeline<'a> {
    config: &'a Config,
    series: &'a SeriesConfig,
}

impl<'a> SeriesPipeline<'a> {
    pub fn new(config: &'a Config, series: &'a SeriesConfig) -> Self {
        Self { config, series }
    }

    pub fn process(&self) -> PipelineResult<SeriesReport> {
        log::info!(
            "Ingesting rasters from {}",
            self.series.raster_directory.display()
        );
        let table = RasterSeriesIngestor::new(self.series).ingest()?;
        if table.is_empty() {
            return Err(PipelineError::NoData("series pixels".to_string()));
        }
        let summary = table.summary();
        log::info!("Combined table: {} pixels", table.len());
        log::info!("{}", summary);
        for (date, rows) in table.group_sizes() {
            log::debug!("{}: {} rows", date, rows);
        }

        let points = aggregate_by_date(&table);
        for point in &points {
            log::info!("{}", point);
        }

        let output = self.config.output_path("series_timeseries");
        render_time_series(
            &output,
            &Canvas::from_config(self.config),
            &points,
            &ChartText {
                title: "Mean value per acquisition date",
                x_desc: "Date",
                y_desc: "Mean value",
            },
        )?;

        Ok(SeriesReport {
            pixels: table.len(),
            summary,
            points,
            output,
        })
    }
}
