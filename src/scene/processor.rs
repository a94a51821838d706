use std::fmt;
use std::path::PathBuf;

use super::grid::GridVariable;
use super::pixel::{PixelTable, flatten};
use super::resolution::ResolutionEstimate;
use crate::config::{Config, SceneConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::render::{Canvas, ChartText, HeatMapLayer, Histogram, render_heat_map, render_histogram};
use crate::utils::ValueSummary;

/// Everything drawn for a scene, computed before any file is written.
#[derive(Debug)]
pub struct SceneProducts {
    pub table: PixelTable,
    pub summary: ValueSummary,
    pub resolution: ResolutionEstimate,
    pub histogram: Histogram,
    pub log_histogram: Histogram,
    pub heat_map: HeatMapLayer,
}

impl SceneProducts {
    pub fn from_grid(grid: &GridVariable, scene: &SceneConfig) -> PipelineResult<Self> {
        let table = flatten(grid)?;
        if table.is_empty() {
            return Err(PipelineError::NoData("scene pixels".to_string()));
        }
        let summary = table.summary();
        log::info!("Flattened {:?} grid into {} pixels", table.shape(), table.len());
        log::info!("{}", summary);
        match table.extent() {
            Some(Ok(extent)) => log::info!(
                "Data extent: lon {:.3}..{:.3}, lat {:.3}..{:.3}",
                extent.xmin,
                extent.xmax,
                extent.ymin,
                extent.ymax
            ),
            Some(Err(e)) => log::warn!("Coordinates are not geographic: {}", e),
            None => log::warn!("Scene has no valid pixels"),
        }

        let resolution = ResolutionEstimate::estimate(scene.resolution, grid, &table);
        log::info!("Estimated resolution ({:?}): {}", scene.resolution, resolution);

        let histogram = Histogram::from_values(table.values().flatten(), scene.histogram_bins)
            .ok_or_else(|| PipelineError::NoData("scene histogram".to_string()))?;

        let log_histogram = Histogram::from_values(
            table
                .values()
                .flatten()
                .filter(|v| *v > 0.0)
                .map(f64::log10),
            scene.histogram_bins,
        )
        .ok_or_else(|| PipelineError::NoData("log10 scene histogram".to_string()))?;

        let heat_map = HeatMapLayer::build(&table, &resolution)?;

        Ok(Self {
            table,
            summary,
            resolution,
            histogram,
            log_histogram,
            heat_map,
        })
    }
}

#[derive(Debug)]
pub struct SceneReport {
    pub pixels: usize,
    pub summary: ValueSummary,
    pub resolution: ResolutionEstimate,
    pub outputs: Vec<PathBuf>,
}

impl fmt::Display for SceneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scene: {} pixels", self.pixels)?;
        writeln!(f, "  {}", self.summary)?;
        writeln!(f, "  Resolution: {}", self.resolution)?;
        for output in &self.outputs {
            writeln!(f, "  Wrote {}", output.display())?;
        }
        Ok(())
    }
}

/// Scene pipeline: read, flatten, estimate resolution, draw.
#[derive(Debug)]
pub struct ScenePipeline<'a> {
    config: &'a Config,
    scene: &'a SceneConfig,
}

impl<'a> ScenePipeline<'a> {
    pub fn new(config: &'a Config, scene: &'a SceneConfig) -> Self {
        Self { config, scene }
    }

    pub fn process(&self) -> PipelineResult<SceneReport> {
        log::info!("Reading scene {}", self.scene.path);
        let grid = GridVariable::read(self.scene)?;
        let products = SceneProducts::from_grid(&grid, self.scene)?;
        let outputs = self.render(&products)?;

        Ok(SceneReport {
            pixels: products.table.len(),
            summary: products.summary,
            resolution: products.resolution,
            outputs,
        })
    }

    fn render(&self, products: &SceneProducts) -> PipelineResult<Vec<PathBuf>> {
        let canvas = Canvas::from_config(self.config);
        let variable = self.scene.value_variable.as_str();

        let histogram_path = self.config.output_path("scene_histogram");
        let title = format!("Distribution of {}", variable);
        render_histogram(
            &histogram_path,
            &canvas,
            &products.histogram,
            &ChartText {
                title: &title,
                x_desc: variable,
                y_desc: "Pixel count",
            },
        )?;

        let log_path = self.config.output_path("scene_histogram_log10");
        let log_title = format!("Distribution of log10({})", variable);
        let log_desc = format!("log10({})", variable);
        render_histogram(
            &log_path,
            &canvas,
            &products.log_histogram,
            &ChartText {
                title: &log_title,
                x_desc: &log_desc,
                y_desc: "Pixel count",
            },
        )?;

        let heat_map_path = self.config.output_path("scene_heatmap");
        render_heat_map(&heat_map_path, &canvas, &products.heat_map, variable)?;

        Ok(vec![histogram_path, log_path, heat_map_path])
    }
}
