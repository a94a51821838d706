use std::path::Path;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::colormap::{LogNormalizer, VIRIDIS, evaluate};
use super::{Canvas, Chart, DrawResult};
use crate::bbox::Bbox;
use crate::error::{PipelineError, PipelineResult};
use crate::scene::{PixelTable, ResolutionEstimate};

const COLORBAR_WIDTH: u32 = 120;
const COLORBAR_STEPS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatCell {
    pub longitude: f64,
    pub latitude: f64,
    pub value: f64,
    pub color: RGBColor,
}

/// Everything the heat map draws, resolved from a pixel table.
#[derive(Debug, Clone)]
pub struct HeatMapLayer {
    pub cells: Vec<HeatCell>,
    pub viewport: Bbox,
    pub half_width: f64,
    pub half_height: f64,
    pub scale: LogNormalizer,
}

impl HeatMapLayer {
    /// Keeps pixels with a positive value; `log10` of the value picks the colour.
    pub fn build(table: &PixelTable, resolution: &ResolutionEstimate) -> PipelineResult<Self> {
        let (height, width) = match (resolution.pixel_height, resolution.pixel_width) {
            (Some(h), Some(w)) if resolution.is_drawable() => (h.abs(), w.abs()),
            _ => return Err(PipelineError::NoData("pixel resolution".to_string())),
        };

        let drawable: Vec<(f64, f64, f64)> = table
            .records()
            .iter()
            .filter(|r| r.latitude.is_finite() && r.longitude.is_finite())
            .filter_map(|r| {
                r.value
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .map(|v| (r.longitude, r.latitude, v))
            })
            .collect();

        let scale = LogNormalizer::from_values(drawable.iter().map(|&(_, _, v)| v))
            .ok_or_else(|| PipelineError::NoData("heat map pixels".to_string()))?;

        let extent = Bbox::from_points(drawable.iter().map(|&(lon, lat, _)| (lon, lat)))
            .ok_or_else(|| PipelineError::NoData("heat map pixels".to_string()))?
            .map_err(|e| PipelineError::Plot(format!("invalid map extent: {}", e)))?;

        let cells = drawable
            .into_iter()
            .map(|(longitude, latitude, value)| HeatCell {
                longitude,
                latitude,
                value,
                color: evaluate(VIRIDIS, scale.normalize(value).unwrap_or(0.0)),
            })
            .collect();

        Ok(Self {
            cells,
            viewport: extent.padded(width / 2.0, height / 2.0),
            half_width: width / 2.0,
            half_height: height / 2.0,
            scale,
        })
    }
}

struct HeatMapChart<'a> {
    layer: &'a HeatMapLayer,
    title: &'a str,
}

pub fn render_heat_map(
    path: &Path,
    canvas: &Canvas,
    layer: &HeatMapLayer,
    title: &str,
) -> PipelineResult<()> {
    log::info!(
        "Rendering heat map of {} pixels to {}",
        layer.cells.len(),
        path.display()
    );
    canvas.render(path, &HeatMapChart { layer, title })
}

impl Chart for HeatMapChart<'_> {
    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let (width, _) = root.dim_in_pixel();
        let (map_area, bar_area) = root.split_horizontally(width.saturating_sub(COLORBAR_WIDTH));

        let Bbox {
            xmin,
            xmax,
            ymin,
            ymax,
        } = self.layer.viewport;

        let mut chart = ChartBuilder::on(&map_area)
            .caption(self.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(xmin..xmax, ymin..ymax)?;

        // Graticule as base layer
        chart
            .plotting_area()
            .fill(&RGBColor(235, 240, 245))?;
        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .x_label_formatter(&|v| format!("{:.1}°", v))
            .y_label_formatter(&|v| format!("{:.1}°", v))
            .light_line_style(WHITE)
            .bold_line_style(RGBColor(200, 200, 200))
            .draw()?;

        chart.draw_series(self.layer.cells.iter().map(|cell| {
            Rectangle::new(
                [
                    (
                        cell.longitude - self.layer.half_width,
                        cell.latitude - self.layer.half_height,
                    ),
                    (
                        cell.longitude + self.layer.half_width,
                        cell.latitude + self.layer.half_height,
                    ),
                ],
                cell.color.filled(),
            )
        }))?;

        draw_colorbar(&bar_area, &self.layer.scale)?;

        root.present()?;
        Ok(())
    }
}

fn draw_colorbar<DB>(area: &DrawingArea<DB, Shift>, scale: &LogNormalizer) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (lo, hi) = if scale.max_log > scale.min_log {
        (scale.min_log, scale.max_log)
    } else {
        (scale.min_log - 0.5, scale.max_log + 0.5)
    };

    let mut bar = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(55)
        .margin_right(10)
        .y_label_area_size(55)
        .build_cartesian_2d(0.0..1.0, lo..hi)?;

    bar.configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .disable_y_mesh()
        .y_labels(6)
        .y_label_formatter(&|v| format!("{:.2}", 10f64.powf(*v)))
        .draw()?;

    let step = (hi - lo) / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|i| {
        let y0 = lo + i as f64 * step;
        let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], evaluate(VIRIDIS, t).filled())
    }))?;

    Ok(())
}
