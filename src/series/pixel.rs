use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::readers::RasterData;
use crate::utils::ValueSummary;

/// One pixel of a dated raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPixel {
    pub x: f64,
    pub y: f64,
    pub value: Option<f64>,
    pub date: NaiveDate,
}

/// The pixels of one raster file, in row-major order.
#[derive(Debug, Clone)]
pub struct RasterTable {
    pub path: PathBuf,
    pub date: NaiveDate,
    pub pixels: Vec<SeriesPixel>,
}

impl RasterTable {
    /// x/y are pixel centres; without a geotransform they fall back to
    /// (col + 0.5, row + 0.5).
    pub fn from_raster(path: PathBuf, date: NaiveDate, data: &RasterData) -> Self {
        let mut pixels = Vec::with_capacity(data.buffer.len());

        for row in 0..data.height {
            for col in 0..data.width {
                let (x, y) = data
                    .pixel_center(row, col)
                    .unwrap_or((col as f64 + 0.5, row as f64 + 0.5));
                let raw = data.buffer[row * data.width + col];
                pixels.push(SeriesPixel {
                    x,
                    y,
                    value: if raw.is_nan() { None } else { Some(raw) },
                    date,
                });
            }
        }

        Self { path, date, pixels }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn summary(&self) -> ValueSummary {
        ValueSummary::from_values(self.pixels.iter().map(|p| p.value))
    }
}

/// All dated pixels in one long table.
#[derive(Debug, Clone, Default)]
pub struct SeriesTable {
    pixels: Vec<SeriesPixel>,
}

impl SeriesTable {
    /// Append the tables in the order given.
    pub fn concat(tables: Vec<RasterTable>) -> Self {
        let total = tables.iter().map(RasterTable::len).sum();
        let mut pixels = Vec::with_capacity(total);
        for table in tables {
            pixels.extend(table.pixels);
        }
        Self { pixels }
    }

    pub fn pixels(&self) -> &[SeriesPixel] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn summary(&self) -> ValueSummary {
        ValueSummary::from_values(self.pixels.iter().map(|p| p.value))
    }

    /// Row count per date.
    pub fn group_sizes(&self) -> BTreeMap<NaiveDate, usize> {
        let mut sizes = BTreeMap::new();
        for pixel in &self.pixels {
            *sizes.entry(pixel.date).or_insert(0) += 1;
        }
        sizes
    }
}
