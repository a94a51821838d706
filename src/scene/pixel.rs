use ndarray::Array2;

use super::grid::{GridVariable, check_shapes};
use crate::bbox::Bbox;
use crate::error::PipelineResult;
use crate::utils::ValueSummary;

/// One grid cell of a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub value: Option<f64>,
}

/// Row-per-pixel view of a scene, in column-major cell order.
#[derive(Debug, Clone)]
pub struct PixelTable {
    shape: (usize, usize),
    records: Vec<PixelRecord>,
}

impl PixelTable {
    pub fn records(&self) -> &[PixelRecord] {
        &self.records
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(|r| r.value)
    }

    pub fn summary(&self) -> ValueSummary {
        ValueSummary::from_values(self.values())
    }

    /// Coordinate extent of the pixels that carry a value.
    pub fn extent(&self) -> Option<Result<Bbox, String>> {
        Bbox::from_points(
            self.records
                .iter()
                .filter(|r| r.value.is_some())
                .map(|r| (r.longitude, r.latitude)),
        )
    }
}

pub fn flatten(grid: &GridVariable) -> PipelineResult<PixelTable> {
    flatten_arrays(grid.value(), grid.latitude(), grid.longitude())
}

/// Flatten three co-registered grids, rejecting mismatched shapes.
pub fn flatten_arrays(
    value: &Array2<f64>,
    latitude: &Array2<f64>,
    longitude: &Array2<f64>,
) -> PipelineResult<PixelTable> {
    check_shapes(value, latitude, longitude)?;

    Ok(PixelTable {
        shape: value.dim(),
        records: column_major_records(value, latitude, longitude),
    })
}

fn column_major_records(
    value: &Array2<f64>,
    latitude: &Array2<f64>,
    longitude: &Array2<f64>,
) -> Vec<PixelRecord> {
    // Iterating the transposed views walks down each column in turn.
    value
        .t()
        .iter()
        .zip(latitude.t().iter())
        .zip(longitude.t().iter())
        .map(|((&v, &lat), &lon)| PixelRecord {
            latitude: lat,
            longitude: lon,
            value: if v.is_nan() { None } else { Some(v) },
        })
        .collect()
}
