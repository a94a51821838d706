use std::fmt;

use super::grid::GridVariable;
use super::pixel::PixelTable;
use crate::config::ResolutionMethod;

/// Mean pixel size in coordinate units. `None` means no data to estimate from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionEstimate {
    pub pixel_height: Option<f64>,
    pub pixel_width: Option<f64>,
}

impl ResolutionEstimate {
    /// Mean difference between each table row and the row before it.
    ///
    /// The first row has no predecessor and contributes nothing; differences
    /// involving a non-finite coordinate are skipped.
    pub fn sequential(table: &PixelTable) -> Self {
        let records = table.records();
        Self {
            pixel_height: mean_finite(records.windows(2).map(|w| w[1].latitude - w[0].latitude)),
            pixel_width: mean_finite(records.windows(2).map(|w| w[1].longitude - w[0].longitude)),
        }
    }

    /// Mean latitude step down the columns and longitude step along the rows.
    pub fn from_grid_axes(grid: &GridVariable) -> Self {
        let (rows, cols) = grid.shape();
        let lat = grid.latitude();
        let lon = grid.longitude();

        let heights = (0..rows.saturating_sub(1))
            .flat_map(|r| (0..cols).map(move |c| lat[[r + 1, c]] - lat[[r, c]]));
        let widths = (0..rows)
            .flat_map(|r| (0..cols.saturating_sub(1)).map(move |c| lon[[r, c + 1]] - lon[[r, c]]));

        Self {
            pixel_height: mean_finite(heights),
            pixel_width: mean_finite(widths),
        }
    }

    pub fn estimate(method: ResolutionMethod, grid: &GridVariable, table: &PixelTable) -> Self {
        match method {
            ResolutionMethod::Sequential => Self::sequential(table),
            ResolutionMethod::GridAxes => Self::from_grid_axes(grid),
        }
    }

    /// Both sizes present and non-zero.
    pub fn is_drawable(&self) -> bool {
        matches!(
            (self.pixel_height, self.pixel_width),
            (Some(h), Some(w)) if h != 0.0 && w != 0.0
        )
    }
}

fn mean_finite<I>(diffs: I) -> Option<f64>
where
    I: Iterator<Item = f64>,
{
    let (sum, count) = diffs
        .filter(|d| d.is_finite())
        .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

impl fmt::Display for ResolutionEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| v.map_or_else(|| "NA".to_string(), |v| format!("{:.6}", v));
        write!(
            f,
            "pixel height: {}, pixel width: {}",
            show(self.pixel_height),
            show(self.pixel_width)
        )
    }
}
