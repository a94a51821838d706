use std::fmt;
use std::path::PathBuf;

use ndarray::Array2;

pub trait DataReader {
    fn read_data(&self) -> Result<RasterData, ReadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("input not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("unsupported file type: {}", .0.display())]
    UnknownFileType(PathBuf),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("raster buffer does not match its dimensions: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Band 1 of a raster, row-major, with missing samples stored as NaN.
#[derive(Debug, Clone)]
pub struct RasterData {
    pub width: usize,
    pub height: usize,
    /// GDAL affine transform: [origin_x, pixel_w, row_rot, origin_y, col_rot, pixel_h]
    pub geo_transform: Option<[f64; 6]>,
    pub buffer: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    GeoTiff,
    NetCDF,
}

impl RasterData {
    /// Reshape the buffer into a (rows, cols) array.
    pub fn into_array(self) -> Result<Array2<f64>, ReadError> {
        Ok(Array2::from_shape_vec((self.height, self.width), self.buffer)?)
    }

    /// Georeferenced centre of the pixel at (row, col).
    pub fn pixel_center(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        let gt = self.geo_transform?;
        let px = col as f64 + 0.5;
        let py = row as f64 + 0.5;
        Some((
            gt[0] + px * gt[1] + py * gt[2],
            gt[3] + px * gt[4] + py * gt[5],
        ))
    }

    pub fn valid_count(&self) -> usize {
        self.buffer.iter().filter(|v| !v.is_nan()).count()
    }
}

impl fmt::Display for RasterData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min_value = self
            .buffer
            .iter()
            .copied()
            .filter(|x| !x.is_nan())
            .fold(f64::NAN, f64::min);

        let max_value = self
            .buffer
            .iter()
            .copied()
            .filter(|x| !x.is_nan())
            .fold(f64::NAN, f64::max);

        write!(
            f,
            "Width: {}\nHeight: {}\nBuffer Length: {}\nValid pixels: {}\nMin value: {}\nMax value: {}",
            self.width,
            self.height,
            self.buffer.len(),
            self.valid_count(),
            min_value,
            max_value,
        )
    }
}
