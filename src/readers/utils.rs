use std::path::Path;

use gdal::Dataset;

use super::types::{FileType, RasterData, ReadError};

pub fn reader_from_filetype(path: &Path) -> Result<FileType, ReadError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("tif") | Some("tiff") => Ok(FileType::GeoTiff),
        Some("nc") => Ok(FileType::NetCDF),
        _ => Err(ReadError::UnknownFileType(path.to_path_buf())),
    }
}

pub fn ensure_exists(path: &Path) -> Result<(), ReadError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ReadError::MissingSource(path.to_path_buf()))
    }
}

/// Read band 1 of any GDAL-openable source.
///
/// Scale and offset are applied; the band's no-data sentinel and non-finite
/// samples become NaN. The dataset is closed when this returns.
pub fn read_first_band(gdal_path: &str) -> Result<RasterData, ReadError> {
    let dataset = Dataset::open(gdal_path)?;
    let (width, height) = dataset.raster_size();
    let geo_transform = dataset.geo_transform().ok();

    let band = dataset.rasterband(1)?;
    let buffer = band.read_as::<f64>((0, 0), (width, height), (width, height), None)?;
    let scale = band.scale().unwrap_or(1.0);
    let offset = band.offset().unwrap_or(0.0);
    let missing_value = band.no_data_value();

    let values = buffer
        .data()
        .iter()
        .map(|&raw| {
            if !raw.is_finite() || missing_value.is_some_and(|mv| raw == mv) {
                f64::NAN
            } else {
                raw * scale + offset
            }
        })
        .collect();

    log::debug!("Read {}: {}x{}", gdal_path, width, height);
    log::debug!("Geotransform: {:?}", geo_transform);

    Ok(RasterData {
        width,
        height,
        geo_transform,
        buffer: values,
    })
}
