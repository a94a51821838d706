use std::path::Path;

use super::utils::{ensure_exists, read_first_band};
use super::{DataReader, RasterData, ReadError};

pub struct GeoTiffReader {
    pub file_name: String,
}

impl DataReader for GeoTiffReader {
    fn read_data(&self) -> Result<RasterData, ReadError> {
        ensure_exists(Path::new(&self.file_name))?;
        read_first_band(&self.file_name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gdal::DriverManager;
    use gdal::raster::Buffer;

    pub const NO_DATA: f64 = -9999.0;

    /// Write a single-band float GeoTIFF with a north-up geotransform.
    pub fn write_test_tiff(
        path: &Path,
        width: usize,
        height: usize,
        geo_transform: [f64; 6],
        values: Vec<f32>,
    ) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut dataset = driver
            .create_with_band_type::<f32, _>(path, width, height, 1)
            .unwrap();
        dataset.set_geo_transform(&geo_transform).unwrap();
        let mut band = dataset.rasterband(1).unwrap();
        band.set_no_data_value(Some(NO_DATA)).unwrap();
        let mut buffer = Buffer::new((width, height), values);
        band.write((0, 0), (width, height), &mut buffer).unwrap();
    }

    #[test]
    fn test_read_maps_no_data_to_nan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ndvi_20240101.tif");
        write_test_tiff(
            &path,
            2,
            2,
            [500000.0, 30.0, 0.0, 4000000.0, 0.0, -30.0],
            vec![0.5, NO_DATA as f32, 0.25, 0.75],
        );

        let reader = GeoTiffReader {
            file_name: path.to_string_lossy().to_string(),
        };
        let data = reader.read_data().unwrap();

        assert_eq!((data.width, data.height), (2, 2));
        assert_eq!(data.buffer[0], 0.5);
        assert!(data.buffer[1].is_nan());
        assert_eq!(data.valid_count(), 3);
        assert_eq!(data.pixel_center(1, 1), Some((500045.0, 3999955.0)));
    }

    #[test]
    fn test_read_applies_scale_and_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ndvi_scaled.tif");
        {
            let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
            let dataset = driver
                .create_with_band_type::<i16, _>(&path, 3, 1, 1)
                .unwrap();
            let mut band = dataset.rasterband(1).unwrap();
            band.set_no_data_value(Some(-32768.0)).unwrap();
            band.set_scale(0.0001).unwrap();
            band.set_offset(-0.5).unwrap();
            let mut buffer = Buffer::new((3, 1), vec![5000i16, -32768, 10000]);
            band.write((0, 0), (3, 1), &mut buffer).unwrap();
        }

        let data = read_first_band(&path.to_string_lossy()).unwrap();

        assert_relative_eq!(data.buffer[0], 0.0, epsilon = 1e-9);
        assert!(data.buffer[1].is_nan());
        assert_relative_eq!(data.buffer[2], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_file() {
        let reader = GeoTiffReader {
            file_name: "./no/such/file.tif".to_string(),
        };
        assert!(matches!(
            reader.read_data(),
            Err(ReadError::MissingSource(_))
        ));
    }
}
