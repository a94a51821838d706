use std::path::Path;

use super::utils::{ensure_exists, read_first_band};
use super::{DataReader, RasterData, ReadError};

/// Reads one variable of a netCDF file through GDAL's subdataset syntax.
pub struct NcReader {
    pub file_name: String,
    pub variable: Option<String>,
}

impl NcReader {
    pub fn new(file_name: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            variable: Some(variable.into()),
        }
    }

    pub fn gdal_path(&self) -> String {
        match &self.variable {
            Some(variable) => format!("NETCDF:{}:{}", self.file_name, variable),
            None => self.file_name.clone(),
        }
    }
}

impl DataReader for NcReader {
    fn read_data(&self) -> Result<RasterData, ReadError> {
        ensure_exists(Path::new(&self.file_name))?;
        read_first_band(&self.gdal_path())
    }
}
