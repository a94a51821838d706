pub mod geotiff;
pub mod nc;
pub mod types;
pub mod utils;

pub use geotiff::GeoTiffReader;
pub use nc::NcReader;
pub use types::{DataReader, FileType, RasterData, ReadError};
pub use utils::reader_from_filetype;

pub fn create_reader(file_name: String) -> Result<Box<dyn DataReader>, ReadError> {
    match reader_from_filetype(file_name.as_ref())? {
        FileType::GeoTiff => Ok(Box::new(GeoTiffReader { file_name })),
        FileType::NetCDF => Ok(Box::new(NcReader {
            file_name,
            variable: None,
        })),
    }
}
