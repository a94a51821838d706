use ndarray::Array2;

use crate::config::SceneConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::readers::{DataReader, NcReader};

/// Which dimension of the value grid a 1-D coordinate axis runs along.
#[derive(Debug, Clone, Copy)]
enum AxisKind {
    Rows,
    Columns,
}

/// A measurement grid with the latitude and longitude of every cell.
#[derive(Debug, Clone)]
pub struct GridVariable {
    value: Array2<f64>,
    latitude: Array2<f64>,
    longitude: Array2<f64>,
}

impl GridVariable {
    /// All three arrays must share one (rows, cols) shape.
    pub fn new(
        value: Array2<f64>,
        latitude: Array2<f64>,
        longitude: Array2<f64>,
    ) -> PipelineResult<Self> {
        check_shapes(&value, &latitude, &longitude)?;

        Ok(Self {
            value,
            latitude,
            longitude,
        })
    }

    /// Like [`GridVariable::new`], but latitude and longitude may also be
    /// 1-D axes (one value per row and per column respectively), as found in
    /// mapped L3 products. Axes are broadcast to the grid shape.
    pub fn with_axes(
        value: Array2<f64>,
        latitude: Array2<f64>,
        longitude: Array2<f64>,
    ) -> PipelineResult<Self> {
        let shape = value.dim();
        let latitude = broadcast_axis(latitude, shape, AxisKind::Rows)?;
        let longitude = broadcast_axis(longitude, shape, AxisKind::Columns)?;
        Self::new(value, latitude, longitude)
    }

    /// Read the value, latitude and longitude variables of a netCDF scene.
    pub fn read(scene: &SceneConfig) -> PipelineResult<Self> {
        let value = NcReader::new(&scene.path, &scene.value_variable)
            .read_data()?
            .into_array()?;
        let latitude = NcReader::new(&scene.path, &scene.latitude_variable)
            .read_data()?
            .into_array()?;
        let longitude = NcReader::new(&scene.path, &scene.longitude_variable)
            .read_data()?
            .into_array()?;

        log::debug!(
            "Scene grids: value {:?}, latitude {:?}, longitude {:?}",
            value.dim(),
            latitude.dim(),
            longitude.dim()
        );

        Self::with_axes(value, latitude, longitude)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.value.dim()
    }

    pub fn value(&self) -> &Array2<f64> {
        &self.value
    }

    pub fn latitude(&self) -> &Array2<f64> {
        &self.latitude
    }

    pub fn longitude(&self) -> &Array2<f64> {
        &self.longitude
    }
}

/// Latitude and longitude must have the value grid's (rows, cols) shape.
pub(crate) fn check_shapes(
    value: &Array2<f64>,
    latitude: &Array2<f64>,
    longitude: &Array2<f64>,
) -> PipelineResult<()> {
    let expected = value.dim();
    for coords in [latitude, longitude] {
        if coords.dim() != expected {
            return Err(PipelineError::ShapeMismatch {
                expected,
                found: coords.dim(),
            });
        }
    }
    Ok(())
}

fn broadcast_axis(
    coords: Array2<f64>,
    shape: (usize, usize),
    kind: AxisKind,
) -> PipelineResult<Array2<f64>> {
    if coords.dim() == shape {
        return Ok(coords);
    }

    let (rows, cols) = coords.dim();
    let is_vector = rows == 1 || cols == 1;
    let wanted = match kind {
        AxisKind::Rows => shape.0,
        AxisKind::Columns => shape.1,
    };

    if !is_vector || coords.len() != wanted {
        return Err(PipelineError::ShapeMismatch {
            expected: shape,
            found: coords.dim(),
        });
    }

    let axis: Vec<f64> = coords.iter().copied().collect();
    Ok(Array2::from_shape_fn(shape, |(r, c)| match kind {
        AxisKind::Rows => axis[r],
        AxisKind::Columns => axis[c],
    }))
}
