use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    #[serde(rename(deserialize = "png"))]
    Png,
    #[serde(rename(deserialize = "svg"))]
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// Which coordinate differences feed the pixel size estimate.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMethod {
    /// Consecutive rows of the flattened table.
    #[default]
    #[serde(rename(deserialize = "sequential"))]
    Sequential,
    /// Neighbouring cells along each axis of the 2-D grid.
    #[serde(rename(deserialize = "grid_axes"))]
    GridAxes,
}
