pub mod grid;
pub mod pixel;
pub mod processor;
pub mod resolution;

pub use pixel::PixelTable;
pub use processor::ScenePipeline;
pub use resolution::ResolutionEstimate;
