pub mod aggregate;
pub mod ingest;
pub mod metadata;
pub mod pixel;
pub mod processor;

pub use aggregate::TimeSeriesPoint;
pub use processor::SeriesPipeline;
