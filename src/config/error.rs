#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("at least one of scene or series must be configured")]
    NoPipeline,

    #[error("histogram_bins must be greater than 0")]
    HistogramBins,

    #[error("image_size must be non-zero in both dimensions")]
    ImageSize,

    #[error("filename template {0:?} must contain exactly one {{}} placeholder")]
    Template(String),

    #[error("invalid file_pattern {pattern:?}: {message}")]
    FilePattern { pattern: String, message: String },
}
