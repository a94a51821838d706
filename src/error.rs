use std::path::PathBuf;

use chrono::NaiveDate;

use crate::readers::ReadError;

/// Ways the raster listing and the metadata dates can fail to line up.
#[derive(Debug, thiserror::Error)]
pub enum OrderingMismatch {
    #[error("found {files} raster files but the metadata table lists {dates} dates")]
    Count { files: usize, dates: usize },

    #[error("raster {file} has no matching row in the metadata table")]
    UnmatchedRaster { file: String },

    #[error("metadata row dated {date} has no matching raster file")]
    UnmatchedDate { date: NaiveDate },

    #[error("metadata dates are not in chronological order at row {row} ({previous} then {current})")]
    OutOfOrder {
        row: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("cannot read a date from raster file name {file} with template {template}")]
    BadFileName { file: String, template: String },
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("grid shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("date ordering mismatch: {0}")]
    OrderingMismatch(#[from] OrderingMismatch),

    #[error("no data available for {0}")]
    NoData(String),

    #[error("column {column} not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("failed to parse date {value:?}: {source}")]
    DateParse {
        value: String,
        source: chrono::ParseError,
    },

    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("plotting error: {0}")]
    Plot(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
