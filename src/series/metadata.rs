use std::path::Path;

use chrono::NaiveDate;

use crate::error::{PipelineError, PipelineResult};
use crate::readers::utils::ensure_exists;

/// One row of the acquisition metadata table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    pub date: NaiveDate,
    pub file: Option<String>,
}

/// Read the acquisition dates (and optionally file names) of a CSV table.
pub fn read_metadata(
    path: &Path,
    date_column: &str,
    date_format: &str,
    file_column: Option<&str>,
) -> PipelineResult<Vec<MetadataRecord>> {
    ensure_exists(path)?;

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = rdr.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            })
    };

    let date_idx = column_index(date_column)?;
    let file_idx = file_column.map(column_index).transpose()?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let raw_date = row.get(date_idx).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, date_format).map_err(|source| {
            PipelineError::DateParse {
                value: raw_date.to_string(),
                source,
            }
        })?;
        let file = file_idx
            .and_then(|idx| row.get(idx))
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        records.push(MetadataRecord { date, file });
    }

    log::debug!("Read {} metadata rows from {}", records.len(), path.display());
    Ok(records)
}
