use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use walkdir::WalkDir;

use super::metadata::{MetadataRecord, read_metadata};
use super::pixel::{RasterTable, SeriesTable};
use crate::config::{FileDateFormat, JoinStrategy, SeriesConfig};
use crate::error::{OrderingMismatch, PipelineError, PipelineResult};
use crate::readers::create_reader;
use crate::readers::utils::ensure_exists;

/// A raster file and the acquisition date it was joined to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedRaster {
    pub path: PathBuf,
    pub date: NaiveDate,
}

#[derive(Debug)]
pub struct RasterSeriesIngestor<'a> {
    config: &'a SeriesConfig,
}

impl<'a> RasterSeriesIngestor<'a> {
    pub fn new(config: &'a SeriesConfig) -> Self {
        Self { config }
    }

    /// Raster files under the configured directory, in lexicographic order.
    pub fn list_rasters(&self) -> PipelineResult<Vec<PathBuf>> {
        list_rasters(
            &self.config.raster_directory,
            &self.config.file_pattern,
            self.config.recursive,
        )
    }

    pub fn read_metadata(&self) -> PipelineResult<Vec<MetadataRecord>> {
        let file_column = match &self.config.join {
            JoinStrategy::FileColumn { column } => Some(column.as_str()),
            _ => None,
        };
        read_metadata(
            &self.config.metadata,
            &self.config.date_column,
            &self.config.date_format,
            file_column,
        )
    }

    /// Read every raster and concatenate them in listing order.
    pub fn ingest(&self) -> PipelineResult<SeriesTable> {
        let files = self.list_rasters()?;
        let metadata = self.read_metadata()?;
        log::info!(
            "Found {} raster files and {} metadata rows",
            files.len(),
            metadata.len()
        );

        let dated = join_dates(&files, &metadata, &self.config.join)?;

        let mut tables = Vec::with_capacity(dated.len());
        for raster in dated {
            let reader = create_reader(raster.path.to_string_lossy().to_string())?;
            let data = reader.read_data()?;
            log::trace!("{}\n{}", raster.path.display(), data);
            let table = RasterTable::from_raster(raster.path, raster.date, &data);
            log::debug!(
                "{} ({}): {}",
                table.path.display(),
                table.date,
                table.summary()
            );
            tables.push(table);
        }

        Ok(SeriesTable::concat(tables))
    }
}

pub fn list_rasters(
    directory: &Path,
    pattern: &str,
    recursive: bool,
) -> PipelineResult<Vec<PathBuf>> {
    ensure_exists(directory)?;
    let pattern = glob::Pattern::new(pattern)?;

    let mut walker = WalkDir::new(directory).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let wanted =
            entry.file_type().is_file() && pattern.matches(&entry.file_name().to_string_lossy());
        if wanted {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Pair every listed raster with exactly one metadata row.
pub fn join_dates(
    files: &[PathBuf],
    metadata: &[MetadataRecord],
    strategy: &JoinStrategy,
) -> PipelineResult<Vec<DatedRaster>> {
    if files.len() != metadata.len() {
        return Err(OrderingMismatch::Count {
            files: files.len(),
            dates: metadata.len(),
        }
        .into());
    }

    match strategy {
        JoinStrategy::Positional => join_positional(files, metadata),
        JoinStrategy::FileColumn { .. } => join_by_file_column(files, metadata),
        JoinStrategy::Filename {
            template,
            date_format,
        } => join_by_file_name(files, metadata, template, *date_format),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn join_positional(
    files: &[PathBuf],
    metadata: &[MetadataRecord],
) -> PipelineResult<Vec<DatedRaster>> {
    log::warn!("Joining rasters to dates by position; file names must sort chronologically");

    for (row, pair) in metadata.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            return Err(OrderingMismatch::OutOfOrder {
                row: row + 1,
                previous: pair[0].date,
                current: pair[1].date,
            }
            .into());
        }
    }

    Ok(files
        .iter()
        .zip(metadata)
        .map(|(path, record)| DatedRaster {
            path: path.clone(),
            date: record.date,
        })
        .collect())
}

fn join_by_file_column(
    files: &[PathBuf],
    metadata: &[MetadataRecord],
) -> PipelineResult<Vec<DatedRaster>> {
    let mut by_name: HashMap<String, Vec<NaiveDate>> = HashMap::new();
    for record in metadata {
        let Some(file) = &record.file else {
            return Err(OrderingMismatch::UnmatchedDate { date: record.date }.into());
        };
        by_name
            .entry(file_name(Path::new(file)))
            .or_default()
            .push(record.date);
    }

    files
        .iter()
        .map(|path| -> PipelineResult<DatedRaster> {
            let name = file_name(path);
            let date = by_name
                .get_mut(&name)
                .and_then(|dates| (!dates.is_empty()).then(|| dates.remove(0)))
                .ok_or(OrderingMismatch::UnmatchedRaster { file: name })?;
            Ok(DatedRaster {
                path: path.clone(),
                date,
            })
        })
        .collect()
}

fn join_by_file_name(
    files: &[PathBuf],
    metadata: &[MetadataRecord],
    template: &str,
    date_format: FileDateFormat,
) -> PipelineResult<Vec<DatedRaster>> {
    let mut remaining: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in metadata {
        *remaining.entry(record.date).or_insert(0) += 1;
    }

    files
        .iter()
        .map(|path| -> PipelineResult<DatedRaster> {
            let name = file_name(path);
            let date = date_from_file_name(&name, template, date_format)?;
            match remaining.get_mut(&date) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return Err(OrderingMismatch::UnmatchedRaster { file: name }.into()),
            }
            Ok(DatedRaster {
                path: path.clone(),
                date,
            })
        })
        .collect()
}

/// Parse the date that replaces `{}` in `template`.
pub fn date_from_file_name(
    name: &str,
    template: &str,
    date_format: FileDateFormat,
) -> PipelineResult<NaiveDate> {
    let bad_name = || OrderingMismatch::BadFileName {
        file: name.to_string(),
        template: template.to_string(),
    };

    let (prefix, suffix) = template.split_once("{}").ok_or_else(bad_name)?;
    let middle = name
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .ok_or_else(bad_name)?;

    let date = date_format
        .parse(middle)
        .map_err(|_| PipelineError::from(bad_name()))?;

    // chrono accepts unpadded fields; the file name must match exactly.
    if date_format.format(&date) != middle {
        return Err(bad_name().into());
    }
    Ok(date)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::readers::geotiff::tests::{NO_DATA, write_test_tiff};
    use crate::series::aggregate::aggregate_by_date;
    use std::fs;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records(dates: &[NaiveDate]) -> Vec<MetadataRecord> {
        dates
            .iter()
            .map(|&date| MetadataRecord { date, file: None })
            .collect()
    }

    pub fn compact_template() -> JoinStrategy {
        JoinStrategy::Filename {
            template: "ndvi_{}.tif".to_string(),
            date_format: FileDateFormat::Compact,
        }
    }

    #[test]
    fn test_date_from_file_name() {
        assert_eq!(
            date_from_file_name("ndvi_20240117.tif", "ndvi_{}.tif", FileDateFormat::Compact)
                .unwrap(),
            date(2024, 1, 17)
        );
        assert_eq!(
            date_from_file_name("LC08_2024033_sr.tif", "LC08_{}_sr.tif", FileDateFormat::DayOfYear)
                .unwrap(),
            date(2024, 2, 2)
        );
        assert!(matches!(
            date_from_file_name("evi_20240117.tif", "ndvi_{}.tif", FileDateFormat::Compact),
            Err(PipelineError::OrderingMismatch(OrderingMismatch::BadFileName { .. }))
        ));
        assert!(matches!(
            date_from_file_name("ndvi_2024-01-17.tif", "ndvi_{}.tif", FileDateFormat::Compact),
            Err(PipelineError::OrderingMismatch(OrderingMismatch::BadFileName { .. }))
        ));
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let files = vec![PathBuf::from("ndvi_20240101.tif"), PathBuf::from("ndvi_20240117.tif")];
        let metadata = records(&[date(2024, 1, 1), date(2024, 1, 17), date(2024, 2, 2)]);

        for strategy in [compact_template(), JoinStrategy::Positional] {
            assert!(matches!(
                join_dates(&files, &metadata, &strategy),
                Err(PipelineError::OrderingMismatch(OrderingMismatch::Count {
                    files: 2,
                    dates: 3
                }))
            ));
        }
    }

    #[test]
    fn test_file_name_join_ignores_metadata_order() {
        let files = vec![
            PathBuf::from("d/ndvi_20240101.tif"),
            PathBuf::from("d/ndvi_20240117.tif"),
            PathBuf::from("d/ndvi_20240202.tif"),
        ];
        let metadata = records(&[date(2024, 2, 2), date(2024, 1, 1), date(2024, 1, 17)]);

        let dated = join_dates(&files, &metadata, &compact_template()).unwrap();
        let dates: Vec<NaiveDate> = dated.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 17), date(2024, 2, 2)]);
    }

    #[test]
    fn test_file_name_join_rejects_unknown_date() {
        let files = vec![PathBuf::from("ndvi_20240101.tif"), PathBuf::from("ndvi_20240301.tif")];
        let metadata = records(&[date(2024, 1, 1), date(2024, 1, 17)]);

        assert!(matches!(
            join_dates(&files, &metadata, &compact_template()),
            Err(PipelineError::OrderingMismatch(OrderingMismatch::UnmatchedRaster { .. }))
        ));
    }

    #[test]
    fn test_file_name_join_rejects_reused_date() {
        let files = vec![PathBuf::from("ndvi_20240101.tif"), PathBuf::from("x/ndvi_20240101.tif")];
        let metadata = records(&[date(2024, 1, 1), date(2024, 1, 17)]);

        assert!(join_dates(&files, &metadata, &compact_template()).is_err());
    }

    #[test]
    fn test_positional_rejects_unsorted_dates() {
        let files = vec![PathBuf::from("a.tif"), PathBuf::from("b.tif")];
        let metadata = records(&[date(2024, 1, 17), date(2024, 1, 1)]);

        assert!(matches!(
            join_dates(&files, &metadata, &JoinStrategy::Positional),
            Err(PipelineError::OrderingMismatch(OrderingMismatch::OutOfOrder { row: 1, .. }))
        ));
    }

    #[test]
    fn test_positional_zips_in_order() {
        let files = vec![PathBuf::from("a.tif"), PathBuf::from("b.tif")];
        let metadata = records(&[date(2024, 1, 1), date(2024, 1, 17)]);

        let dated = join_dates(&files, &metadata, &JoinStrategy::Positional).unwrap();
        assert_eq!(
            dated[1],
            DatedRaster {
                path: PathBuf::from("b.tif"),
                date: date(2024, 1, 17)
            }
        );
    }

    #[test]
    fn test_file_column_join() {
        let files = vec![PathBuf::from("d/scene_a.tif"), PathBuf::from("d/scene_b.tif")];
        let metadata = vec![
            MetadataRecord {
                date: date(2024, 1, 17),
                file: Some("archive/scene_b.tif".to_string()),
            },
            MetadataRecord {
                date: date(2024, 1, 1),
                file: Some("scene_a.tif".to_string()),
            },
        ];
        let strategy = JoinStrategy::FileColumn {
            column: "file".to_string(),
        };

        let dated = join_dates(&files, &metadata, &strategy).unwrap();
        assert_eq!(dated[0].date, date(2024, 1, 1));
        assert_eq!(dated[1].date, date(2024, 1, 17));
    }

    #[test]
    fn test_file_column_join_rejects_blank_file() {
        let files = vec![PathBuf::from("scene_a.tif")];
        let metadata = records(&[date(2024, 1, 1)]);
        let strategy = JoinStrategy::FileColumn {
            column: "file".to_string(),
        };

        assert!(matches!(
            join_dates(&files, &metadata, &strategy),
            Err(PipelineError::OrderingMismatch(OrderingMismatch::UnmatchedDate { .. }))
        ));
    }

    #[test]
    fn test_list_rasters_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["ndvi_20240202.tif", "ndvi_20240101.tif", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("ndvi_20240117.tif"), b"").unwrap();

        let flat = list_rasters(dir.path(), "*.tif", false).unwrap();
        let names: Vec<String> = flat.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["ndvi_20240101.tif", "ndvi_20240202.tif"]);

        let deep = list_rasters(dir.path(), "*.tif", true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_list_rasters_missing_directory() {
        assert!(matches!(
            list_rasters(Path::new("./no/such/dir"), "*.tif", false),
            Err(PipelineError::Read(crate::readers::ReadError::MissingSource(_)))
        ));
    }

    /// Three 2 x 2 NDVI rasters with means 1, 2 and 3, listed in a
    /// metadata table whose rows are newest first.
    pub fn write_ndvi_series(dir: &Path) -> SeriesConfig {
        let transform = [500000.0, 30.0, 0.0, 4000000.0, 0.0, -30.0];
        write_test_tiff(
            &dir.join("ndvi_20240101.tif"),
            2,
            2,
            transform,
            vec![1.0, 1.0, NO_DATA as f32, 1.0],
        );
        write_test_tiff(
            &dir.join("ndvi_20240117.tif"),
            2,
            2,
            transform,
            vec![2.0, 2.0, 2.0, 2.0],
        );
        write_test_tiff(
            &dir.join("ndvi_20240202.tif"),
            2,
            2,
            transform,
            vec![NO_DATA as f32, 3.0, 3.0, 3.0],
        );
        let metadata = dir.join("metadata.csv");
        fs::write(&metadata, "date\n2024-02-02\n2024-01-17\n2024-01-01\n").unwrap();

        SeriesConfig {
            raster_directory: dir.to_path_buf(),
            file_pattern: "ndvi_*.tif".to_string(),
            recursive: false,
            metadata,
            date_column: "date".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            join: compact_template(),
        }
    }

    #[test]
    fn test_ingest_three_dates() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_ndvi_series(dir.path());

        let table = RasterSeriesIngestor::new(&config).ingest().unwrap();
        assert_eq!(table.len(), 12);
        assert_eq!(table.summary().valid, 10);

        let series: Vec<(NaiveDate, Option<f64>)> = aggregate_by_date(&table)
            .into_iter()
            .map(|p| (p.date, p.mean))
            .collect();
        assert_eq!(
            series,
            vec![
                (date(2024, 1, 1), Some(1.0)),
                (date(2024, 1, 17), Some(2.0)),
                (date(2024, 2, 2), Some(3.0)),
            ]
        );
    }

    #[test]
    fn test_ingest_rejects_extra_metadata_row() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tiff(
            &dir.path().join("ndvi_20240101.tif"),
            1,
            1,
            [0.0, 1.0, 0.0, 0.0, 0.0, -1.0],
            vec![0.5],
        );
        let metadata = dir.path().join("metadata.csv");
        fs::write(&metadata, "date\n2024-01-01\n2024-01-17\n").unwrap();

        let config = SeriesConfig {
            raster_directory: dir.path().to_path_buf(),
            file_pattern: "*.tif".to_string(),
            recursive: false,
            metadata,
            date_column: "date".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            join: compact_template(),
        };

        assert!(matches!(
            RasterSeriesIngestor::new(&config).ingest(),
            Err(PipelineError::OrderingMismatch(OrderingMismatch::Count { files: 1, dates: 2 }))
        ));
    }
}
