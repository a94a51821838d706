use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use super::pixel::SeriesTable;

/// Mean value of one acquisition date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    /// `None` when every pixel of the date is missing.
    pub mean: Option<f64>,
    pub valid: usize,
    pub total: usize,
}

/// One point per distinct date, ascending, averaging the present values.
pub fn aggregate_by_date(table: &SeriesTable) -> Vec<TimeSeriesPoint> {
    // date -> (sum, valid, total)
    let mut groups: BTreeMap<NaiveDate, (f64, usize, usize)> = BTreeMap::new();

    for pixel in table.pixels() {
        let entry = groups.entry(pixel.date).or_insert((0.0, 0, 0));
        entry.2 += 1;
        if let Some(v) = pixel.value.filter(|v| !v.is_nan()) {
            entry.0 += v;
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(date, (sum, valid, total))| TimeSeriesPoint {
            date,
            mean: (valid > 0).then(|| sum / valid as f64),
            valid,
            total,
        })
        .collect()
}

impl fmt::Display for TimeSeriesPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mean {
            Some(mean) => write!(
                f,
                "{}: mean {:.4} ({} / {} pixels)",
                self.date, mean, self.valid, self.total
            ),
            None => write!(f, "{}: no data ({} pixels)", self.date, self.total),
        }
    }
}
