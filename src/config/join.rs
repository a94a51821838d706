use chrono::NaiveDate;
use serde::Deserialize;

/// How each raster file is paired with a row of the metadata table.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "strategy")]
pub enum JoinStrategy {
    /// Parse the date out of the file name, e.g. `ndvi_{}.tif`.
    #[serde(rename(deserialize = "filename"))]
    Filename {
        template: String,
        date_format: FileDateFormat,
    },
    /// The metadata table names the file for each row.
    #[serde(rename(deserialize = "file_column"))]
    FileColumn { column: String },
    /// Row i of the metadata belongs to file i of the sorted listing.
    #[serde(rename(deserialize = "positional"))]
    Positional,
}

/// Date layouts found in satellite product file names.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FileDateFormat {
    #[serde(rename(deserialize = "YYYYMMDD"))]
    Compact,
    #[serde(rename(deserialize = "YYYY-MM-DD"))]
    Dashed,
    #[serde(rename(deserialize = "YYYY_MM_DD"))]
    Underscored,
    #[serde(rename(deserialize = "YYYYDDD"))]
    DayOfYear,
}

impl FileDateFormat {
    pub fn chrono_format(&self) -> &'static str {
        match self {
            FileDateFormat::Compact => "%Y%m%d",
            FileDateFormat::Dashed => "%Y-%m-%d",
            FileDateFormat::Underscored => "%Y_%m_%d",
            FileDateFormat::DayOfYear => "%Y%j",
        }
    }

    pub fn format(&self, date: &NaiveDate) -> String {
        date.format(self.chrono_format()).to_string()
    }

    pub fn parse(&self, text: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(text, self.chrono_format())
    }
}
