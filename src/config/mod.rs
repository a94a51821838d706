use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub mod error;
pub use error::ConfigError;

pub mod join;
pub use join::{FileDateFormat, JoinStrategy};

pub mod options;
pub use options::{ImageFormat, ResolutionMethod};

/// Pipeline A inputs: one netCDF scene and the names of its variables.
#[derive(Debug, Deserialize, Clone)]
pub struct SceneConfig {
    pub path: String,
    pub value_variable: String,
    pub latitude_variable: String,
    pub longitude_variable: String,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default)]
    pub resolution: ResolutionMethod,
}

/// Pipeline B inputs: a raster directory and its metadata table.
#[derive(Debug, Deserialize, Clone)]
pub struct SeriesConfig {
    pub raster_directory: PathBuf,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    #[serde(default)]
    pub recursive: bool,
    pub metadata: PathBuf,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    pub join: JoinStrategy,
}

fn default_histogram_bins() -> usize {
    50
}

fn default_file_pattern() -> String {
    "*.tif".to_string()
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./output")
}

fn default_image_size() -> (u32, u32) {
    (1024, 768)
}

#[derive(Debug, Clone)]
pub struct Config {
    output_directory: PathBuf,
    image_format: ImageFormat,
    image_size: (u32, u32),
    scene: Option<SceneConfig>,
    series: Option<SeriesConfig>,
}

// Deserializes through a helper struct so that every setting is validated
// before a Config exists.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            #[serde(default = "default_output_directory")]
            output_directory: PathBuf,
            #[serde(default)]
            image_format: ImageFormat,
            #[serde(default = "default_image_size")]
            image_size: (u32, u32),
            scene: Option<SceneConfig>,
            series: Option<SeriesConfig>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        if helper.scene.is_none() && helper.series.is_none() {
            return Err(D::Error::custom(ConfigError::NoPipeline));
        }

        if helper.image_size.0 == 0 || helper.image_size.1 == 0 {
            return Err(D::Error::custom(ConfigError::ImageSize));
        }

        if let Some(scene) = &helper.scene
            && scene.histogram_bins == 0
        {
            return Err(D::Error::custom(ConfigError::HistogramBins));
        }

        if let Some(series) = &helper.series {
            validate_series(series).map_err(D::Error::custom)?;
        }

        Ok(Config {
            output_directory: helper.output_directory,
            image_format: helper.image_format,
            image_size: helper.image_size,
            scene: helper.scene,
            series: helper.series,
        })
    }
}

fn validate_series(series: &SeriesConfig) -> Result<(), ConfigError> {
    glob::Pattern::new(&series.file_pattern).map_err(|e| ConfigError::FilePattern {
        pattern: series.file_pattern.clone(),
        message: e.to_string(),
    })?;

    if let JoinStrategy::Filename { template, .. } = &series.join
        && template.matches("{}").count() != 1
    {
        return Err(ConfigError::Template(template.clone()));
    }

    Ok(())
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn image_format(&self) -> ImageFormat {
        self.image_format
    }

    pub fn image_size(&self) -> (u32, u32) {
        self.image_size
    }

    pub fn scene(&self) -> Option<&SceneConfig> {
        self.scene.as_ref()
    }

    pub fn series(&self) -> Option<&SeriesConfig> {
        self.series.as_ref()
    }

    /// Path of an output image named `stem` in the configured format.
    pub fn output_path(&self, stem: &str) -> PathBuf {
        self.output_directory
            .join(format!("{}.{}", stem, self.image_format.extension()))
    }
}

#[cfg(test)]
impl Config {
    /// SVG output into `output_directory`, other settings at their defaults.
    pub(crate) fn for_pipelines(
        output_directory: PathBuf,
        scene: Option<SceneConfig>,
        series: Option<SeriesConfig>,
    ) -> Self {
        Config {
            output_directory,
            image_format: ImageFormat::Svg,
            image_size: default_image_size(),
            scene,
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        let mut file = File::create(&file_path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, file_path)
    }

    #[test]
    fn test_from_file() {
        let config_data = r#"
    {
        "output_directory": "./out",
        "image_format": "svg",
        "scene": {
            "path": "./data/scene.nc",
            "value_variable": "chlor_a",
            "latitude_variable": "latitude",
            "longitude_variable": "longitude",
            "resolution": "grid_axes"
        },
        "series": {
            "raster_directory": "./data/ndvi",
            "metadata": "./data/ndvi/metadata.csv",
            "join": { "strategy": "filename", "template": "ndvi_{}.tif", "date_format": "YYYYMMDD" }
        }
    }
    "#;
        let (_dir, file_path) = write_config(config_data);

        let config = Config::from_file(file_path).unwrap();

        assert_eq!(config.image_format(), ImageFormat::Svg);
        assert_eq!(config.image_size(), (1024, 768));
        assert_eq!(config.output_path("scene_heatmap"), PathBuf::from("./out/scene_heatmap.svg"));

        let scene = config.scene().unwrap();
        assert_eq!(scene.value_variable, "chlor_a");
        assert_eq!(scene.histogram_bins, 50);
        assert_eq!(scene.resolution, ResolutionMethod::GridAxes);

        let series = config.series().unwrap();
        assert_eq!(series.file_pattern, "*.tif");
        assert_eq!(series.date_column, "date");
        assert_eq!(series.date_format, "%Y-%m-%d");
        assert!(!series.recursive);
        assert!(matches!(series.join, JoinStrategy::Filename { .. }));
    }

    #[test]
    fn test_series_only() {
        let (_dir, file_path) = write_config(
            r#"{
            "series": {
                "raster_directory": "./data/ndvi",
                "metadata": "./data/ndvi/metadata.csv",
                "join": { "strategy": "positional" }
            }
        }"#,
        );
        let config = Config::from_file(file_path).unwrap();
        assert!(config.scene().is_none());
        assert_eq!(config.output_directory(), Path::new("./output"));
        assert_eq!(config.image_format(), ImageFormat::Png);
    }

    #[test]
    fn test_rejects_empty_config() {
        let (_dir, file_path) = write_config("{}");
        let err = Config::from_file(file_path).unwrap_err();
        assert!(err.to_string().contains("at least one of scene or series"));
    }

    #[test]
    fn test_rejects_zero_bins() {
        let (_dir, file_path) = write_config(
            r#"{
            "scene": {
                "path": "scene.nc",
                "value_variable": "chlor_a",
                "latitude_variable": "lat",
                "longitude_variable": "lon",
                "histogram_bins": 0
            }
        }"#,
        );
        let err = Config::from_file(file_path).unwrap_err();
        assert!(err.to_string().contains("histogram_bins"));
    }

    #[test]
    fn test_rejects_template_without_placeholder() {
        let (_dir, file_path) = write_config(
            r#"{
            "series": {
                "raster_directory": "./data/ndvi",
                "metadata": "./data/ndvi/metadata.csv",
                "join": { "strategy": "filename", "template": "ndvi.tif", "date_format": "YYYYMMDD" }
            }
        }"#,
        );
        let err = Config::from_file(file_path).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_rejects_bad_image_size() {
        let (_dir, file_path) = write_config(
            r#"{
            "image_size": [0, 600],
            "series": {
                "raster_directory": "./data/ndvi",
                "metadata": "./data/ndvi/metadata.csv",
                "join": { "strategy": "positional" }
            }
        }"#,
        );
        assert!(Config::from_file(file_path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("./no/such/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
