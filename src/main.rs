mod bbox;
mod config;
mod error;
mod readers;
mod render;
mod scene;
mod series;
mod utils;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Env};

use config::Config;
use scene::ScenePipeline;
use series::SeriesPipeline;

/// Turn satellite rasters into pixel tables and exploratory plots.
#[derive(Parser, Debug)]
#[command(name = "rastab", version, about)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "./data/config/config.json")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::from_file(&args.config)?;
    fs::create_dir_all(config.output_directory())?;
    log::info!("Writing outputs to {}", config.output_directory().display());

    let failed = run_pipelines(&config);
    if !failed.is_empty() {
        return Err(format!("pipelines failed: {}", failed.join(", ")).into());
    }

    Ok(())
}

/// Run every configured pipeline; returns the names of the ones that failed.
fn run_pipelines(config: &Config) -> Vec<&'static str> {
    let mut failed = Vec::new();

    if let Some(scene) = config.scene() {
        match ScenePipeline::new(config, scene).process() {
            Ok(report) => println!("{}", report),
            Err(e) => {
                log::error!("Scene pipeline failed: {}", e);
                failed.push("scene");
            }
        }
    }

    if let Some(series) = config.series() {
        match SeriesPipeline::new(config, series).process() {
            Ok(report) => println!("{}", report),
            Err(e) => {
                log::error!("Series pipeline failed: {}", e);
                failed.push("series");
            }
        }
    }

    failed
}
