use anyhow::Context;
use clap::{Parser, Subcommand};
use station_data::config::Config;
use station_data::stages;
use station_data::types::TRAIN_CATEGORIES;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "station-data", about = "Build the railway station dataset")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the stop lists of the trains listed in a file, one identifier per line
    Crawl {
        #[arg(long)]
        category: String,
        #[arg(long)]
        input: PathBuf,
    },
    /// Geocode every station found in the route files
    Resolve {
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<String>>,
    },
    /// Reverse geocode the coordinate table into provinces, cities and districts
    Address,
    /// Print the planar distance in metres between two stations
    Distance { from: String, to: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env().context("loading configuration")?;

    match cli.command {
        Command::Crawl { category, input } => {
            let report = stages::crawl_category(&config, &category, &input).await?;
            info!(
                "Category {}: {} crawled, {} failed",
                category,
                report.trains.len(),
                report.failed.len()
            );
        }
        Command::Resolve { categories } => {
            let categories: Vec<String> = categories.unwrap_or_else(|| {
                TRAIN_CATEGORIES.iter().map(ToString::to_string).collect()
            });
            let categories: Vec<&str> = categories.iter().map(String::as_str).collect();

            let resolution = stages::resolve_coordinates(&config, &categories).await?;
            if !resolution.unresolved.is_empty() {
                warn!(
                    "{} station(s) still need manual coordinates: {}",
                    resolution.unresolved.len(),
                    resolution.unresolved.join(",")
                );
            }
        }
        Command::Address => {
            let unresolved = stages::resolve_addresses(&config).await?;
            if !unresolved.is_empty() {
                warn!("No address for: {}", unresolved.join(","));
            }
        }
        Command::Distance { from, to } => {
            let metres = stages::distance_between(&config, &from, &to)?;
            println!("{metres:.1}");
        }
    }

    Ok(())
}
