//! The three runs, each reading the previous run's files from the data directory.

use crate::address::annotate_addresses;
use crate::config::Config;
use crate::crawler::{CrawlReport, RouteCrawler};
use crate::distance::station_distance;
use crate::error::{Error, Result};
use crate::geocode::AmapReverseGeocoder;
use crate::overrides::OverrideTable;
use crate::resolver::{Resolution, Resolver};
use crate::store;
use crate::types::{StationTable, StationUniverse};
use std::path::Path;
use tracing::info;

pub const UNRESOLVED_COORDS_FILE: &str = "unresolved_coords.txt";
pub const UNRESOLVED_ADDRESS_FILE: &str = "unresolved_address.txt";

/// Crawls the identifiers listed in `input` and writes the category's route and failure files.
pub async fn crawl_category(config: &Config, category: &str, input: &Path) -> Result<CrawlReport> {
    let trains = store::read_lines(input)
        .map_err(|e| Error::Config(format!("Cannot read train list {}: {e}", input.display())))?;
    info!("Crawling {} train(s) of category {}", trains.len(), category);

    let crawler = RouteCrawler::new(config.route_base_url.clone(), config.http_timeout)?;
    let report = crawler.crawl_batch(&trains).await;

    store::write_train_file(&config.train_file(category), &report.trains)?;
    store::write_lines(&config.failed_train_file(category), &report.failed)?;

    Ok(report)
}

/// Union of the stations of every listed category; a missing route file aborts.
pub fn load_universe(config: &Config, categories: &[&str]) -> Result<StationUniverse> {
    let mut records = Vec::new();
    for category in categories {
        let path = config.train_file(category);
        if !path.exists() {
            return Err(Error::Config(format!(
                "Route file {} not found",
                path.display()
            )));
        }
        records.extend(store::read_train_file(&path)?);
    }

    let universe = StationUniverse::from_records(&records);
    info!(
        "{} train(s) across {} categories, {} distinct station(s)",
        records.len(),
        categories.len(),
        universe.len()
    );
    Ok(universe)
}

pub async fn resolve_coordinates(config: &Config, categories: &[&str]) -> Result<Resolution> {
    let universe = load_universe(config, categories)?;
    let overrides = OverrideTable::load(&config.overrides_path)?;
    let resolver = Resolver::standard(config, overrides)?;

    let resolution = resolver.resolve_all(&universe).await;

    let table = StationTable::from_coordinates(&universe, &resolution.coordinates);
    store::write_coordinates(&config.coordinates_file(), &table)?;
    store::write_lines(
        &config.data_dir.join(UNRESOLVED_COORDS_FILE),
        &resolution.unresolved,
    )?;

    Ok(resolution)
}

/// Reverse geocodes the coordinate table and writes the address table.
pub async fn resolve_addresses(config: &Config) -> Result<Vec<String>> {
    let mut table = read_coordinate_table(config)?;
    let geocoder = AmapReverseGeocoder::new(
        config.amap_base_url.clone(),
        config.amap_key()?.to_string(),
        config.http_timeout,
    )?;

    let unresolved = annotate_addresses(&geocoder, &mut table).await;

    store::write_addresses(&config.addresses_file(), &table)?;
    store::write_lines(&config.data_dir.join(UNRESOLVED_ADDRESS_FILE), &unresolved)?;

    Ok(unresolved)
}

pub fn distance_between(config: &Config, a: &str, b: &str) -> Result<f64> {
    let table = read_coordinate_table(config)?;
    station_distance(&table, a, b)
}

fn read_coordinate_table(config: &Config) -> Result<StationTable> {
    let path = config.coordinates_file();
    if !path.exists() {
        return Err(Error::Config(format!(
            "Coordinate table {} not found",
            path.display()
        )));
    }
    store::read_coordinates(&path)
}
