//! Flat files passed between the stages.
//!
//! Route files are `train:station,station,...` lines. Tables are CSV written
//! as UTF-8 with a byte-order mark so spreadsheet tools pick the encoding up.

use crate::error::{Error, Result};
use crate::types::{Coordinate, StationTable, TrainRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

const BOM: &str = "\u{feff}";

/// Reads a UTF-8 file, dropping a leading byte-order mark.
pub fn read_utf8(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(text.strip_prefix(BOM).unwrap_or(&text).to_string())
}

/// Reads non-blank lines, e.g. a list of train identifiers.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(read_utf8(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    ensure_parent(path)?;
    let mut file = fs::File::create(path)?;
    for line in lines {
        writeln!(file, "{}", line.as_ref())?;
    }
    Ok(())
}

pub fn read_train_file(path: &Path) -> Result<Vec<TrainRecord>> {
    let text = read_utf8(path)?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            TrainRecord::parse_line(line)
                .map_err(|e| Error::Parse(format!("{}:{}: {e}", path.display(), i + 1)))
        })
        .collect()
}

pub fn write_train_file(path: &Path, records: &[TrainRecord]) -> Result<()> {
    let lines: Vec<String> = records.iter().map(TrainRecord::to_line).collect();
    write_lines(path, &lines)?;
    info!("Wrote {} train(s) to {}", records.len(), path.display());
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct CoordinateRow {
    station: String,
    lng: Option<f64>,
    lat: Option<f64>,
}

#[derive(Debug, Serialize)]
struct AddressRow<'a> {
    station: &'a str,
    lng: Option<f64>,
    lat: Option<f64>,
    province: &'a str,
    city: &'a str,
    district: &'a str,
}

fn bom_writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    ensure_parent(path)?;
    let mut file = fs::File::create(path)?;
    file.write_all(BOM.as_bytes())?;
    Ok(csv::Writer::from_writer(file))
}

/// One row per station; unresolved stations get empty coordinate cells.
pub fn write_coordinates(path: &Path, table: &StationTable) -> Result<()> {
    let mut writer = bom_writer(path)?;
    for (name, station) in table.iter() {
        writer.serialize(CoordinateRow {
            station: name.clone(),
            lng: station.coordinate.map(|c| c.lng),
            lat: station.coordinate.map(|c| c.lat),
        })?;
    }
    writer.flush()?;
    info!("Wrote {} station(s) to {}", table.len(), path.display());
    Ok(())
}

pub fn read_coordinates(path: &Path) -> Result<StationTable> {
    let text = read_utf8(path)?;
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut table = StationTable::new();

    for row in reader.deserialize::<CoordinateRow>() {
        let row = row?;
        let coordinate = match (row.lng, row.lat) {
            (Some(lng), Some(lat)) => Some(Coordinate::new(lng, lat)),
            _ => None,
        };
        table.insert(row.station, coordinate);
    }
    Ok(table)
}

pub fn write_addresses(path: &Path, table: &StationTable) -> Result<()> {
    let mut writer = bom_writer(path)?;
    for (name, station) in table.iter() {
        let address = station.address.as_ref();
        writer.serialize(AddressRow {
            station: name,
            lng: station.coordinate.map(|c| c.lng),
            lat: station.coordinate.map(|c| c.lat),
            province: address.map_or("", |a| a.province.as_str()),
            city: address.map_or("", |a| a.city.as_str()),
            district: address.map_or("", |a| a.district.as_str()),
        })?;
    }
    writer.flush()?;
    info!("Wrote {} address row(s) to {}", table.len(), path.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
