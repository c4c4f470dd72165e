use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};

/// Train categories crawled into separate route files, by number prefix.
pub const TRAIN_CATEGORIES: [&str; 7] = ["g", "d", "k", "t", "c", "z", "n"];

/// Geographic coordinate in degrees (WGS84-ish, as returned by the providers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Parses the providers' `"lng,lat"` form.
    pub fn parse_pair(text: &str) -> Result<Self> {
        let (lng, lat) = text
            .trim()
            .split_once(',')
            .ok_or_else(|| Error::Parse(format!("Malformed location: {text}")))?;

        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Parse(format!("Malformed longitude: {lng}")))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Parse(format!("Malformed latitude: {lat}")))?;

        Ok(Self { lng, lat })
    }

    /// Longitude first, as the reverse-geocoding endpoint expects.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub province: String,
    pub city: String,
    pub district: String,
}

/// One crawled train: its identifier and the stops in route order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainRecord {
    pub train: String,
    pub stations: Vec<String>,
}

impl TrainRecord {
    pub fn new(train: impl Into<String>, stations: Vec<String>) -> Self {
        Self {
            train: train.into(),
            stations,
        }
    }

    pub fn to_line(&self) -> String {
        format!("{}:{}", self.train, self.stations.join(","))
    }

    pub fn parse_line(line: &str) -> Result<Self> {
        let (train, stations) = line
            .split_once(':')
            .ok_or_else(|| Error::Parse(format!("Missing ':' in route line: {line}")))?;

        let stations = stations
            .trim_end_matches(['\r', '\n'])
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self::new(train.trim(), stations))
    }
}

/// Deduplicated union of every station name seen in any train record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationUniverse(BTreeSet<String>);

impl StationUniverse {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TrainRecord>) -> Self {
        Self(
            records
                .into_iter()
                .flat_map(|r| r.stations.iter().cloned())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for StationUniverse {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Station {
    pub coordinate: Option<Coordinate>,
    pub address: Option<Address>,
}

/// Station name to station, filled in stage by stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationTable {
    stations: BTreeMap<String, Station>,
}

impl StationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every universe name gets a row; names missing from `coordinates` stay unresolved.
    pub fn from_coordinates(
        universe: &StationUniverse,
        coordinates: &BTreeMap<String, Coordinate>,
    ) -> Self {
        let mut table = Self::new();
        for name in universe.iter() {
            table.insert(name.clone(), coordinates.get(name).copied());
        }
        table
    }

    pub fn insert(&mut self, name: String, coordinate: Option<Coordinate>) {
        self.stations.insert(
            name,
            Station {
                coordinate,
                address: None,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Station> {
        self.stations.get(name)
    }

    pub fn coordinate(&self, name: &str) -> Option<Coordinate> {
        self.stations.get(name).and_then(|s| s.coordinate)
    }

    pub fn set_address(&mut self, name: &str, address: Address) {
        if let Some(station) = self.stations.get_mut(name) {
            station.address = Some(address);
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Station)> {
        self.stations.iter()
    }

    pub fn resolved(&self) -> impl Iterator<Item = (&String, Coordinate)> {
        self.stations
            .iter()
            .filter_map(|(name, s)| s.coordinate.map(|c| (name, c)))
    }
}
