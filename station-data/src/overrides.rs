//! Hand-verified coordinates for stations no provider finds.

use crate::error::{Error, Result};
use crate::store;
use crate::types::Coordinate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct OverrideRow {
    station: String,
    lng: f64,
    lat: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable(BTreeMap<String, Coordinate>);

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `station,lng,lat` rows.
    pub fn load(path: &Path) -> Result<Self> {
        let text = store::read_utf8(path)
            .map_err(|e| Error::Config(format!("Cannot read overrides {}: {e}", path.display())))?;
        Self::from_csv(&text)
    }

    pub fn from_csv(text: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut table = Self::new();
        for row in reader.deserialize::<OverrideRow>() {
            let row = row?;
            table.insert(row.station, Coordinate::new(row.lng, row.lat));
        }
        Ok(table)
    }

    pub fn insert(&mut self, station: String, coordinate: Coordinate) {
        self.0.insert(station, coordinate);
    }

    pub fn get(&self, station: &str) -> Option<Coordinate> {
        self.0.get(station).copied()
    }

    pub fn contains(&self, station: &str) -> bool {
        self.0.contains_key(station)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Coordinate)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Coordinate)> for OverrideTable {
    fn from_iter<I: IntoIterator<Item = (String, Coordinate)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv() {
        let table = OverrideTable::from_csv(
            "station,lng,lat\n二道桥,87.623703,43.787407\n新固镇,116.330216,39.430955\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("二道桥"),
            Some(Coordinate::new(87.623703, 43.787407))
        );
        assert!(!table.contains("上高"));
    }

    #[test]
    fn test_from_csv_rejects_bad_number() {
        assert!(OverrideTable::from_csv("station,lng,lat\nA,east,1.0\n").is_err());
    }

    #[test]
    fn test_shipped_overrides_parse() {
        let table = OverrideTable::from_csv(include_str!("../../data/overrides.csv")).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.get("乌兰胡同"),
            Some(Coordinate::new(109.874717, 41.616407))
        );
    }
}
