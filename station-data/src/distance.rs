//! Planar distances between stations in Web Mercator (EPSG:3857).
//!
//! The projection stretches distances by roughly `1 / cos(latitude)`, so the
//! figures are only comparable between stations at similar latitudes.

use crate::error::{Error, Result};
use crate::types::{Coordinate, StationTable};
use geo::{EuclideanDistance, Point};
use std::f64::consts::PI;

/// Sphere radius used by EPSG:3857, in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Projects to EPSG:3857 metres, `x` east and `y` north.
pub fn project(coordinate: Coordinate) -> Point {
    let lat = coordinate.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = EARTH_RADIUS_M * coordinate.lng.to_radians();
    let y = EARTH_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    Point::new(x, y)
}

/// Euclidean distance in metres between the projected points.
pub fn planar_distance(a: Coordinate, b: Coordinate) -> f64 {
    project(a).euclidean_distance(&project(b))
}

/// Distance between two named stations of the table.
pub fn station_distance(table: &StationTable, a: &str, b: &str) -> Result<f64> {
    let lookup = |name: &str| {
        table
            .coordinate(name)
            .ok_or_else(|| Error::UnknownStation(name.to_string()))
    };
    Ok(planar_distance(lookup(a)?, lookup(b)?))
}
