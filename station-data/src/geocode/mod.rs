//! Forward and reverse geocoding against the third-party map APIs.
//!
//! Every provider answers with either a location or a failure; how a
//! provider signals "nothing found" is part of its own response schema and is
//! translated to [`Error::NoMatch`](crate::error::Error::NoMatch) here.

mod amap;
mod baidu;

pub use amap::{AmapGeocoder, AmapReverseGeocoder, POI_HIGH_SPEED_STATION, POI_TRAIN_STATION};
pub use baidu::BaiduGeocoder;

use crate::crawler::USER_AGENT;
use crate::error::{Error, Result};
use crate::types::Coordinate;
use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;

/// A forward geocoder tried as one tier of the resolver.
pub trait Geocoder: Send + Sync {
    /// Short name used in logs.
    fn label(&self) -> &str;

    fn geocode<'a>(&'a self, station: &'a str) -> BoxFuture<'a, Result<Coordinate>>;
}

/// HTTP client shared by every provider: request timeout and a browser User-Agent.
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(Error::Http)
}
