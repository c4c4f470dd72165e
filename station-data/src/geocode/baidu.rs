use super::{Geocoder, build_client};
use crate::error::{Error, Result};
use crate::types::Coordinate;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const HIGH_SPEED_SUFFIX: &str = "高铁站";
const STATUS_OK: i64 = 0;

/// Baidu geocoding v3, queried as `<name>高铁站`.
pub struct BaiduGeocoder {
    client: Client,
    base_url: String,
    ak: String,
}

impl BaiduGeocoder {
    pub fn new(base_url: String, ak: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            ak,
        })
    }

    async fn fetch(&self, station: &str) -> Result<Coordinate> {
        let url = format!("{}/geocoding/v3/", self.base_url.trim_end_matches('/'));
        let address = format!("{station}{HIGH_SPEED_SUFFIX}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("address", address.as_str()),
                ("ak", self.ak.as_str()),
                ("output", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::InvalidResponse(format!(
                "HTTP {} for url={}",
                response.status(),
                url
            )));
        }

        let body = response.text().await?;
        debug!("Baidu geocode response for {}: {}", address, body);

        parse_geocode_json(&body, &address)
    }
}

impl Geocoder for BaiduGeocoder {
    fn label(&self) -> &str {
        "baidu/高铁站"
    }

    fn geocode<'a>(&'a self, station: &'a str) -> BoxFuture<'a, Result<Coordinate>> {
        self.fetch(station).boxed()
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    location: Coordinate,
}

/// Status `0` carries `result.location`; every other status means nothing usable was found.
pub fn parse_geocode_json(body: &str, query: &str) -> Result<Coordinate> {
    let response: GeocodeResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("Baidu JSON error: {e}")))?;

    if response.status != STATUS_OK {
        debug!(
            "Baidu status {} for {}: {}",
            response.status,
            query,
            response.message.unwrap_or_default()
        );
        return Err(Error::NoMatch(query.to_string()));
    }

    let result = response
        .result
        .ok_or_else(|| Error::Parse("Baidu response without result".to_string()))?;

    serde_json::from_value::<GeocodeResult>(result)
        .map(|r| r.location)
        .map_err(|e| Error::Parse(format!("Baidu result error: {e}")))
}
