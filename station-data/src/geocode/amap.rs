use super::{Geocoder, build_client};
use crate::error::{Error, Result};
use crate::types::{Address, Coordinate};
use futures::FutureExt;
use futures::future::BoxFuture;
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::debug;

pub const POI_TRAIN_STATION: &str = "火车站";
pub const POI_HIGH_SPEED_STATION: &str = "高铁站";

const STATION_SUFFIX: &str = "站";
const STATUS_OK: &str = "1";

/// AMap forward geocoding restricted to one POI type.
pub struct AmapGeocoder {
    client: Client,
    base_url: String,
    key: String,
    poi_type: String,
    label: String,
}

impl AmapGeocoder {
    pub fn new(base_url: String, key: String, poi_type: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            key,
            poi_type: poi_type.to_string(),
            label: format!("amap/{poi_type}"),
        })
    }

    async fn fetch(&self, station: &str) -> Result<Coordinate> {
        let url = format!("{}/v3/geocode/geo", self.base_url.trim_end_matches('/'));
        let address = format!("{station}{STATION_SUFFIX}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("address", address.as_str()),
                ("poitype", self.poi_type.as_str()),
                ("output", "XML"),
                ("key", self.key.as_str()),
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

        let xml = response.text().await?;
        debug!("AMap geocode response for {}: {}", address, xml);

        parse_geocode_xml(&xml)?.ok_or(Error::NoMatch(address))
    }
}

impl Geocoder for AmapGeocoder {
    fn label(&self) -> &str {
        &self.label
    }

    fn geocode<'a>(&'a self, station: &'a str) -> BoxFuture<'a, Result<Coordinate>> {
        self.fetch(station).boxed()
    }
}

/// Returns the first `<location>` of an AMap XML geocode response.
///
/// A response without a location, or with an empty one, has no match.
pub fn parse_geocode_xml(xml: &str) -> Result<Option<Coordinate>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut status = None;
    let mut info = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"status" if status.is_none() => status = Some(read_text(&mut reader)?),
                b"info" if info.is_none() => info = Some(read_text(&mut reader)?),
                b"location" => {
                    let text = read_text(&mut reader)?;
                    if text.is_empty() {
                        return Ok(None);
                    }
                    return Coordinate::parse_pair(&text).map(Some);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Parse(format!("XML error: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    match status.as_deref() {
        Some(s) if s != STATUS_OK => Err(Error::InvalidResponse(format!(
            "AMap status {s}: {}",
            info.unwrap_or_default()
        ))),
        _ => Ok(None),
    }
}

fn read_text(reader: &mut Reader<&[u8]>) -> Result<String> {
    let mut buf = Vec::new();
    match reader.read_event_into(&mut buf) {
        Ok(Event::Text(e)) => e
            .unescape()
            .map(|s| s.to_string())
            .map_err(|e| Error::Parse(format!("Text unescape error: {e}"))),
        _ => Ok(String::new()),
    }
}

/// AMap reverse geocoding: coordinate to province/city/district.
pub struct AmapReverseGeocoder {
    client: Client,
    base_url: String,
    key: String,
}

impl AmapReverseGeocoder {
    pub fn new(base_url: String, key: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            key,
        })
    }

    pub async fn reverse(&self, coordinate: Coordinate) -> Result<Address> {
        let url = format!("{}/v3/geocode/regeo", self.base_url.trim_end_matches('/'));
        let location = coordinate.to_query();

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.key.as_str()), ("location", location.as_str())])
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
        debug!("AMap regeo response for {}: {}", location, body);

        parse_regeo_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RegeoResponse {
    status: String,
    #[serde(default)]
    info: String,
    regeocode: Option<Regeocode>,
}

#[derive(Debug, Deserialize)]
struct Regeocode {
    #[serde(rename = "addressComponent")]
    address_component: AddressComponent,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    #[serde(default, deserialize_with = "text_or_empty")]
    province: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    city: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    district: String,
}

/// AMap sends `[]` instead of a string for components that do not apply.
fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Other(#[allow(dead_code)] serde_json::Value),
    }

    Ok(match Field::deserialize(deserializer)? {
        Field::Text(s) => s,
        Field::Other(_) => String::new(),
    })
}

/// Parses a regeo response. Municipalities report no city, so the province stands in.
pub fn parse_regeo_json(body: &str) -> Result<Address> {
    let response: RegeoResponse = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("Regeo JSON error: {e}")))?;

    if response.status != STATUS_OK {
        return Err(Error::InvalidResponse(format!(
            "AMap status {}: {}",
            response.status, response.info
        )));
    }

    let component = response
        .regeocode
        .ok_or_else(|| Error::Parse("Regeo response without regeocode".to_string()))?
        .address_component;

    let city = if component.city.is_empty() {
        component.province.clone()
    } else {
        component.city
    };

    Ok(Address {
        province: component.province,
        city,
        district: component.district,
    })
}
