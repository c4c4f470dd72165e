use crate::config::Config;
use crate::error::{Error, Result};
use crate::geocode::{
    AmapGeocoder, BaiduGeocoder, Geocoder, POI_HIGH_SPEED_STATION, POI_TRAIN_STATION,
};
use crate::overrides::OverrideTable;
use crate::progress;
use crate::types::{Coordinate, StationUniverse};
use indicatif::ProgressIterator;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Station coordinates after every tier has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub coordinates: BTreeMap<String, Coordinate>,
    /// Names no tier resolved and no override covers, left for the operator.
    pub unresolved: Vec<String>,
}

/// Resolves station names by trying each geocoder tier in order.
///
/// The first tier that returns a location wins and later tiers never see the
/// name. Names listed in the override table skip the providers entirely.
pub struct Resolver {
    tiers: Vec<Box<dyn Geocoder>>,
    overrides: OverrideTable,
}

impl Resolver {
    pub fn new(tiers: Vec<Box<dyn Geocoder>>, overrides: OverrideTable) -> Self {
        Self { tiers, overrides }
    }

    /// AMap as a train station, AMap as a high-speed rail station, then Baidu.
    pub fn standard(config: &Config, overrides: OverrideTable) -> Result<Self> {
        let amap_key = config.amap_key()?.to_string();
        let baidu_ak = config.baidu_ak()?.to_string();

        let tiers: Vec<Box<dyn Geocoder>> = vec![
            Box::new(AmapGeocoder::new(
                config.amap_base_url.clone(),
                amap_key.clone(),
                POI_TRAIN_STATION,
                config.http_timeout,
            )?),
            Box::new(AmapGeocoder::new(
                config.amap_base_url.clone(),
                amap_key,
                POI_HIGH_SPEED_STATION,
                config.http_timeout,
            )?),
            Box::new(BaiduGeocoder::new(
                config.baidu_base_url.clone(),
                baidu_ak,
                config.http_timeout,
            )?),
        ];

        Ok(Self::new(tiers, overrides))
    }

    /// Resolves a single name; `None` when every tier comes up empty.
    pub async fn resolve(&self, station: &str) -> Option<Coordinate> {
        if let Some(coordinate) = self.overrides.get(station) {
            return Some(coordinate);
        }

        for tier in &self.tiers {
            if let Some(coordinate) = attempt(tier.as_ref(), station).await {
                return Some(coordinate);
            }
        }
        None
    }

    pub async fn resolve_all(&self, universe: &StationUniverse) -> Resolution {
        let mut coordinates = BTreeMap::new();
        let mut pending: Vec<String> = universe
            .iter()
            .filter(|name| !self.overrides.contains(name))
            .cloned()
            .collect();

        for tier in &self.tiers {
            if pending.is_empty() {
                break;
            }
            pending = run_tier(tier.as_ref(), pending, &mut coordinates).await;
        }

        for (name, coordinate) in self.overrides.iter() {
            if universe.contains(name) {
                coordinates.insert(name.clone(), *coordinate);
            }
        }

        info!(
            "Resolved {} of {} station(s), {} unresolved",
            coordinates.len(),
            universe.len(),
            pending.len()
        );

        Resolution {
            coordinates,
            unresolved: pending,
        }
    }
}

/// Runs one tier over the work queue and returns the names it could not place.
async fn run_tier(
    tier: &dyn Geocoder,
    pending: Vec<String>,
    coordinates: &mut BTreeMap<String, Coordinate>,
) -> Vec<String> {
    let total = pending.len();
    let mut remaining = Vec::new();

    for station in pending
        .into_iter()
        .progress_with_style(progress::style())
        .with_message(format!("Geocoding via {}", tier.label()))
    {
        match attempt(tier, &station).await {
            Some(coordinate) => {
                coordinates.insert(station, coordinate);
            }
            None => remaining.push(station),
        }
    }

    info!(
        "Tier {} resolved {} of {} station(s)",
        tier.label(),
        total - remaining.len(),
        total
    );
    remaining
}

async fn attempt(tier: &dyn Geocoder, station: &str) -> Option<Coordinate> {
    match tier.geocode(station).await {
        Ok(coordinate) => Some(coordinate),
        Err(Error::NoMatch(query)) => {
            debug!("{}: no match for {}", tier.label(), query);
            None
        }
        Err(e) => {
            warn!("{}: lookup of {} failed: {}", tier.label(), station, e);
            None
        }
    }
}
