use crate::geocode::AmapReverseGeocoder;
use crate::progress;
use crate::types::{Coordinate, StationTable};
use indicatif::ProgressIterator;
use tracing::{info, warn};

/// Fills in the administrative address of every station that has a coordinate.
///
/// Stations whose lookup fails keep an empty address and are returned, in
/// table order, for the operator to re-run.
pub async fn annotate_addresses(
    geocoder: &AmapReverseGeocoder,
    table: &mut StationTable,
) -> Vec<String> {
    let targets: Vec<(String, Coordinate)> = table
        .resolved()
        .map(|(name, coordinate)| (name.clone(), coordinate))
        .collect();

    let mut unresolved = Vec::new();
    for (name, coordinate) in targets
        .into_iter()
        .progress_with_style(progress::style())
        .with_message("Reverse geocoding")
    {
        match geocoder.reverse(coordinate).await {
            Ok(address) => table.set_address(&name, address),
            Err(e) => {
                warn!("Reverse geocoding of {} failed: {}", name, e);
                unresolved.push(name);
            }
        }
    }

    info!(
        "Addressed {} station(s), {} unresolved",
        table.iter().filter(|(_, s)| s.address.is_some()).count(),
        unresolved.len()
    );
    unresolved
}
