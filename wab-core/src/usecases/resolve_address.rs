use super::prelude::*;
use crate::gateways::geocode::ReverseGeocodingGateway;

/// Separator between the lines of a formatted address.
const LINE_SEPARATOR: &str = "\n";

/// Resolves a position fix into a single formatted address.
///
/// Exactly one outcome per call: either the joined display lines of
/// the best match or the failure classifying why no address is
/// available. No retries.
pub fn resolve_address<G>(geocoder: &G, location: Option<&Location>) -> Result<String>
where
    G: ReverseGeocodingGateway + ?Sized,
{
    let Some(location) = location else {
        log::error!("No location data provided, nothing to resolve");
        return Err(Error::NoLocation);
    };
    let MapPoint { lat, lng } = location.pos;
    let addresses = match geocoder.find_addresses(location.pos, 1) {
        Ok(addresses) => addresses,
        Err(err @ geocode::Error::Unavailable(_)) => {
            log::error!("Reverse geocoding failed: {}", err);
            return Err(err.into());
        }
        Err(err @ geocode::Error::InvalidPosition { .. }) => {
            log::error!("Reverse geocoding rejected lat = {}, lng = {}", lat, lng);
            return Err(err.into());
        }
    };
    let Some(address) = addresses.first() else {
        log::warn!("No address found for {},{}", lat, lng);
        return Err(Error::NoAddressFound);
    };
    log::info!("Address found for {},{}", lat, lng);
    Ok(joined_lines(address))
}

/// Joins the display lines of an address into a single string.
// The final line is not part of the formatted output.
pub fn joined_lines(address: &Address) -> String {
    let end = address.lines.len().saturating_sub(1);
    address.lines[..end].join(LINE_SEPARATOR)
}
