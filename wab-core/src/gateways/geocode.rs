use thiserror::Error;

use crate::entities::{Address, MapPoint};

#[derive(Debug, Error)]
pub enum Error {
    /// The service could not be reached or did not respond.
    #[error("The geocoding service is not available")]
    Unavailable(#[source] anyhow::Error),

    /// The service rejected the coordinates.
    #[error("Position out of range: lat = {lat}, lng = {lng}")]
    InvalidPosition { lat: f64, lng: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Resolves coordinates into postal addresses.
pub trait ReverseGeocodingGateway {
    /// Returns up to `limit` candidate addresses for the given
    /// position, best match first.
    ///
    /// Coordinate range validation is up to the implementation,
    /// rejected input is reported as [`Error::InvalidPosition`].
    fn find_addresses(&self, pos: MapPoint, limit: usize) -> Result<Vec<Address>>;

    /// Whether the service is usable at all on this system.
    fn is_available(&self) -> bool {
        true
    }
}
