use thiserror::Error;

use crate::gateways::geocode;

/// Failure classification for an address lookup. The `Display`
/// strings are the user-visible messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no location data provided")]
    NoLocation,
    #[error("service not available")]
    ServiceNotAvailable,
    #[error("invalid latitude/longitude specified")]
    InvalidLatLng,
    #[error("no address found")]
    NoAddressFound,
}

impl From<geocode::Error> for Error {
    fn from(err: geocode::Error) -> Self {
        match err {
            geocode::Error::Unavailable(_) => Self::ServiceNotAvailable,
            geocode::Error::InvalidPosition { .. } => Self::InvalidLatLng,
        }
    }
}
