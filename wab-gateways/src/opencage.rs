use geocoding::{Opencage, Point, Reverse};

use wab_core::gateways::geocode::{self, ReverseGeocodingGateway};
use wab_entities::{address::Address, geo::MapPoint};

use crate::display_name::address_from_display_name;

/// Reverse geocoding backed by the OpenCage Data API.
pub struct OpenCage {
    api_key: String,
}

impl OpenCage {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

impl ReverseGeocodingGateway for OpenCage {
    fn find_addresses(&self, pos: MapPoint, limit: usize) -> geocode::Result<Vec<Address>> {
        if !pos.is_valid() {
            return Err(geocode::Error::InvalidPosition {
                lat: pos.lat,
                lng: pos.lng,
            });
        }
        if limit == 0 {
            return Ok(vec![]);
        }
        let geocoder = Opencage::new(self.api_key.clone());
        // Point is (x, y), i.e. (lng, lat).
        let point = Point::new(pos.lng, pos.lat);
        match geocoder.reverse(&point) {
            Ok(Some(display_name)) => Ok(vec![address_from_display_name(&display_name)]),
            Ok(None) => Ok(vec![]),
            Err(err) => Err(geocode::Error::Unavailable(anyhow::anyhow!(
                "OpenCage request failed: {}",
                err
            ))),
        }
    }
}
