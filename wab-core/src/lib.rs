//! Core domain logic for Whereabouts: abstractions over the external
//! location and geocoding services and the address-resolution use case
//! built on top of them.

pub mod entities {
    pub use wab_entities::{address::*, geo::*, location::*};
}

pub mod gateways;
pub mod usecases;
