//! Gateway implementations for the external services consumed by
//! Whereabouts: reverse geocoders and location sources.

mod display_name;

pub mod file_location;
pub mod opencage;
pub mod openstreetmap;
pub mod static_location;

pub use self::{
    file_location::FileLocationSource, opencage::OpenCage, openstreetmap::OpenStreetMap,
    static_location::StaticLocationSource,
};
