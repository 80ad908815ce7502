#![deny(missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

//! # wab-entities
//!
//! Reusable, agnostic domain entities for Whereabouts.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod address;
pub mod geo;
pub mod location;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
