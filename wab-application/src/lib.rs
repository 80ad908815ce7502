//! Orchestration layer for Whereabouts: the screen state machine, the
//! background address-lookup worker, and the saved-state snapshot.

#[macro_use]
extern crate log;

mod screen;
mod snapshot;
mod worker;

pub mod prelude {
    pub use super::{screen::*, snapshot::*, worker::*};
}

pub(crate) use wab_core::{entities::*, gateways::*, usecases};

#[cfg(test)]
pub(crate) mod tests;
