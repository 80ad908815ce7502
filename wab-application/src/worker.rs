use std::{
    sync::{mpsc::Sender, Arc},
    thread,
};

use super::*;
use crate::{
    geocode::ReverseGeocodingGateway,
    screen::{LookupOutcome, ScreenEvent},
};

/// Runs exactly one reverse-geocode lookup on its own thread and
/// delivers exactly one [`ScreenEvent::LookupCompleted`] message.
///
/// No retries, no timeout, no cancellation: the thread ends after the
/// single blocking service call.
pub fn spawn_address_lookup<G>(
    geocoder: Arc<G>,
    location: Option<Location>,
    results: Sender<ScreenEvent>,
) -> thread::JoinHandle<()>
where
    G: ReverseGeocodingGateway + Send + Sync + ?Sized + 'static,
{
    thread::spawn(move || {
        let outcome = match usecases::resolve_address(&*geocoder, location.as_ref()) {
            Ok(text) => LookupOutcome::Success(text),
            Err(err) => LookupOutcome::Failure(err.to_string()),
        };
        if results.send(ScreenEvent::LookupCompleted(outcome)).is_err() {
            error!("No receiver for the lookup result, nowhere to deliver it");
        }
    })
}
