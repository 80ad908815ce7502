use std::sync::{
    mpsc::{self, Receiver, Sender},
    Arc,
};
use std::time::Duration;

use super::*;
use crate::{
    geocode::ReverseGeocodingGateway,
    location::{ConnectionEvent, ConnectionObserver, LocationGateway},
    snapshot::Snapshot,
    worker::spawn_address_lookup,
};

/// What the frontend renders: the state of the trigger control, the
/// busy indicator and the address text view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub trigger_enabled: bool,
    pub busy: bool,
    pub address_text: String,
}

/// Transient, non-blocking notifications shown once and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AddressFound,
    GeocoderUnavailable,
    LookupFailed(String),
}

/// Terminal outcome of one background lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Success(String),
    Failure(String),
}

/// Everything the screen reacts to. Events are handled serially on the
/// thread that pumps the screen, never concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// The user pressed the fetch-address trigger.
    TriggerPressed,
    /// The screen became visible.
    Shown,
    /// The screen is about to be hidden.
    Hidden,
    Connection(ConnectionEvent),
    LookupCompleted(LookupOutcome),
}

/// The main screen: owns the view state and orchestrates at most one
/// outstanding address lookup.
///
/// All mutable state is touched exclusively from the thread that calls
/// [`Screen::handle`] and [`Screen::pump`]; background work only sends
/// messages into the event channel.
pub struct Screen<L, G>
where
    L: LocationGateway + ?Sized,
    G: ReverseGeocodingGateway + Send + Sync + ?Sized + 'static,
{
    locations: Arc<L>,
    geocoder: Arc<G>,

    address_requested: bool,
    address_output: String,
    last_location: Option<Location>,
    lookup_in_flight: bool,

    view: ViewState,
    notice: Option<Notice>,

    events_tx: Sender<ScreenEvent>,
    events_rx: Receiver<ScreenEvent>,
}

impl<L, G> Screen<L, G>
where
    L: LocationGateway + ?Sized,
    G: ReverseGeocodingGateway + Send + Sync + ?Sized + 'static,
{
    pub fn new(locations: Arc<L>, geocoder: Arc<G>, restored: Option<Snapshot>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let mut screen = Self {
            locations,
            geocoder,
            address_requested: false,
            address_output: String::new(),
            last_location: None,
            lookup_in_flight: false,
            view: ViewState::default(),
            notice: None,
            events_tx,
            events_rx,
        };
        if let Some(restored) = restored {
            screen.address_requested = restored.address_requested;
            screen.address_output = restored.address_output;
        }
        screen.update_view();
        screen
    }

    /// A handle for delivering events from other threads, e.g. an
    /// input reader. Results of background lookups arrive through the
    /// same channel.
    pub fn sender(&self) -> Sender<ScreenEvent> {
        self.events_tx.clone()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Removes and returns the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// The state to carry over into a recreated screen.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            address_requested: self.address_requested,
            address_output: self.address_output.clone(),
        }
    }

    /// Handles a single event.
    pub fn handle(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::Shown => {
                self.locations.connect(self.connection_observer());
            }
            ScreenEvent::Hidden => {
                if self.locations.is_connected() {
                    self.locations.disconnect();
                }
            }
            ScreenEvent::TriggerPressed => self.on_trigger(),
            ScreenEvent::Connection(event) => self.on_connection(event),
            ScreenEvent::LookupCompleted(outcome) => self.on_lookup_completed(outcome),
        }
    }

    /// Drains and handles all pending events.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle(event);
        }
    }

    /// Blocks up to `timeout` for the next event, then drains whatever
    /// else is pending. Returns `true` if any event was handled.
    pub fn pump_wait(&mut self, timeout: Duration) -> bool {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle(event);
                self.pump();
                true
            }
            Err(_) => false,
        }
    }

    fn connection_observer(&self) -> ConnectionObserver {
        let events = self.events_tx.clone();
        Box::new(move |event| {
            // The receiving screen may already be gone.
            let _ = events.send(ScreenEvent::Connection(event));
        })
    }

    fn on_trigger(&mut self) {
        if self.locations.is_connected() && self.last_location.is_some() {
            self.start_lookup();
        }
        // Even without a fix: remember that a lookup is wanted as soon
        // as one arrives.
        self.address_requested = true;
        self.update_view();
    }

    fn on_connection(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => {
                self.last_location = self.locations.last_location();
                if self.last_location.is_some() {
                    if !self.geocoder.is_available() {
                        warn!("No geocoding service available on this system");
                        self.notice = Some(Notice::GeocoderUnavailable);
                    }
                    if self.address_requested {
                        self.start_lookup();
                    }
                }
            }
            ConnectionEvent::Suspended => {
                info!("Connection to the location source suspended, reconnecting");
                self.locations.connect(self.connection_observer());
            }
            ConnectionEvent::Failed => {
                info!("Connection to the location source failed");
            }
        }
    }

    fn start_lookup(&mut self) {
        if self.lookup_in_flight {
            debug!("A lookup is already in flight, not starting another one");
            return;
        }
        self.lookup_in_flight = true;
        spawn_address_lookup(
            Arc::clone(&self.geocoder),
            self.last_location.clone(),
            self.events_tx.clone(),
        );
    }

    fn on_lookup_completed(&mut self, outcome: LookupOutcome) {
        self.lookup_in_flight = false;
        // The trigger must come back after a failed lookup as well.
        self.address_requested = false;
        match outcome {
            LookupOutcome::Success(text) => {
                self.address_output = text;
                self.notice = Some(Notice::AddressFound);
            }
            LookupOutcome::Failure(message) => {
                self.notice = Some(Notice::LookupFailed(message));
            }
        }
        self.update_view();
    }

    fn update_view(&mut self) {
        self.view = ViewState {
            trigger_enabled: !self.address_requested,
            busy: self.address_requested,
            address_text: self.address_output.clone(),
        };
    }
}
