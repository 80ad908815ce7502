use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc, Arc, Mutex,
    },
    thread,
    time::{Duration, Instant},
};

use super::*;
use crate::{
    geocode::{self, ReverseGeocodingGateway},
    location::{ConnectionEvent, ConnectionObserver, LocationGateway},
    prelude::*,
};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct FakeGeocoder {
    addresses: Mutex<Vec<Address>>,
    offline: bool,
    absent: bool,
    delay: Option<Duration>,
    lookups: AtomicUsize,
}

impl FakeGeocoder {
    fn with_addresses(addresses: Vec<Address>) -> Self {
        Self {
            addresses: Mutex::new(addresses),
            ..Default::default()
        }
    }

    fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    fn absent() -> Self {
        Self {
            absent: true,
            ..Default::default()
        }
    }

    fn delayed(addresses: Vec<Address>, delay: Duration) -> Self {
        Self {
            addresses: Mutex::new(addresses),
            delay: Some(delay),
            ..Default::default()
        }
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ReverseGeocodingGateway for FakeGeocoder {
    fn find_addresses(&self, pos: MapPoint, limit: usize) -> geocode::Result<Vec<Address>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if self.offline {
            return Err(geocode::Error::Unavailable(anyhow::anyhow!(
                "fake service offline"
            )));
        }
        if !pos.is_valid() {
            return Err(geocode::Error::InvalidPosition {
                lat: pos.lat,
                lng: pos.lng,
            });
        }
        Ok(self
            .addresses
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    fn is_available(&self) -> bool {
        !self.absent
    }
}

#[derive(Default)]
struct FakeLocations {
    connected: AtomicBool,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    fix: Mutex<Option<Location>>,
    observer: Mutex<Option<ConnectionObserver>>,
}

impl FakeLocations {
    fn with_fix(location: Location) -> Self {
        Self {
            fix: Mutex::new(Some(location)),
            ..Default::default()
        }
    }

    fn set_fix(&self, location: Location) {
        *self.fix.lock().unwrap() = Some(location);
    }

    /// Emits an event through the observer registered on connect.
    fn announce(&self, event: ConnectionEvent) {
        let observer = self.observer.lock().unwrap();
        observer.as_ref().expect("not connected")(event);
    }

    fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }
}

impl LocationGateway for FakeLocations {
    fn connect(&self, observer: ConnectionObserver) {
        self.connected.store(true, Ordering::SeqCst);
        self.connects.fetch_add(1, Ordering::SeqCst);
        observer(ConnectionEvent::Connected);
        *self.observer.lock().unwrap() = Some(observer);
    }

    fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn last_location(&self) -> Option<Location> {
        self.fix.lock().unwrap().clone()
    }
}

type TestScreen = Screen<FakeLocations, FakeGeocoder>;

fn new_screen(locations: &Arc<FakeLocations>, geocoder: &Arc<FakeGeocoder>) -> TestScreen {
    let _ = env_logger::builder().is_test(true).try_init();
    Screen::new(Arc::clone(locations), Arc::clone(geocoder), None)
}

fn address(lines: &[&str]) -> Address {
    Address::from(lines.iter().map(ToString::to_string).collect::<Vec<_>>())
}

fn stuttgart() -> Location {
    Location::from(MapPoint::new(48.77, 9.18))
}

fn wait_until_idle(screen: &mut TestScreen) {
    let deadline = Instant::now() + LOOKUP_TIMEOUT;
    while screen.view().busy {
        let now = Instant::now();
        assert!(now < deadline, "the lookup did not complete in time");
        screen.pump_wait(deadline - now);
    }
}

#[test]
fn initial_view_reflects_restored_state() {
    let locations = Arc::new(FakeLocations::default());
    let geocoder = Arc::new(FakeGeocoder::default());
    let restored = Snapshot {
        address_requested: true,
        address_output: "Milchstr. 1".to_string(),
    };
    let mut screen = Screen::new(Arc::clone(&locations), Arc::clone(&geocoder), Some(restored));
    assert!(screen.view().busy);
    assert!(!screen.view().trigger_enabled);
    assert_eq!(screen.view().address_text, "Milchstr. 1");
    assert!(screen.take_notice().is_none());
}

#[test]
fn snapshot_keeps_the_pending_request() {
    let locations = Arc::new(FakeLocations::default());
    let geocoder = Arc::new(FakeGeocoder::default());
    let mut screen = new_screen(&locations, &geocoder);
    assert!(!screen.snapshot().address_requested);
    // Triggering without a connection only records the wish.
    screen.handle(ScreenEvent::TriggerPressed);
    let snapshot = screen.snapshot();
    assert!(snapshot.address_requested);
    assert_eq!(snapshot.address_output, "");
    assert_eq!(geocoder.lookups(), 0);
}

#[test]
fn trigger_before_fix_runs_exactly_one_lookup() {
    let locations = Arc::new(FakeLocations::default());
    let geocoder = Arc::new(FakeGeocoder::with_addresses(vec![address(&[
        "Milchstr. 1",
        "70180 Stuttgart",
        "Germany",
    ])]));
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    screen.handle(ScreenEvent::TriggerPressed);
    assert!(screen.view().busy);
    assert!(!screen.view().trigger_enabled);
    assert_eq!(geocoder.lookups(), 0);

    // The fix arrives, the pending request fires automatically.
    locations.set_fix(stuttgart());
    locations.announce(ConnectionEvent::Connected);
    screen.pump();
    wait_until_idle(&mut screen);

    assert_eq!(screen.view().address_text, "Milchstr. 1\n70180 Stuttgart");
    assert!(screen.view().trigger_enabled);
    assert!(!screen.view().busy);
    assert_eq!(screen.take_notice(), Some(Notice::AddressFound));
    assert_eq!(geocoder.lookups(), 1);
    assert!(!screen.snapshot().address_requested);
}

#[test]
fn trigger_with_known_fix_starts_immediately() {
    let locations = Arc::new(FakeLocations::with_fix(stuttgart()));
    let geocoder = Arc::new(FakeGeocoder::with_addresses(vec![address(&[
        "Milchstr. 1",
        "70180 Stuttgart",
        "Germany",
    ])]));
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    assert_eq!(geocoder.lookups(), 0);

    screen.handle(ScreenEvent::TriggerPressed);
    wait_until_idle(&mut screen);
    assert_eq!(geocoder.lookups(), 1);
    assert_eq!(screen.view().address_text, "Milchstr. 1\n70180 Stuttgart");
}

#[test]
fn failed_lookup_reenables_the_trigger() {
    let locations = Arc::new(FakeLocations::with_fix(stuttgart()));
    let geocoder = Arc::new(FakeGeocoder::offline());
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    screen.handle(ScreenEvent::TriggerPressed);
    wait_until_idle(&mut screen);

    assert!(screen.view().trigger_enabled);
    assert!(!screen.view().busy);
    assert_eq!(screen.view().address_text, "");
    assert_eq!(
        screen.take_notice(),
        Some(Notice::LookupFailed("service not available".to_string()))
    );
    assert!(!screen.snapshot().address_requested);
}

#[test]
fn trigger_while_pending_starts_no_second_lookup() {
    let locations = Arc::new(FakeLocations::with_fix(stuttgart()));
    let geocoder = Arc::new(FakeGeocoder::delayed(
        vec![address(&["Milchstr. 1", "Germany"])],
        Duration::from_millis(50),
    ));
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    screen.handle(ScreenEvent::TriggerPressed);
    screen.handle(ScreenEvent::TriggerPressed);
    wait_until_idle(&mut screen);
    assert_eq!(geocoder.lookups(), 1);
}

#[test]
fn duplicate_connection_events_start_one_lookup() {
    let locations = Arc::new(FakeLocations::default());
    let geocoder = Arc::new(FakeGeocoder::delayed(
        vec![address(&["Milchstr. 1", "Germany"])],
        Duration::from_millis(50),
    ));
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    screen.handle(ScreenEvent::TriggerPressed);

    locations.set_fix(stuttgart());
    locations.announce(ConnectionEvent::Connected);
    locations.announce(ConnectionEvent::Connected);
    screen.pump();
    wait_until_idle(&mut screen);
    assert_eq!(geocoder.lookups(), 1);
}

#[test]
fn missing_geocoder_is_not_fatal() {
    let locations = Arc::new(FakeLocations::with_fix(stuttgart()));
    let geocoder = Arc::new(FakeGeocoder::absent());
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    assert_eq!(screen.take_notice(), Some(Notice::GeocoderUnavailable));
    // The screen stays usable.
    assert!(screen.view().trigger_enabled);
}

#[test]
fn suspended_connection_is_reestablished() {
    let locations = Arc::new(FakeLocations::default());
    let geocoder = Arc::new(FakeGeocoder::default());
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    assert_eq!(locations.connects(), 1);

    locations.announce(ConnectionEvent::Suspended);
    screen.pump();
    assert_eq!(locations.connects(), 2);
    assert!(locations.is_connected());
}

#[test]
fn hidden_disconnects_only_while_connected() {
    let locations = Arc::new(FakeLocations::default());
    let geocoder = Arc::new(FakeGeocoder::default());
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Hidden);
    assert_eq!(locations.disconnects(), 0);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    screen.handle(ScreenEvent::Hidden);
    assert_eq!(locations.disconnects(), 1);
}

#[test]
fn failed_connection_is_not_retried() {
    let locations = Arc::new(FakeLocations::default());
    let geocoder = Arc::new(FakeGeocoder::default());
    let mut screen = new_screen(&locations, &geocoder);

    screen.handle(ScreenEvent::Shown);
    screen.pump();
    locations.announce(ConnectionEvent::Failed);
    screen.pump();
    assert_eq!(locations.connects(), 1);
}

#[test]
fn lookup_without_location_reports_the_failure() {
    let geocoder = Arc::new(FakeGeocoder::default());
    let (tx, rx) = mpsc::channel();
    let handle = spawn_address_lookup(geocoder, None, tx);
    let event = rx.recv_timeout(LOOKUP_TIMEOUT).unwrap();
    assert_eq!(
        event,
        ScreenEvent::LookupCompleted(LookupOutcome::Failure(
            "no location data provided".to_string()
        ))
    );
    handle.join().unwrap();
}

#[test]
fn lookup_without_receiver_is_discarded() {
    let geocoder = Arc::new(FakeGeocoder::with_addresses(vec![address(&[
        "Milchstr. 1",
        "Germany",
    ])]));
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let handle = spawn_address_lookup(geocoder, Some(stuttgart()), tx);
    // The worker must not panic, the result is silently dropped.
    assert!(handle.join().is_ok());
}
