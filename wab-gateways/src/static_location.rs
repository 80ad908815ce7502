use std::sync::atomic::{AtomicBool, Ordering};

use wab_core::gateways::location::{ConnectionEvent, ConnectionObserver, LocationGateway};
use wab_entities::location::Location;

/// A fixed position, for demos and command line overrides.
#[derive(Debug)]
pub struct StaticLocationSource {
    fix: Location,
    connected: AtomicBool,
}

impl StaticLocationSource {
    pub fn new(fix: Location) -> Self {
        Self {
            fix,
            connected: AtomicBool::new(false),
        }
    }
}

impl LocationGateway for StaticLocationSource {
    fn connect(&self, observer: ConnectionObserver) {
        self.connected.store(true, Ordering::SeqCst);
        observer(ConnectionEvent::Connected);
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn last_location(&self) -> Option<Location> {
        self.is_connected().then(|| self.fix.clone())
    }
}
