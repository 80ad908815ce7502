use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use serde::Deserialize;
use time::OffsetDateTime;

use wab_core::gateways::location::{ConnectionEvent, ConnectionObserver, LocationGateway};
use wab_entities::{geo::MapPoint, location::Location};

/// The most recent fix, as maintained by an external locator process.
#[derive(Debug, Deserialize)]
struct FixRecord {
    lat: f64,
    lng: f64,
    #[serde(default)]
    accuracy_m: Option<f64>,
    /// Unix timestamp in seconds.
    #[serde(default)]
    time: Option<i64>,
}

impl From<FixRecord> for Location {
    fn from(record: FixRecord) -> Self {
        let FixRecord {
            lat,
            lng,
            accuracy_m,
            time,
        } = record;
        Self {
            pos: MapPoint::new(lat, lng),
            accuracy_m,
            time: time.and_then(|seconds| OffsetDateTime::from_unix_timestamp(seconds).ok()),
        }
    }
}

/// Position fixes read from a JSON file that an external locator
/// daemon keeps up to date.
pub struct FileLocationSource {
    path: PathBuf,
    connected: AtomicBool,
    reachable: AtomicBool,
    observer: Mutex<Option<ConnectionObserver>>,
}

impl FileLocationSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            connected: AtomicBool::new(false),
            reachable: AtomicBool::new(false),
            observer: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_fix(&self) -> anyhow::Result<Location> {
        let file = File::open(&self.path)?;
        let record: FixRecord = serde_json::from_reader(file)?;
        Ok(record.into())
    }

    fn notify(&self, event: ConnectionEvent) {
        let observer = self.observer.lock().unwrap();
        if let Some(observer) = &*observer {
            observer(event);
        }
    }
}

impl LocationGateway for FileLocationSource {
    fn connect(&self, observer: ConnectionObserver) {
        if self.path.is_dir() {
            log::warn!(
                "Fix file {} is a directory, unable to connect",
                self.path.display()
            );
            observer(ConnectionEvent::Failed);
            return;
        }
        self.connected.store(true, Ordering::SeqCst);
        self.reachable
            .store(self.path.exists(), Ordering::SeqCst);
        observer(ConnectionEvent::Connected);
        *self.observer.lock().unwrap() = Some(observer);
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        *self.observer.lock().unwrap() = None;
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn last_location(&self) -> Option<Location> {
        if !self.is_connected() {
            return None;
        }
        match self.read_fix() {
            Ok(location) => Some(location),
            Err(err) => {
                log::debug!("No usable fix in {}: {}", self.path.display(), err);
                None
            }
        }
    }

    /// Reports when the fix file vanishes or comes back.
    fn poll(&self) {
        if !self.is_connected() {
            return;
        }
        let reachable = self.path.exists();
        let was_reachable = self.reachable.swap(reachable, Ordering::SeqCst);
        match (was_reachable, reachable) {
            (true, false) => {
                log::warn!("Fix file {} disappeared", self.path.display());
                self.notify(ConnectionEvent::Suspended);
            }
            (false, true) => self.notify(ConnectionEvent::Connected),
            _ => (),
        }
    }
}
