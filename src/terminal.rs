use std::{
    fs,
    io::{self, BufRead},
    path::Path,
    sync::{
        mpsc::{self, Sender},
        Arc,
    },
    thread,
};

use anyhow::{Context, Result};

use wab_application::prelude::*;
use wab_core::gateways::{geocode::ReverseGeocodingGateway, location::LocationGateway};

use crate::cfg::Cfg;

pub type DynLocations = dyn LocationGateway + Send + Sync;
pub type DynGeocoder = dyn ReverseGeocodingGateway + Send + Sync;

/// Drives the screen in the terminal: stdin commands act as the
/// trigger control, stdout is the display.
pub fn run(cfg: &Cfg, locations: Arc<DynLocations>, geocoder: Arc<DynGeocoder>) -> Result<()> {
    let restored = load_snapshot(&cfg.state_file)?;
    let mut screen = Screen::new(Arc::clone(&locations), geocoder, restored);

    let (quit_tx, quit_rx) = mpsc::channel();
    spawn_input_reader(screen.sender(), quit_tx);

    println!("Commands: <Enter>/fetch = look up the address of the current position, quit = exit.");
    screen.handle(ScreenEvent::Shown);
    screen.pump();
    let mut last_view = screen.view().clone();
    render(&last_view);

    loop {
        if quit_rx.try_recv().is_ok() {
            break;
        }
        locations.poll();
        screen.pump_wait(cfg.poll_interval);
        if let Some(notice) = screen.take_notice() {
            show_notice(&notice);
        }
        if *screen.view() != last_view {
            last_view = screen.view().clone();
            render(&last_view);
        }
    }

    screen.handle(ScreenEvent::Hidden);
    save_snapshot(&cfg.state_file, &screen.snapshot())
}

fn spawn_input_reader(events: Sender<ScreenEvent>, quit: Sender<()>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "" | "f" | "fetch" => {
                    if events.send(ScreenEvent::TriggerPressed).is_err() {
                        break;
                    }
                }
                "q" | "quit" | "exit" => break,
                unknown => println!("Unknown command: {}", unknown),
            }
        }
        let _ = quit.send(());
    });
}

fn render(view: &ViewState) {
    if view.busy {
        println!("[busy] looking up the address …");
    } else if view.address_text.is_empty() {
        println!("[ready] no address yet");
    } else {
        println!("[ready]");
        for line in view.address_text.lines() {
            println!("    {}", line);
        }
    }
}

fn show_notice(notice: &Notice) {
    match notice {
        Notice::AddressFound => println!("(address found)"),
        Notice::GeocoderUnavailable => println!("(no geocoding service available)"),
        Notice::LookupFailed(message) => println!("(lookup failed: {})", message),
    }
}

fn load_snapshot(path: &Path) -> Result<Option<Snapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Unable to read the screen state from {}", path.display()))?;
    match toml::from_str(&contents) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(err) => {
            log::warn!(
                "Ignoring unreadable screen state in {}: {}",
                path.display(),
                err
            );
            Ok(None)
        }
    }
}

fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let contents = toml::to_string(snapshot)?;
    fs::write(path, contents)
        .with_context(|| format!("Unable to save the screen state to {}", path.display()))
}
