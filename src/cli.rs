use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};

use wab_core::usecases;
use wab_entities::{geo::MapPoint, location::Location};
use wab_gateways::{FileLocationSource, OpenCage, OpenStreetMap, StaticLocationSource};

use crate::{
    cfg::Cfg,
    terminal::{self, DynGeocoder, DynLocations},
};

#[derive(Debug, Parser)]
#[command(about, version)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive screen in the terminal (default).
    Run {
        /// JSON file with the current fix, maintained by a locator
        /// daemon.
        #[arg(long, value_name = "FILE")]
        location_file: Option<PathBuf>,

        /// Use a fixed position instead of the locator file.
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Resolve a single position to an address and exit.
    Resolve {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let cfg = Cfg::load(args.config.as_deref())?;
    let command = args.command.unwrap_or(Command::Run {
        location_file: None,
        lat: None,
        lng: None,
    });
    match command {
        Command::Run {
            location_file,
            lat,
            lng,
        } => {
            let locations: Arc<DynLocations> = match (lat, lng) {
                (Some(lat), Some(lng)) => Arc::new(StaticLocationSource::new(Location::from(
                    MapPoint::new(lat, lng),
                ))),
                _ => Arc::new(FileLocationSource::new(
                    location_file.unwrap_or_else(|| cfg.location_file.clone()),
                )),
            };
            terminal::run(&cfg, locations, geocoder(&cfg))
        }
        Command::Resolve { lat, lng } => resolve(&cfg, MapPoint::new(lat, lng)),
    }
}

fn geocoder(cfg: &Cfg) -> Arc<DynGeocoder> {
    match &cfg.opencage_api_key {
        Some(key) => Arc::new(OpenCage::new(key.clone())),
        None => {
            log::info!("Falling back to the public Nominatim geocoder");
            Arc::new(OpenStreetMap)
        }
    }
}

fn resolve(cfg: &Cfg, pos: MapPoint) -> Result<()> {
    let geocoder = geocoder(cfg);
    let location = Location::from(pos);
    let address = usecases::resolve_address(&*geocoder, Some(&location))?;
    println!("{}", address);
    Ok(())
}
