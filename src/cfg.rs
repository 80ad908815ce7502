use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_LOCATION_FILE: &str = "whereabouts-fix.json";
const DEFAULT_STATE_FILE: &str = "whereabouts-state.toml";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Cfg {
    /// JSON file with the current fix, maintained by a locator daemon.
    pub location_file: PathBuf,

    /// Where the screen state is kept across runs.
    pub state_file: PathBuf,

    /// How often the location source is polled for changes.
    #[serde(deserialize_with = "duration_str::deserialize_duration")]
    pub poll_interval: Duration,

    pub opencage_api_key: Option<String>,
}

impl Cfg {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).with_context(|| {
                    format!("Unable to read configuration from {}", path.display())
                })?;
                toml::from_str(&contents).with_context(|| {
                    format!("Unable to parse configuration in {}", path.display())
                })?
            }
            None => Self::default(),
        };
        cfg.apply_env();
        if cfg.opencage_api_key.is_none() {
            log::warn!("No OpenCage API key found");
        }
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(file) = env::var("WHEREABOUTS_LOCATION_FILE") {
            self.location_file = file.into();
        }
        if let Ok(file) = env::var("WHEREABOUTS_STATE_FILE") {
            self.state_file = file.into();
        }
        if let Ok(interval) = env::var("WHEREABOUTS_POLL_INTERVAL") {
            match duration_str::parse(&interval) {
                Ok(interval) => self.poll_interval = interval,
                Err(err) => log::warn!("Ignoring invalid WHEREABOUTS_POLL_INTERVAL: {}", err),
            }
        }
        if let Ok(key) = env::var("OPENCAGE_API_KEY") {
            self.opencage_api_key = Some(key);
        }
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            location_file: DEFAULT_LOCATION_FILE.into(),
            state_file: DEFAULT_STATE_FILE.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            opencage_api_key: None,
        }
    }
}
