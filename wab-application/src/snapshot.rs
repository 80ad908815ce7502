use serde::{Deserialize, Serialize};

/// Screen state that survives a destroy/recreate cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snapshot {
    pub address_requested: bool,
    pub address_output: String,
}
