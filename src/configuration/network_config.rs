use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct NetworkConfig {
    /// Seconds between wifi scans, no periodic scanning when unset.
    pub scan_interval: Option<u64>,
}
