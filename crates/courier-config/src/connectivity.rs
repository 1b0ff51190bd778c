use serde::Deserialize;

/// Pre-flight reachability probe configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectivityConfig {
    /// When disabled every call is treated as online
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// `host:port` the probe opens a TCP connection to
    #[serde(default = "default_probe_address")]
    pub probe_address: String,
    /// How long the probe waits for the connection
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            probe_address: default_probe_address(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_probe_address() -> String {
    "1.1.1.1:53".to_string()
}

const fn default_probe_timeout_ms() -> u64 {
    1500
}
