use indexmap::IndexMap;
use serde::Deserialize;

/// Settings for the `reqwest`-backed transport
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// `User-Agent` sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// TCP connect timeout, separate from the per-call deadline
    #[serde(default)]
    pub connect_timeout_seconds: Option<u64>,
    /// Headers added to every request before the descriptor's own headers
    #[serde(default)]
    pub default_headers: IndexMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_seconds: None,
            default_headers: IndexMap::new(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("courier/", env!("CARGO_PKG_VERSION")).to_string()
}
