#![allow(clippy::must_use_candidate)]

//! Configuration for the Courier HTTP dispatcher
//!
//! Every default that a call falls back on (method, timeout, log gating)
//! lives here rather than in process-wide globals

pub mod connectivity;
mod env;
pub mod http;
mod loader;
pub mod logging;
pub mod request;

use serde::Deserialize;

pub use connectivity::*;
pub use http::*;
pub use logging::*;
pub use request::*;

/// Top-level Courier configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Per-request defaults
    #[serde(default)]
    pub request: RequestDefaults,
    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Pre-flight connectivity probe
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
