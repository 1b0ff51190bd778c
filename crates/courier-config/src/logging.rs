use serde::Deserialize;

/// Whether diagnostic request/response logging is emitted
///
/// Mirrors a debug/release build switch but can be overridden from config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    Debug,
    Release,
}

impl LogMode {
    /// Mode implied by the current build profile
    pub const fn from_build() -> Self {
        if cfg!(debug_assertions) { Self::Debug } else { Self::Release }
    }

    pub const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

impl Default for LogMode {
    fn default() -> Self {
        Self::from_build()
    }
}

/// Output format for the fmt layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Debug/release gating for request and response logging
    #[serde(default)]
    pub mode: LogMode,
    /// `EnvFilter` directive
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            mode: LogMode::default(),
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}
