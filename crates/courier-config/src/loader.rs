use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, expansion or parsing
    /// fails, or validation rejects the result
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the connectivity probe is misconfigured
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_connectivity()?;
        Ok(())
    }

    fn validate_connectivity(&self) -> anyhow::Result<()> {
        let probe = &self.connectivity;

        if !probe.enabled {
            return Ok(());
        }

        if probe.probe_address.trim().is_empty() {
            anyhow::bail!("connectivity.probe_address must not be empty when the probe is enabled");
        }

        if probe.probe_timeout_ms == 0 {
            anyhow::bail!("connectivity.probe_timeout_ms must be greater than 0");
        }

        Ok(())
    }
}
