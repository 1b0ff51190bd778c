//! Pre-flight reachability checks

use std::time::Duration;

use async_trait::async_trait;
use courier_config::ConnectivityConfig;
use tokio::net::TcpStream;

/// Answers whether the network is currently reachable
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Reports online unconditionally; used when probing is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

#[async_trait]
impl Connectivity for AlwaysOnline {
    async fn is_online(&self) -> bool {
        true
    }
}

/// Considers the network online when a TCP connection to a known address
/// completes within the probe timeout
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ConnectivityConfig) -> Self {
        Self::new(
            config.probe_address.clone(),
            Duration::from_millis(config.probe_timeout_ms),
        )
    }
}

#[async_trait]
impl Connectivity for TcpProbe {
    async fn is_online(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!(address = %self.address, error = %e, "connectivity probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(address = %self.address, "connectivity probe timed out");
                false
            }
        }
    }
}
