//! Configuration for the elevated operation gateway

use std::time::Duration;

/// Default bound on every provider call
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Default listing page size
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size requested from the provider
pub const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bound on each provider round trip
    pub provider_timeout: Duration,
    pub page_size: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
