//! Tracing subscriber setup

use cg_shared::ProcessConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level when set. Production emits
/// one JSON object per event.
pub fn init_tracing(config: &ProcessConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level().as_filter_directive()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.environment().is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
