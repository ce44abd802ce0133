//! Telemetry
//!
//! Tracing subscriber setup for the binary. Library code only emits events;
//! installing a subscriber is left to the host process.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "synergy_scope=info";

/// Install the global subscriber. `RUST_LOG` overrides the default filter;
/// `json` switches to one JSON object per line.
pub fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = Registry::default().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).with_line_number(true))
            .try_init()?;
    }

    Ok(())
}
