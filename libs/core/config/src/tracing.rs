//! Subscriber setup shared by every binary in the workspace.

use crate::Environment;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the color-eyre report hook.
///
/// Call first thing in `main`. A second install is ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Directives used when `RUST_LOG` is not set.
///
/// ```
/// use core_config::{tracing::default_directives, Environment};
///
/// assert!(default_directives(&Environment::Production).starts_with("info"));
/// ```
pub fn default_directives(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "info,tower_http=info,mongodb=warn"
    } else {
        "debug,tower_http=debug,mongodb=info,hyper=info"
    }
}

/// Install the global subscriber with span-trace capture for eyre reports.
///
/// Production (`APP_ENV=production`) logs flattened JSON lines; everything
/// else gets the pretty multi-line format. `RUST_LOG` overrides
/// [`default_directives`], e.g. `RUST_LOG=marketplace_api=trace,query_pipeline=debug`.
///
/// Returns `false` when a subscriber was already installed, which happens
/// when tests call this repeatedly.
///
/// ```ignore
/// install_color_eyre();
/// let config = Config::from_env()?;
/// init_tracing(&config.environment);
/// ```
pub fn init_tracing(environment: &Environment) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let registry = tracing_subscriber::registry()
        .with(tracing_error::ErrorLayer::default())
        .with(filter);

    let installed = if environment.is_production() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!(environment = ?environment, "Tracing initialized");
    } else {
        tracing::debug!("Tracing already initialized");
    }
    installed
}
