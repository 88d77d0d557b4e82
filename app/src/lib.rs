//! Partscan Application Shell
//!
//! Command line entry points, the lookup route server and the terminal
//! front end of the scan session. Core logic lives in the `crates/`
//! directory.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod commands;
pub mod input;
pub mod server;
pub mod terminal;

use anyhow::Context;
use partscan_core::AppConfig;
use partscan_lookup::{HttpPartClient, PartLookup, SheetLookup, SheetsSource};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Initialize tracing subscriber for logging.
///
/// Logs go to stderr so command output on stdout stays machine readable.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,partscan=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load the configuration file, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => {
            let mut config = AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => AppConfig::load_with_env().context("failed to load config")?,
    };
    config.validate()?;
    Ok(config)
}

/// Lookup backend: the remote route, or the spreadsheet directly.
pub fn build_lookup(config: &AppConfig, direct: bool) -> anyhow::Result<Arc<dyn PartLookup>> {
    if direct {
        let source = SheetsSource::from_config(
            &config.sheets,
            Duration::from_secs(config.lookup.timeout_secs),
        )?;
        tracing::debug!(sheet = %config.sheets.sheet_name, "Resolving parts directly against the sheet");
        Ok(Arc::new(SheetLookup::new(source)))
    } else {
        tracing::debug!(url = %config.lookup.api_base_url, "Resolving parts through the lookup route");
        Ok(Arc::new(HttpPartClient::from_config(&config.lookup)?))
    }
}
