//! Partscan Core - Foundation crate for the Partscan QR part scanner.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other Partscan crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared domain types (`PartToken`, `ScanEvent`, `PartRecord`, `FacingMode`)
//!
//! # Example
//!
//! ```rust
//! use partscan_core::{AppConfig, PartToken};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.camera.settle_delay_ms, 100);
//!
//! let token = PartToken::new("  HL-012A ");
//! assert_eq!(token.normalized(), "hl-012a");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, CameraConfig, LookupConfig, ServerConfig, SheetsConfig};
pub use error::{ConfigError, ConfigResult, PartscanError, Result};
pub use types::{FacingMode, PartRecord, PartToken, ScanEvent};
