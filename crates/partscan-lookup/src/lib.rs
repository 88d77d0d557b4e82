//! Partscan Lookup - resolves part tokens against a tabular data source.
//!
//! The data source is a spreadsheet-like table: one header row and any
//! number of body rows. Columns are located by normalized header name, so
//! column order is irrelevant and missing optional columns fall back to
//! defaults. Only a missing `id` column makes the table unusable.
//!
//! # Clients
//!
//! - [`SheetLookup`] fetches the table from a [`TabularSource`] (such as
//!   [`SheetsSource`]) and resolves the token locally.
//! - [`HttpPartClient`] calls a remote `GET /parts/{token}` route that does
//!   the same on a server and returns a [`LookupResponse`] envelope.
//!
//! Both implement [`PartLookup`] and are stateless across calls.
//!
//! # Example
//!
//! ```rust
//! use partscan_lookup::{PartLookup, SheetLookup, StaticSource, Table};
//! use partscan_core::PartToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let table = Table::from_rows(vec![
//!     vec!["ID".into(), "Name".into(), "Quantity".into()],
//!     vec!["HL-012A".into(), "Bracket".into(), "15".into()],
//! ]);
//! let lookup = SheetLookup::new(StaticSource::new(table));
//!
//! let record = lookup.resolve(&PartToken::new("hl-012a")).await?;
//! assert_eq!(record.quantity, 15);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod client;
pub mod error;
pub mod source;
pub mod table;

// Re-export commonly used types
pub use api::{ErrorCode, LookupResponse};
pub use client::{HttpPartClient, PartLookup, SheetLookup};
pub use error::{LookupError, LookupErrorKind, Result};
pub use source::{SheetsSource, StaticSource, TabularSource};
pub use table::{normalize_header, parse_quantity, ColumnIndex, Table};
