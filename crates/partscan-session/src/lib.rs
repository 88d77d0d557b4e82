//! Partscan Session - the scan session state machine and its event loop.
//!
//! [`ScanSession`] is a single mutable aggregate transitioned only by
//! discrete events: a decode, a manual lookup request, a lookup completion.
//! Every lookup it starts is identified by a [`LookupTicket`]; a completion
//! whose ticket is older than the latest request is discarded, so the newest
//! request always owns the current record.
//!
//! [`SessionRunner`] feeds the session from a [`CameraController`], user
//! actions and lookup completions on one task. Lookups run concurrently in
//! spawned tasks but their results come back through a channel and are
//! applied one at a time.
//!
//! ```text
//! camera ──► Decoded(text) ──► ScanSession::on_decoded ──► LookupTicket
//!                                                              │
//!                     spawn PartLookup::resolve(token) ◄───────┘
//!                                  │
//! ScanSession::complete_lookup ◄───┘ (dropped if superseded)
//! ```
//!
//! [`CameraController`]: partscan_camera::CameraController

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod history;
pub mod link;
pub mod presenter;
pub mod runner;
pub mod session;
pub mod status;

// Re-export commonly used types
pub use history::ScanHistory;
pub use link::link_target;
pub use presenter::{Notice, NoticeLevel, Presenter, SessionSnapshot, UserAction};
pub use runner::SessionRunner;
pub use session::{LookupTicket, ScanSession};
pub use status::LookupStatus;
