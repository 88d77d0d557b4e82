//! Partscan Camera - camera acquisition that degrades across driver limits.
//!
//! Camera hardware and drivers disagree wildly about which constraints they
//! accept. This crate owns a ladder of progressively looser
//! [`ConstraintProfile`]s and a [`Negotiator`] that walks it whenever the
//! decoder rejects the active profile. The [`CameraController`] drives a
//! [`DecoderAdapter`] through the resulting restart cycles, releasing the
//! previous stream and waiting a settle delay before acquiring the next one.
//!
//! # Ladder
//!
//! ```text
//! rank 0: preferred facing + resolution bounds
//! rank 1: preferred facing only
//! rank 2: ideal resolution hint, any facing
//! rank 3: any camera
//! ```
//!
//! Only a constraint-incompatibility failure advances the rank. Permission
//! and device failures are fatal immediately, as is a rejection at the last rung.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod controller;
pub mod decoder;
pub mod error;
pub mod negotiator;
pub mod profile;

// Re-export commonly used types
pub use controller::{CameraController, CameraEvent};
pub use decoder::{DecoderAdapter, DecoderErrorKind, DecoderEvent, DecoderFailure};
pub use error::{CameraError, Result};
pub use negotiator::{NegotiationState, NegotiationStep, Negotiator};
pub use profile::{ConstraintLadder, ConstraintProfile, DimensionRange};
