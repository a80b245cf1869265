//! Canonicalization of free-text wine and spirit descriptions.
//!
//! The [`engine`] turns raw retailer strings into one comparable description
//! using a [`registry::PatternRegistry`] and a lookup table derived from
//! already-canonical master records. [`commands`] wrap the engine with file
//! I/O and return serializable envelopes.

pub mod commands;
pub mod contracts;
pub mod engine;
pub mod error;
pub mod records;
pub mod registry;
pub mod state;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use engine::{Canonicalized, Canonicalizer};
pub use error::{ClientError, ClientResult};
pub use registry::PatternRegistry;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
