//! Shared types for the modforge assistant
//!
//! Contains the identifiers, enumerations and failure types used by every
//! assistant component, plus the tracing setup shared by the binary and tests.

pub mod types;
pub mod errors;
pub mod logging;

pub use types::*;
pub use errors::*;
pub use logging::Component;
