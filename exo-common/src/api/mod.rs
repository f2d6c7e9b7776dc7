//! Shared API types
//!
//! Response envelopes used by every exo HTTP service.

pub mod types;

pub use types::{ErrorEnvelope, MessageResponse, STATUS_ERROR, STATUS_SUCCESS};
