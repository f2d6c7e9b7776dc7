//! Shared API response envelope types
//!
//! Every JSON endpoint answers with a `status` discriminator: `"success"`
//! bodies carry their payload fields alongside it, `"error"` bodies carry a
//! human-readable `message`.

use serde::{Deserialize, Serialize};

/// Status value for successful responses
pub const STATUS_SUCCESS: &str = "success";

/// Status value for failed responses
pub const STATUS_ERROR: &str = "error";

/// Error envelope `{status: "error", message}`
///
/// # Examples
///
/// ```
/// use exo_common::api::types::ErrorEnvelope;
///
/// let error = ErrorEnvelope::new("Unknown model variant: hubble");
/// assert_eq!(error.status, "error");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always "error"
    pub status: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
        }
    }
}

/// Plain service message, e.g. the root liveness banner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
