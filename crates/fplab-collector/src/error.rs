use fplab_core::UnavailableReason;
use thiserror::Error;

/// Failure of a single client capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("capability not supported")]
    Unsupported,

    #[error("permission denied")]
    Denied,

    #[error("capability fault: {0}")]
    Fault(String),
}

impl CapabilityError {
    /// Marker recorded in place of a value this error prevented.
    #[must_use]
    pub fn reason(&self) -> UnavailableReason {
        match self {
            CapabilityError::Unsupported => UnavailableReason::Unsupported,
            CapabilityError::Denied => UnavailableReason::Denied,
            CapabilityError::Fault(_) => UnavailableReason::Blocked,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid server URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
}
