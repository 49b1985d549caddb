//! ndfc-vrf error types

/// HTTP return codes the controller treats as non-retryable.
///
/// Retrying a request that produced one of these is pointless: the
/// controller has already given an authoritative answer (bad request,
/// missing resource, conflicting resource). A retry policy layered on the
/// transport must return these immediately.
pub const NON_RETRYABLE_CODES: [u16; 3] = [400, 404, 409];

/// ndfc-vrf error types
#[derive(Debug, thiserror::Error)]
pub enum VrfError {
    // Transport/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("controller error ({status}): {message}")]
    Controller { status: u16, message: String },

    #[error("malformed controller response: {0}")]
    MalformedResponse(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Desired-configuration input failed validation before any network
    /// call was made. `index` identifies the offending item in the batch.
    #[error("invalid configuration at index {index}: {reason}")]
    Validation { index: usize, reason: String },

    #[error("switch {ip} not found in fabric {fabric} inventory")]
    SwitchNotFound { ip: String, fabric: String },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl VrfError {
    /// Whether a retry policy may re-issue the request that produced this
    /// error.
    ///
    /// Transport-level failures (connection reset, timeout, unreadable
    /// body) are retryable; controller verdicts carrying a code in
    /// [`NON_RETRYABLE_CODES`] and all local data/validation errors are
    /// not.
    pub fn is_retryable(&self) -> bool {
        match self {
            VrfError::Http(_) | VrfError::MalformedResponse(_) => true,
            VrfError::Controller { status, .. } => !NON_RETRYABLE_CODES.contains(status),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for VrfError {
    fn from(err: reqwest::Error) -> Self {
        VrfError::Http(err.to_string())
    }
}

/// Result type alias for ndfc-vrf operations
pub type Result<T> = std::result::Result<T, VrfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_are_retryable() {
        assert!(VrfError::Http("connection reset".into()).is_retryable());
    }

    #[test]
    fn conflict_is_not_retryable() {
        let err = VrfError::Controller {
            status: 409,
            message: "VRF already exists".into(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_error_is_retryable() {
        let err = VrfError::Controller {
            status: 500,
            message: "internal error".into(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn validation_is_not_retryable() {
        let err = VrfError::Validation {
            index: 2,
            reason: "fabric must not be empty".into(),
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("index 2"));
    }
}
