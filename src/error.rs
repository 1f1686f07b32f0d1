//! Error types for the DT provider.

use thiserror::Error;

/// Errors returned by the API client and the provider layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A resource name did not have the expected shape.
    #[error("invalid resource name: {0}")]
    InvalidResourceName(String),

    /// The request could not be completed or returned a non-success status.
    #[error("failed to {op}: {source}")]
    Transport {
        /// The operation that was being performed.
        op: &'static str,
        /// The underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// The response body could not be deserialized.
    #[error("failed to decode response to {op}: {source}")]
    Decode {
        /// The operation whose response failed to decode.
        op: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized.
    #[error("failed to encode request to {op}: {source}")]
    Encode {
        /// The operation whose request failed to encode.
        op: &'static str,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The resource name was well-formed but no such resource exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// The per-request deadline elapsed before the remote call completed.
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(&'static str),

    /// The provider configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Resource state failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested resource type is not served by this provider.
    #[error("unknown resource type: {0}")]
    UnknownResource(String),

    /// A resource operation was called before `configure`.
    #[error("provider has not been configured")]
    NotConfigured,
}

/// Failures reported by a [`Transport`](crate::client::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request itself failed (connection, TLS, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, as text.
        body: String,
    },

    /// Any other transport-specific failure.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Returns true if the error reports a missing resource, either from the
    /// rule resolver or as an HTTP 404 from the API.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Transport {
                source: TransportError::Status { status, .. },
                ..
            } => *status == 404,
            _ => false,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidResourceName("projects/p1".to_string());
        assert_eq!(format!("{}", err), "invalid resource name: projects/p1");

        let err = Error::NotFound("projects/p1/rules/r1".to_string());
        assert_eq!(format!("{}", err), "not found: projects/p1/rules/r1");

        let err = Error::DeadlineExceeded("list notification rules");
        assert_eq!(
            format!("{}", err),
            "deadline exceeded: list notification rules"
        );
    }

    #[test]
    fn test_transport_error_carries_operation() {
        let err = Error::Transport {
            op: "delete contact",
            source: TransportError::Status {
                status: 403,
                body: "forbidden".to_string(),
            },
        };
        assert_eq!(
            format!("{}", err),
            "failed to delete contact: unexpected status 403: forbidden"
        );
    }

    #[test]
    fn test_decode_error_carries_operation() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = Error::Decode {
            op: "list notification rules",
            source,
        };
        assert!(format!("{}", err)
            .starts_with("failed to decode response to list notification rules"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::NotFound("x".to_string()).is_not_found());
        assert!(Error::Transport {
            op: "get contact",
            source: TransportError::Status {
                status: 404,
                body: String::new(),
            },
        }
        .is_not_found());
        assert!(!Error::Transport {
            op: "get contact",
            source: TransportError::Status {
                status: 500,
                body: String::new(),
            },
        }
        .is_not_found());
        assert!(!Error::InvalidResourceName("x".to_string()).is_not_found());
    }
}
