//! Types exchanged with the host runtime.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// An error that prevents the operation from completing.
    Error,
    /// A warning that doesn't prevent the operation but should be addressed.
    Warning,
}

/// A diagnostic message reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: DiagnosticSeverity,
    /// A short summary of the issue.
    pub summary: String,
    /// A detailed description of the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The attribute path where the issue occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Add detail to this diagnostic.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the attribute path for this diagnostic.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        let summary = match err {
            Error::InvalidResourceName(_) => "Invalid resource name",
            Error::Transport { .. } => "Request to the DT API failed",
            Error::Decode { .. } => "Unexpected response from the DT API",
            Error::Encode { .. } => "Failed to encode request",
            Error::NotFound(_) => "Resource not found",
            Error::DeadlineExceeded(_) => "Request to the DT API timed out",
            Error::Configuration(_) => "Invalid provider configuration",
            Error::Validation(_) => "Invalid resource configuration",
            Error::UnknownResource(_) => "Unknown resource type",
            Error::NotConfigured => "Provider not configured",
        };
        Diagnostic::error(summary).with_detail(err.to_string())
    }
}

/// An imported resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// The resource type.
    pub resource_type: String,
    /// The imported state.
    pub state: serde_json::Value,
}

impl ImportedResource {
    /// Create a new imported resource.
    pub fn new(resource_type: impl Into<String>, state: serde_json::Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// Provider metadata: the resource types it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// List of resource type names.
    pub resources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    #[test]
    fn test_diagnostic_builders() {
        let err = Diagnostic::error("Invalid configuration")
            .with_detail("display_name must not be empty")
            .with_attribute("display_name");

        assert!(err.is_error());
        assert_eq!(err.summary, "Invalid configuration");
        assert_eq!(
            err.detail,
            Some("display_name must not be empty".to_string())
        );
        assert_eq!(err.attribute, Some("display_name".to_string()));

        assert!(!Diagnostic::warning("heads up").is_error());
    }

    #[test]
    fn test_diagnostic_from_error() {
        let err = Error::Transport {
            op: "list notification rules",
            source: TransportError::Status {
                status: 401,
                body: "unauthorized".to_string(),
            },
        };
        let diagnostic = Diagnostic::from(&err);
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.summary, "Request to the DT API failed");
        assert!(diagnostic
            .detail
            .unwrap()
            .contains("failed to list notification rules"));
    }

    #[test]
    fn test_imported_resource() {
        let imported = ImportedResource::new(
            "dt_contact",
            serde_json::json!({"name": "projects/p1/contacts/c1"}),
        );
        assert_eq!(imported.resource_type, "dt_contact");
        assert_eq!(imported.state["name"], "projects/p1/contacts/c1");
    }
}
