use serde::{Deserialize, Serialize};

use crate::types::Operation;

/// A single error entry reported by a provider API.
///
/// The EC2 error envelope can carry several of these; the first one in
/// document order is the primary error of a failed call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{}", render_api_error(.code, .message))]
pub struct ApiError {
    /// HTTP status code of the response (403, 400, ...).
    pub status_code: u16,
    /// Provider error code (`"InvalidInstanceID.NotFound"`, ...). Empty when unknown.
    pub code: String,
    /// Human-oriented error message.
    pub message: String,
    /// Request id reported by the provider, if any.
    pub request_id: String,
}

fn render_api_error(code: &str, message: &str) -> String {
    if code.is_empty() {
        message.to_string()
    } else {
        format!("{message} ({code})")
    }
}

/// Unified error type for all provider operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// Nothing in this crate retries on its own: transport retry is a property of the
/// configured [`HttpTransport`](crate::HttpTransport), and every other error goes
/// straight back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Credentials or endpoint configuration are missing or malformed.
    ///
    /// Raised before any network I/O happens.
    Configuration {
        /// Provider that produced the error.
        provider: String,
        /// What is wrong with the configuration.
        detail: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request (or a bounded operation wait) timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The provider rejected the request.
    ///
    /// `error` is the first error the provider reported. Any further entries of the
    /// same response are kept in `additional`, in document order.
    Api {
        /// Provider that produced the error.
        provider: String,
        /// The primary (first reported) error.
        error: ApiError,
        /// Errors reported after the first one.
        additional: Vec<ApiError>,
    },

    /// Failed to decode the provider's response body.
    ///
    /// Indicates a client/server contract mismatch rather than a business rejection.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the decode failure.
        detail: String,
    },

    /// An asynchronous operation reached a status that is neither progress nor success.
    OperationFailed {
        /// Provider that produced the error.
        provider: String,
        /// Last observed snapshot of the operation.
        operation: Box<Operation>,
    },

    /// The caller cancelled the request or the wait.
    Cancelled {
        /// Provider that produced the error.
        provider: String,
    },
}

impl ProviderError {
    /// Whether this is an expected failure (bad input, missing resource, bad credentials),
    /// used to pick the log level.
    ///
    /// Returns `true` for errors that deserve a `warn` line, `false` for `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Configuration { .. } | Self::Cancelled { .. } => true,
            Self::Api { error, .. } => (400..500).contains(&error.status_code),
            _ => false,
        }
    }

    /// The primary API error, if this is a provider-reported failure.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Every API error of a provider-reported failure, primary first.
    pub fn api_errors(&self) -> Vec<&ApiError> {
        match self {
            Self::Api {
                error, additional, ..
            } => std::iter::once(error).chain(additional.iter()).collect(),
            _ => Vec::new(),
        }
    }

    /// Name of the provider that produced the error.
    pub fn provider(&self) -> &str {
        match self {
            Self::Configuration { provider, .. }
            | Self::NetworkError { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Api { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::OperationFailed { provider, .. }
            | Self::Cancelled { provider } => provider,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration { provider, detail } => {
                write!(f, "[{provider}] Configuration error: {detail}")
            }
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::Api {
                provider, error, ..
            } => {
                write!(f, "[{provider}] {error}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::OperationFailed {
                provider,
                operation,
            } => {
                write!(
                    f,
                    "[{provider}] Bad operation '{}': status {}",
                    operation.name, operation.status
                )
            }
            Self::Cancelled { provider } => write!(f, "[{provider}] Cancelled"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
