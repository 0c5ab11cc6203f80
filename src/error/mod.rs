//! OAuth2 Error Types
//!
//! Error hierarchy for token requests and the access-token lifecycle.

use std::collections::HashMap;
use thiserror::Error;

/// Outgoing-request context carried by transport and parse failures so
/// callers can log or react to the exact wire exchange that failed.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    /// Fully resolved request URL.
    pub url: String,
    /// Outgoing headers, lowercase names.
    pub headers: HashMap<String, String>,
    /// Outgoing body payload, if any.
    pub payload: Option<String>,
}

/// Root error type for OAuth2 client operations.
#[derive(Error, Debug)]
pub enum OAuth2Error {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl OAuth2Error {
    /// Check if the failure may succeed on a fresh attempt. Only responses
    /// with a status strictly greater than 500 qualify; client/auth errors
    /// and connection-level failures are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// HTTP status of the failing response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(TransportError::ServerResponse { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Configuration error.
///
/// Schema validation happens before a configuration reaches this crate;
/// the only faults surfaced here are endpoint values that fail URL parsing.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Invalid endpoint URL {url}: {message}")]
    InvalidEndpoint { url: String, message: String },
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        message: String,
        request: RequestContext,
    },

    #[error("Failed to create access token: {status} {status_text} {body}")]
    ServerResponse {
        status: u16,
        status_text: String,
        headers: HashMap<String, String>,
        body: String,
        request: RequestContext,
    },
}

impl TransportError {
    /// True server-side faults (status > 500) are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServerResponse { status, .. } if *status > 500)
    }
}

/// Response-format error. Raised for 2xx responses whose body is not the
/// JSON the token endpoints are contracted to return; never retried.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Failed to parse response body as JSON: {body}")]
    InvalidJson {
        message: String,
        body: String,
        headers: HashMap<String, String>,
        request: RequestContext,
    },

    #[error("Expected a JSON object in the response body: {body}")]
    UnexpectedResponse { body: String },
}

/// Result type for OAuth2 client operations.
pub type OAuth2Result<T> = Result<T, OAuth2Error>;
