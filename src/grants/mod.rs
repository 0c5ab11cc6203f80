//! Grant Type Flows
//!
//! RFC 6749 flow implementations. Each flow is an independent value
//! composed from the shared parameter builder and transport client; there
//! is no common base type beyond the `create_token` capability every flow
//! exposes.

mod authorization_code;
mod client_credentials;
mod resource_owner_password;

pub use authorization_code::AuthorizationCode;
pub use client_credentials::ClientCredentials;
pub use resource_owner_password::ResourceOwnerPassword;

use serde_json::{Map, Value};

use crate::error::{OAuth2Result, ProtocolError};

/// Token endpoints are contracted to return JSON objects; anything else is
/// a response-format fault.
pub(crate) fn response_object(value: Value) -> OAuth2Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ProtocolError::UnexpectedResponse {
            body: other.to_string(),
        }
        .into()),
    }
}
