//! OAuth2 Client Library
//!
//! Token acquisition, refresh and revocation for the standard OAuth2 grant
//! flows.
//!
//! # Features
//!
//! - Authorization Code Grant (RFC 6749 Section 4.1), including the
//!   browser-facing authorization redirect URL
//! - Resource Owner Password Credentials Grant (RFC 6749 Section 4.3)
//! - Client Credentials Grant (RFC 6749 Section 4.4)
//! - Token Refresh (RFC 6749 Section 6)
//! - Token Revocation (RFC 7009)
//! - Strict (RFC-compliant) and loose client credential encoding
//! - Form, JSON, and query-string token request encodings
//! - Bounded retry with capped exponential backoff for server-side faults
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth2_client::{
//!     AuthConfig, ClientConfig, ClientCredentials, HttpOptions, OAuth2Config, TokenParams,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OAuth2Config::new(
//!         ClientConfig::new("my-client-id", "my-client-secret"),
//!         AuthConfig::new("https://authorization-server.org"),
//!     );
//!
//!     let flow = ClientCredentials::new(config);
//!
//!     let mut params = TokenParams::new();
//!     params.insert("scope".into(), serde_json::json!(["profile", "email"]));
//!
//!     let token = flow.get_token(params, &HttpOptions::default(), None).await?;
//!     if !token.expired(60) {
//!         println!("access token: {}", token.to_json());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: pre-validated configuration data model
//! - `error`: error hierarchy with retry classification
//! - `params`: grant parameter assembly (scope joining, grant-type override)
//! - `client`: transport client (credential encoding, request construction,
//!   retry, JSON parsing) behind an injectable `HttpTransport` seam
//! - `token`: access token entity (expiration, refresh, revocation)
//! - `grants`: the grant-type flows composing the pieces above
//!
//! Configuration is treated as already validated; schema enforcement is the
//! caller's concern.

pub mod client;
pub mod error;
pub mod grants;
pub mod params;
pub mod token;
pub mod types;

// Re-export flows
pub use grants::{AuthorizationCode, ClientCredentials, ResourceOwnerPassword};

// Re-export the token entity
pub use token::{AccessToken, TokenTypeHint};

// Re-export errors
pub use error::{
    ConfigurationError, OAuth2Error, OAuth2Result, ProtocolError, RequestContext, TransportError,
};

// Re-export configuration types
pub use types::{
    AuthConfig, AuthorizationMethod, BodyFormat, ClientConfig, ClientOptions,
    CredentialsEncodingMode, HttpOptions, OAuth2Config,
};

// Re-export client components
pub use client::retry::RetryPolicy;
pub use client::transport::{
    HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};
pub use client::HttpClient;

// Re-export parameter builder
pub use params::{GrantTypeParams, TokenParams};
