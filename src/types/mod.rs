//! Data Types
//!
//! Configuration data model shared by the client and the grant flows.

mod config;

pub use config::{
    AuthConfig, AuthorizationMethod, BodyFormat, ClientConfig, ClientOptions,
    CredentialsEncodingMode, HttpOptions, OAuth2Config,
};
