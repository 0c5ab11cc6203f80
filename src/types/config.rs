//! Configuration Types
//!
//! Pre-validated configuration consumed by the client and grant flows.
//! Schema enforcement is the caller's concern; the constructors here only
//! apply the documented defaults.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Client credentials and the parameter names used when they travel in the
/// request body or query string instead of the Authorization header.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Client identifier. May be empty; must contain only visible ASCII.
    pub id: String,
    /// Client secret. Same character constraints as the identifier.
    secret: SecretString,
    /// Parameter name carrying the identifier (default `client_id`).
    #[serde(default = "default_id_param_name")]
    pub id_param_name: String,
    /// Parameter name carrying the secret (default `client_secret`).
    #[serde(default = "default_secret_param_name")]
    pub secret_param_name: String,
}

fn default_id_param_name() -> String {
    "client_id".to_string()
}

fn default_secret_param_name() -> String {
    "client_secret".to_string()
}

impl ClientConfig {
    /// Create client credentials with the default parameter names.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: SecretString::new(secret.into()),
            id_param_name: default_id_param_name(),
            secret_param_name: default_secret_param_name(),
        }
    }

    /// Override the parameter name carrying the client identifier.
    pub fn with_id_param_name(mut self, name: impl Into<String>) -> Self {
        self.id_param_name = name.into();
        self
    }

    /// Override the parameter name carrying the client secret.
    pub fn with_secret_param_name(mut self, name: impl Into<String>) -> Self {
        self.secret_param_name = name.into();
        self
    }

    /// Expose the client secret for credential encoding.
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("id", &self.id)
            .field("secret", &"[REDACTED]")
            .field("id_param_name", &self.id_param_name)
            .field("secret_param_name", &self.secret_param_name)
            .finish()
    }
}

/// Authorization server endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the token endpoints, scheme included.
    pub token_host: String,
    /// Path of the token endpoint (default `/oauth/token`).
    #[serde(default = "default_token_path")]
    pub token_path: String,
    /// Path of the refresh endpoint; falls back to `token_path`.
    #[serde(default)]
    pub refresh_path: Option<String>,
    /// Path of the revocation endpoint (default `/oauth/revoke`).
    #[serde(default = "default_revoke_path")]
    pub revoke_path: String,
    /// Base URL of the authorization endpoint; falls back to `token_host`.
    #[serde(default)]
    pub authorize_host: Option<String>,
    /// Path of the authorization endpoint (default `/oauth/authorize`).
    #[serde(default = "default_authorize_path")]
    pub authorize_path: String,
}

fn default_token_path() -> String {
    "/oauth/token".to_string()
}

fn default_revoke_path() -> String {
    "/oauth/revoke".to_string()
}

fn default_authorize_path() -> String {
    "/oauth/authorize".to_string()
}

impl AuthConfig {
    /// Endpoint configuration for `token_host` with the default paths.
    pub fn new(token_host: impl Into<String>) -> Self {
        Self {
            token_host: token_host.into(),
            token_path: default_token_path(),
            refresh_path: None,
            revoke_path: default_revoke_path(),
            authorize_host: None,
            authorize_path: default_authorize_path(),
        }
    }

    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    pub fn with_revoke_path(mut self, path: impl Into<String>) -> Self {
        self.revoke_path = path.into();
        self
    }

    pub fn with_authorize_host(mut self, host: impl Into<String>) -> Self {
        self.authorize_host = Some(host.into());
        self
    }

    pub fn with_authorize_path(mut self, path: impl Into<String>) -> Self {
        self.authorize_path = path.into();
        self
    }

    /// Refresh endpoint path, defaulting to the token path.
    pub fn refresh_path(&self) -> &str {
        self.refresh_path.as_deref().unwrap_or(&self.token_path)
    }

    /// Authorization endpoint host, defaulting to the token host.
    pub fn authorize_host(&self) -> &str {
        self.authorize_host.as_deref().unwrap_or(&self.token_host)
    }
}

/// Credential encoding used for the HTTP Basic authorization header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialsEncodingMode {
    /// Form-urlencode id and secret before concatenation, additionally
    /// percent-escaping the RFC 3986 reserved set `! ' ( ) *`.
    #[default]
    Strict,
    /// Concatenate the raw, unescaped values.
    Loose,
}

/// Wire encoding of the token request body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// `application/x-www-form-urlencoded` body.
    #[default]
    Form,
    /// `application/json` body.
    Json,
    /// Parameters appended to the token URL as a query string, no body.
    #[serde(rename = "qs")]
    QueryString,
}

/// Where the client credentials are placed on the token request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationMethod {
    /// HTTP Basic authorization header.
    #[default]
    Header,
    /// Injected into the request body parameters.
    Body,
    /// Injected into the query-string parameters.
    #[serde(rename = "qs")]
    QueryString,
}

/// Behavioral options for request construction and token parsing.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Separator joining scope sequences (default a single space).
    pub scope_separator: String,
    pub credentials_encoding_mode: CredentialsEncodingMode,
    pub body_format: BodyFormat,
    pub authorization_method: AuthorizationMethod,
    /// Server-specific field name carrying the expiry duration, for servers
    /// that do not report `expires_in`.
    pub expires_in_property_name: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            scope_separator: " ".to_string(),
            credentials_encoding_mode: CredentialsEncodingMode::default(),
            body_format: BodyFormat::default(),
            authorization_method: AuthorizationMethod::default(),
            expires_in_property_name: None,
        }
    }
}

/// Pass-through HTTP options: header overrides applied beneath the computed
/// authentication and content-type headers. A base-URL override is not
/// accepted here; the request URL always derives from `auth.token_host`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HttpOptions {
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Complete client configuration, immutable for the lifetime of a flow.
#[derive(Clone, Debug, Deserialize)]
pub struct OAuth2Config {
    pub client: ClientConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub http: HttpOptions,
    #[serde(default)]
    pub options: ClientOptions,
}

impl OAuth2Config {
    /// Assemble a configuration with default options and no HTTP overrides.
    pub fn new(client: ClientConfig, auth: AuthConfig) -> Self {
        Self {
            client,
            auth,
            http: HttpOptions::default(),
            options: ClientOptions::default(),
        }
    }

    pub fn with_http(mut self, http: HttpOptions) -> Self {
        self.http = http;
        self
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }
}
