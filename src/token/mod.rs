//! Access Token Entity
//!
//! Immutable snapshot of a token response with a normalized expiration,
//! exposing refresh and revocation against the configured endpoints.

mod parser;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};

use crate::client::HttpClient;
use crate::error::OAuth2Result;
use crate::params::{GrantTypeParams, TokenParams};
use crate::types::{HttpOptions, OAuth2Config};

pub(crate) use parser::apply_expiry_fallback;

/// Hint sent to the revocation endpoint. `Other` values pass through
/// verbatim for servers with non-standard hints; no validation is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenTypeHint {
    AccessToken,
    RefreshToken,
    Other(String),
}

impl TokenTypeHint {
    /// Wire value of the hint, doubling as the lookup key into the token
    /// mapping for the value being revoked.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AccessToken => parser::ACCESS_TOKEN_PROPERTY,
            Self::RefreshToken => parser::REFRESH_TOKEN_PROPERTY,
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for TokenTypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An access token issued by the authorization server.
///
/// The underlying mapping is normalized once at construction and never
/// mutated; `refresh` produces a new instance. `expires_at`, when present,
/// is always a concrete point in time, never a raw duration.
#[derive(Clone)]
pub struct AccessToken {
    config: Arc<OAuth2Config>,
    client: Arc<HttpClient>,
    token: Map<String, Value>,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub(crate) fn new(
        config: Arc<OAuth2Config>,
        client: Arc<HttpClient>,
        raw: Map<String, Value>,
    ) -> Self {
        let (token, expires_at) = parser::parse_token(raw, &config.options, Utc::now());
        Self {
            config,
            client,
            token,
            expires_at,
        }
    }

    /// The normalized token mapping, `expires_at` included when known.
    pub fn token(&self) -> &Map<String, Value> {
        &self.token
    }

    /// The normalized expiration instant, if the server reported one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the token has expired, or will expire within the given
    /// window. Tokens without an expiration are never reported expired.
    /// Windows beyond the representable duration range are clamped.
    pub fn expired(&self, expiration_window_seconds: u64) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let window = i64::try_from(expiration_window_seconds)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .unwrap_or(Duration::MAX);
                expires_at.signed_duration_since(Utc::now()) <= window
            }
            None => false,
        }
    }

    /// Exchange the refresh token for a new access token via the
    /// `refresh_token` grant. The current token's `refresh_token` value is
    /// forced into the parameter set; `token_expiry_fallback` substitutes
    /// for the response's expiry field when absent.
    pub async fn refresh(
        &self,
        params: TokenParams,
        http_options: &HttpOptions,
        token_expiry_fallback: Option<u64>,
    ) -> OAuth2Result<AccessToken> {
        let mut refresh_params = params;
        if let Some(refresh_token) = self.token.get(parser::REFRESH_TOKEN_PROPERTY) {
            refresh_params.insert(
                parser::REFRESH_TOKEN_PROPERTY.to_string(),
                refresh_token.clone(),
            );
        }

        let parameters = GrantTypeParams::for_grant_type(
            parser::REFRESH_TOKEN_PROPERTY,
            &self.config.options,
            refresh_params,
        );
        let response = self
            .client
            .request(
                self.config.auth.refresh_path(),
                &parameters.into_params(),
                http_options,
            )
            .await?;

        let mut response = crate::grants::response_object(response)?;
        parser::apply_expiry_fallback(&mut response, &self.config.options, token_expiry_fallback);

        Ok(AccessToken::new(
            Arc::clone(&self.config),
            Arc::clone(&self.client),
            response,
        ))
    }

    /// Revoke a single token at the configured revocation endpoint. The
    /// hint is forwarded unvalidated; the token value is looked up in the
    /// current mapping under the hint's name and omitted when absent.
    pub async fn revoke(
        &self,
        token_type: TokenTypeHint,
        http_options: &HttpOptions,
    ) -> OAuth2Result<()> {
        let mut params = TokenParams::new();
        if let Some(token) = self.token.get(token_type.as_str()) {
            params.insert("token".to_string(), token.clone());
        }
        params.insert(
            "token_type_hint".to_string(),
            Value::String(token_type.as_str().to_string()),
        );

        self.client
            .request(&self.config.auth.revoke_path, &params, http_options)
            .await?;
        Ok(())
    }

    /// Revoke the access token, then the refresh token, strictly
    /// sequentially. A failure on the first revocation propagates before
    /// the second is attempted.
    pub async fn revoke_all(&self, http_options: &HttpOptions) -> OAuth2Result<()> {
        self.revoke(TokenTypeHint::AccessToken, http_options).await?;
        self.revoke(TokenTypeHint::RefreshToken, http_options).await?;
        Ok(())
    }

    /// Plain JSON value of the token mapping. Feeding it back through
    /// `create_token` reconstructs an equivalent entity.
    pub fn to_json(&self) -> Value {
        Value::Object(self.token.clone())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
