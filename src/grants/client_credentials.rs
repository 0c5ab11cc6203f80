//! Client Credentials Grant
//!
//! RFC 6749 Section 4.4 - Client Credentials Grant.

use std::sync::Arc;

use crate::client::transport::HttpTransport;
use crate::client::HttpClient;
use crate::error::OAuth2Result;
use crate::params::{GrantTypeParams, TokenParams};
use crate::token::{apply_expiry_fallback, AccessToken};
use crate::types::{HttpOptions, OAuth2Config};

const GRANT_NAME: &str = "client_credentials";

/// Client credentials flow.
pub struct ClientCredentials {
    config: Arc<OAuth2Config>,
    client: Arc<HttpClient>,
}

impl ClientCredentials {
    /// Flow over the default reqwest transport.
    pub fn new(config: OAuth2Config) -> Self {
        let config = Arc::new(config);
        let client = Arc::new(HttpClient::new(Arc::clone(&config)));
        Self { config, client }
    }

    /// Flow over an injected transport.
    pub fn with_transport(config: OAuth2Config, transport: Arc<dyn HttpTransport>) -> Self {
        let config = Arc::new(config);
        let client = Arc::new(HttpClient::with_transport(Arc::clone(&config), transport));
        Self { config, client }
    }

    /// Flow over a pre-built client, for callers that tune the retry policy.
    pub fn with_client(config: Arc<OAuth2Config>, client: Arc<HttpClient>) -> Self {
        Self { config, client }
    }

    /// Request an access token via the `client_credentials` grant.
    /// `token_expiry_fallback` substitutes for the response's expiry field
    /// when the server reports none.
    pub async fn get_token(
        &self,
        params: TokenParams,
        http_options: &HttpOptions,
        token_expiry_fallback: Option<u64>,
    ) -> OAuth2Result<AccessToken> {
        let parameters = GrantTypeParams::for_grant_type(GRANT_NAME, &self.config.options, params);
        let response = self
            .client
            .request(
                &self.config.auth.token_path,
                &parameters.into_params(),
                http_options,
            )
            .await?;

        let mut response = super::response_object(response)?;
        apply_expiry_fallback(&mut response, &self.config.options, token_expiry_fallback);

        Ok(self.create_token(response))
    }

    /// Build an access token entity from an out-of-band token payload.
    pub fn create_token(&self, raw: TokenParams) -> AccessToken {
        AccessToken::new(Arc::clone(&self.config), Arc::clone(&self.client), raw)
    }
}
