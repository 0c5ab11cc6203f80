//! Authorization Code Grant
//!
//! RFC 6749 Section 4.1 - Authorization Code Grant: the browser-facing
//! redirect URL plus the code-for-token exchange.

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::client::transport::HttpTransport;
use crate::client::HttpClient;
use crate::error::{ConfigurationError, OAuth2Result};
use crate::params::{scalar_value, GrantTypeParams, TokenParams};
use crate::token::{apply_expiry_fallback, AccessToken};
use crate::types::{HttpOptions, OAuth2Config};

const GRANT_NAME: &str = "authorization_code";
const RESPONSE_TYPE_PARAM: &str = "response_type";

/// Authorization code flow.
pub struct AuthorizationCode {
    config: Arc<OAuth2Config>,
    client: Arc<HttpClient>,
}

impl AuthorizationCode {
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

    /// Build the absolute authorization URL users are redirected to.
    ///
    /// `response_type=code` and the client identifier (under the configured
    /// id parameter name) are merged with the caller parameters onto
    /// `authorize_host + authorize_path`. Query pairs already present on
    /// the authorize path are preserved unless a merged parameter carries
    /// the same name, in which case the merged value replaces them.
    pub fn authorize_url(&self, params: TokenParams) -> OAuth2Result<String> {
        let mut base = TokenParams::new();
        base.insert(
            RESPONSE_TYPE_PARAM.to_string(),
            Value::String("code".to_string()),
        );
        base.insert(
            self.config.client.id_param_name.clone(),
            Value::String(self.config.client.id.clone()),
        );
        let parameters = GrantTypeParams::new(&self.config.options, base, params);

        let host = self.config.auth.authorize_host();
        let mut url = Url::parse(host)
            .and_then(|host| host.join(&self.config.auth.authorize_path))
            .map_err(|e| ConfigurationError::InvalidEndpoint {
                url: format!("{host}{}", self.config.auth.authorize_path),
                message: e.to_string(),
            })?;

        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        // URLSearchParams::set semantics: replace every pre-existing pair of
        // the same name with a single merged value, append new names in
        // parameter order.
        for (name, value) in parameters.into_params() {
            let value = scalar_value(&value);
            let mut replaced = false;
            pairs.retain_mut(|(existing, existing_value)| {
                if *existing == name {
                    if replaced {
                        return false;
                    }
                    *existing_value = value.clone();
                    replaced = true;
                }
                true
            });
            if !replaced {
                pairs.push((name, value));
            }
        }

        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(name, value)| (name, value)));

        Ok(url.to_string())
    }

    /// Exchange an authorization code for an access token via the
    /// `authorization_code` grant. `token_expiry_fallback` substitutes for
    /// the response's expiry field when the server reports none.
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
