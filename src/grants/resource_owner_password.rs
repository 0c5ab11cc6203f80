//! Resource Owner Password Grant
//!
//! RFC 6749 Section 4.3 - Resource Owner Password Credentials Grant.

use std::sync::Arc;

use crate::client::transport::HttpTransport;
use crate::client::HttpClient;
use crate::error::OAuth2Result;
use crate::params::{GrantTypeParams, TokenParams};
use crate::token::AccessToken;
use crate::types::{HttpOptions, OAuth2Config};

const GRANT_NAME: &str = "password";

/// Resource owner password credentials flow.
pub struct ResourceOwnerPassword {
    config: Arc<OAuth2Config>,
    client: Arc<HttpClient>,
}

impl ResourceOwnerPassword {
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

    /// Request an access token via the `password` grant. The response is
    /// passed through as-is; no expiry substitution is applied.
    pub async fn get_token(
        &self,
        params: TokenParams,
        http_options: &HttpOptions,
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

        Ok(self.create_token(super::response_object(response)?))
    }

    /// Build an access token entity from an out-of-band token payload.
    pub fn create_token(&self, raw: TokenParams) -> AccessToken {
        AccessToken::new(Arc::clone(&self.config), Arc::clone(&self.client), raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::MockHttpTransport;
    use crate::types::{AuthConfig, ClientConfig};
    use serde_json::json;

    fn config() -> OAuth2Config {
        OAuth2Config::new(
            ClientConfig::new("the client id", "the client secret"),
            AuthConfig::new("https://authorization-server.org"),
        )
    }

    #[tokio::test]
    async fn test_get_token_posts_owner_credentials() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.queue_json(200, &json!({ "access_token": "abc123", "expires_in": 300 }));

        let flow = ResourceOwnerPassword::with_transport(config(), transport.clone());

        let params = json!({ "username": "alice", "password": "correct horse" })
            .as_object()
            .cloned()
            .unwrap();
        let token = flow.get_token(params, &HttpOptions::default()).await.unwrap();

        let body = transport.last_request().unwrap().body.unwrap();
        assert_eq!(
            body,
            "grant_type=password&username=alice&password=correct+horse"
        );
        assert_eq!(token.token()["access_token"], json!("abc123"));
    }
}
