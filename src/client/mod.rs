//! Transport Client
//!
//! Sends token requests: resolves the request URL against the configured
//! token host, merges headers with the documented precedence, retries
//! server-side faults, and parses JSON response bodies.
//!
//! Header precedence, least to most specific: the default `Accept` header,
//! configuration-level `http` overrides, per-call overrides, then the
//! computed authentication and content-type headers. The computed headers
//! always win, including over a caller override of the same name.

mod credentials;
mod request_options;
pub mod retry;
pub mod transport;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{ConfigurationError, OAuth2Error, OAuth2Result, ProtocolError, TransportError};
use crate::params::TokenParams;
use crate::types::{HttpOptions, OAuth2Config};

use request_options::RequestOptions;
use retry::RetryPolicy;
use transport::{HttpRequest, HttpTransport, ReqwestHttpTransport};

/// POST client for the token endpoints. Each call is a fresh, bounded
/// attempt sequence; no state is shared across calls.
pub struct HttpClient {
    config: Arc<OAuth2Config>,
    transport: Arc<dyn HttpTransport>,
    retry_policy: RetryPolicy,
}

impl HttpClient {
    /// Client over the default reqwest transport.
    pub fn new(config: Arc<OAuth2Config>) -> Self {
        Self::with_transport(config, Arc::new(ReqwestHttpTransport::new()))
    }

    /// Client over an injected transport.
    pub fn with_transport(config: Arc<OAuth2Config>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Send a token request to `path` (resolved against the configured token
    /// host) and parse the JSON response body. Responses with a status above
    /// 500 are retried per the policy; statuses in 400..=500 and connection
    /// failures abort immediately. A 2xx response that is not valid JSON is
    /// a hard failure, not a retry.
    pub async fn request(
        &self,
        path: &str,
        params: &TokenParams,
        http_options: &HttpOptions,
    ) -> OAuth2Result<Value> {
        let options = RequestOptions::new(&self.config, params);
        let url = self.resolve_url(options.url.as_deref().unwrap_or(path))?;

        let mut headers: HashMap<String, String> =
            [("accept".to_string(), "application/json".to_string())]
                .into_iter()
                .collect();
        for (name, value) in &self.config.http.headers {
            headers.insert(name.to_lowercase(), value.clone());
        }
        for (name, value) in &http_options.headers {
            headers.insert(name.to_lowercase(), value.clone());
        }
        // Computed authentication and content-type headers are applied last
        // and cannot be displaced by caller overrides.
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        let request = HttpRequest {
            url,
            headers,
            body: options.payload,
        };
        debug!(url = %request.url, "creating token request");

        let response = retry::retry(
            &self.retry_policy,
            |error: &OAuth2Error| error.is_retryable(),
            || {
                let transport = Arc::clone(&self.transport);
                let request = request.clone();
                async move {
                    let context = request.context();
                    let response = transport.send(request).await?;

                    if response.is_success() {
                        Ok(response)
                    } else {
                        Err(OAuth2Error::Transport(TransportError::ServerResponse {
                            status: response.status,
                            status_text: response.status_text,
                            headers: response.headers,
                            body: response.body,
                            request: context,
                        }))
                    }
                }
            },
        )
        .await?;

        serde_json::from_str(&response.body).map_err(|e| {
            OAuth2Error::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
                body: response.body.clone(),
                headers: response.headers.clone(),
                request: request.context(),
            })
        })
    }

    fn resolve_url(&self, path: &str) -> OAuth2Result<String> {
        let base = Url::parse(&self.config.auth.token_host).map_err(|e| {
            ConfigurationError::InvalidEndpoint {
                url: self.config.auth.token_host.clone(),
                message: e.to_string(),
            }
        })?;
        let resolved = base.join(path).map_err(|e| ConfigurationError::InvalidEndpoint {
            url: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(resolved.into())
    }
}
