//! HTTP Transport
//!
//! Transport seam for token requests: a trait for dependency injection, the
//! reqwest-backed production implementation, and an in-process mock that
//! replays queued responses for tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};

use crate::error::{RequestContext, TransportError};

/// Outgoing token request. Token endpoints are POST-only; the redirect URL
/// for the authorization-code flow is built without going through the
/// transport.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// Fully resolved request URL.
    pub url: String,
    /// Request headers, lowercase names.
    pub headers: HashMap<String, String>,
    /// Request body, absent for the query-string body format.
    pub body: Option<String>,
}

impl HttpRequest {
    pub(crate) fn context(&self) -> RequestContext {
        RequestContext {
            url: self.url.clone(),
            headers: self.headers.clone(),
            payload: self.body.clone(),
        }
    }
}

/// Raw HTTP response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Status text.
    pub status_text: String,
    /// Response headers, lowercase names.
    pub headers: HashMap<String, String>,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport interface. Implementations report connection-level
/// failures only; HTTP error statuses come back as ordinary responses and
/// are classified by the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a POST request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default reqwest-based transport.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
}

impl ReqwestHttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            // Token endpoints must not be followed through redirects
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for ReqwestHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let context = request.context();

        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::ConnectionFailed {
                message: e.to_string(),
                request: context.clone(),
            })?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string().to_lowercase(), v.to_string());
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::ConnectionFailed {
                message: e.to_string(),
                request: context,
            })?;

        Ok(HttpResponse {
            status,
            status_text,
            headers,
            body,
        })
    }
}

/// Mock transport that replays queued responses in order and records every
/// outgoing request.
#[derive(Default)]
pub struct MockHttpTransport {
    responses: std::sync::Mutex<VecDeque<HttpResponse>>,
    requests: std::sync::Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response; responses are replayed first-in first-out.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Queue a JSON response with the given status.
    pub fn queue_json(&self, status: u16, body: &serde_json::Value) -> &Self {
        self.queue_response(HttpResponse {
            status,
            status_text: if status == 200 { "OK" } else { "Error" }.to_string(),
            headers: [("content-type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
            body: body.to_string(),
        })
    }

    /// All requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let context = request.context();
        self.requests.lock().unwrap().push(request);

        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            TransportError::ConnectionFailed {
                message: "no mock response queued".to_string(),
                request: context,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_replays_in_order() {
        let transport = MockHttpTransport::new();
        transport.queue_json(502, &json!({ "error": "bad gateway" }));
        transport.queue_json(200, &json!({ "access_token": "abc123" }));

        let request = HttpRequest {
            url: "https://authorization-server.org/oauth/token".to_string(),
            headers: HashMap::new(),
            body: None,
        };

        let first = transport.send(request.clone()).await.unwrap();
        assert_eq!(first.status, 502);
        let second = transport.send(request).await.unwrap();
        assert_eq!(second.status, 200);
        assert!(second.body.contains("abc123"));

        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_transport_fails_without_queued_response() {
        let transport = MockHttpTransport::new();
        let request = HttpRequest {
            url: "https://authorization-server.org/oauth/token".to_string(),
            headers: HashMap::new(),
            body: None,
        };

        let error = transport.send(request).await.unwrap_err();
        assert!(matches!(error, TransportError::ConnectionFailed { .. }));
    }
}
