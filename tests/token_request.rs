//! End-to-end token requests against a local mock authorization server,
//! exercising the real reqwest transport.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oauth2_client::{
    AccessToken, AuthConfig, ClientConfig, ClientCredentials, HttpClient, HttpOptions,
    OAuth2Config, ResourceOwnerPassword, RetryPolicy, TokenParams, TokenTypeHint,
};

fn config_for(server: &MockServer) -> OAuth2Config {
    OAuth2Config::new(
        ClientConfig::new("the client id", "the client secret"),
        AuthConfig::new(server.uri()),
    )
}

fn params(value: serde_json::Value) -> TokenParams {
    value.as_object().cloned().unwrap_or_default()
}

async fn fast_flow(server: &MockServer) -> ClientCredentials {
    let config = Arc::new(config_for(server));
    let client = Arc::new(HttpClient::new(Arc::clone(&config)).with_retry_policy(RetryPolicy {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        ..RetryPolicy::default()
    }));
    ClientCredentials::with_client(config, client)
}

#[tokio::test]
async fn client_credentials_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header(
            "authorization",
            "Basic dGhlK2NsaWVudCtpZDp0aGUrY2xpZW50K3NlY3JldA==",
        ))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("grant_type=client_credentials&scope=profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = ClientCredentials::new(config_for(&server));
    let token = flow
        .get_token(
            params(json!({ "scope": "profile" })),
            &HttpOptions::default(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(token.token()["access_token"], json!("abc123"));
    assert!(!token.expired(60));
}

#[tokio::test]
async fn password_grant_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string(
            "grant_type=password&username=alice&password=correct+horse",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "expires_in": 300
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = ResourceOwnerPassword::new(config_for(&server));
    let token = flow
        .get_token(
            params(json!({ "username": "alice", "password": "correct horse" })),
            &HttpOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(token.token()["access_token"], json!("abc123"));
}

#[tokio::test]
async fn transient_server_faults_are_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "error": "bad gateway" })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = fast_flow(&server)
        .await
        .get_token(TokenParams::new(), &HttpOptions::default(), None)
        .await
        .unwrap();

    assert_eq!(token.token()["access_token"], json!("abc123"));
}

#[tokio::test]
async fn client_errors_surface_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_client" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = fast_flow(&server)
        .await
        .get_token(TokenParams::new(), &HttpOptions::default(), None)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(401));
}

#[tokio::test]
async fn refresh_and_revoke_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string("grant_type=refresh_token&refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "refresh_token": "r2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/revoke"))
        .and(body_string("token=fresh&token_type_hint=access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let flow = ClientCredentials::new(config_for(&server));
    let stored: AccessToken = flow.create_token(params(json!({
        "access_token": "stale",
        "refresh_token": "r1",
        "expires_in": 0
    })));

    let refreshed = stored
        .refresh(TokenParams::new(), &HttpOptions::default(), None)
        .await
        .unwrap();
    assert_eq!(refreshed.token()["access_token"], json!("fresh"));

    refreshed
        .revoke(TokenTypeHint::AccessToken, &HttpOptions::default())
        .await
        .unwrap();
}
