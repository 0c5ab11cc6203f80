//! Request Options
//!
//! Builds the request descriptor for a token call: computed headers, an
//! encoded payload, and an optional URL override for the query-string body
//! format.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;
use url::form_urlencoded;

use crate::client::credentials::CredentialsEncoder;
use crate::params::{scalar_value, TokenParams};
use crate::types::{AuthorizationMethod, BodyFormat, OAuth2Config};

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A fully-formed token request descriptor. The computed headers carry the
/// authentication and content-type values that must survive any caller
/// overrides.
#[derive(Clone, Debug)]
pub(crate) struct RequestOptions {
    pub headers: HashMap<String, String>,
    pub payload: Option<String>,
    pub url: Option<String>,
}

impl RequestOptions {
    pub fn new(config: &OAuth2Config, params: &TokenParams) -> Self {
        // Form and query-string encodings drop parameters whose value is the
        // empty string; explicit falsy scalars such as 0 are kept.
        let mut parameters: TokenParams = match config.options.body_format {
            BodyFormat::Form | BodyFormat::QueryString => params
                .iter()
                .filter(|(_, value)| !matches!(value, Value::String(s) if s.is_empty()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            BodyFormat::Json => params.clone(),
        };

        let mut headers = HashMap::new();

        if config.options.authorization_method == AuthorizationMethod::Header {
            debug!("using header authentication");
            let encoder = CredentialsEncoder::new(config.options.credentials_encoding_mode);
            let token = encoder.authorization_token(&config.client.id, config.client.secret());
            headers.insert("authorization".to_string(), format!("Basic {token}"));
        } else {
            debug!(
                method = ?config.options.authorization_method,
                "using parameter authentication"
            );
            parameters.insert(
                config.client.id_param_name.clone(),
                Value::String(config.client.id.clone()),
            );
            parameters.insert(
                config.client.secret_param_name.clone(),
                Value::String(config.client.secret().to_string()),
            );
        }

        match config.options.body_format {
            BodyFormat::Form => {
                debug!("using form request format");
                headers.insert("content-type".to_string(), FORM_CONTENT_TYPE.to_string());
                Self {
                    headers,
                    payload: Some(encode_form(&parameters)),
                    url: None,
                }
            }
            BodyFormat::QueryString => {
                debug!("using query-string request format");
                let url = format!(
                    "{}{}?{}",
                    config.auth.token_host,
                    config.auth.token_path,
                    encode_form(&parameters)
                );
                Self {
                    headers,
                    payload: None,
                    url: Some(url),
                }
            }
            BodyFormat::Json => {
                debug!("using json request format");
                headers.insert("content-type".to_string(), JSON_CONTENT_TYPE.to_string());
                Self {
                    headers,
                    payload: Some(Value::Object(parameters).to_string()),
                    url: None,
                }
            }
        }
    }
}

/// Form-urlencode a parameter set. Null values never reach the wire; other
/// scalars serialize through their string representation.
fn encode_form(params: &TokenParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params {
        if value.is_null() {
            continue;
        }
        serializer.append_pair(name, &scalar_value(value));
    }
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuthConfig, ClientConfig, ClientOptions};
    use serde_json::json;

    fn config() -> OAuth2Config {
        OAuth2Config::new(
            ClientConfig::new("the client id", "the client secret"),
            AuthConfig::new("https://authorization-server.org"),
        )
    }

    fn params(value: Value) -> TokenParams {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_form_body_with_header_authentication() {
        let options = RequestOptions::new(
            &config(),
            &params(json!({ "grant_type": "client_credentials" })),
        );

        assert_eq!(
            options.headers["authorization"],
            "Basic dGhlK2NsaWVudCtpZDp0aGUrY2xpZW50K3NlY3JldA=="
        );
        assert_eq!(
            options.headers["content-type"],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(options.payload.as_deref(), Some("grant_type=client_credentials"));
        assert!(options.url.is_none());
    }

    #[test]
    fn test_form_body_drops_empty_strings_but_keeps_zero() {
        let options = RequestOptions::new(
            &config(),
            &params(json!({ "scope": "", "code": "abc", "count": 0 })),
        );
        assert_eq!(options.payload.as_deref(), Some("code=abc&count=0"));
    }

    #[test]
    fn test_json_body_keeps_empty_strings() {
        let mut config = config();
        config.options = ClientOptions {
            body_format: BodyFormat::Json,
            ..ClientOptions::default()
        };

        let options = RequestOptions::new(&config, &params(json!({ "scope": "", "code": "abc" })));
        assert_eq!(options.headers["content-type"], "application/json");
        assert_eq!(
            options.payload.as_deref(),
            Some(r#"{"scope":"","code":"abc"}"#)
        );
    }

    #[test]
    fn test_body_authentication_injects_credential_parameters() {
        let mut config = config();
        config.options = ClientOptions {
            authorization_method: AuthorizationMethod::Body,
            ..ClientOptions::default()
        };

        let options = RequestOptions::new(
            &config,
            &params(json!({ "grant_type": "client_credentials" })),
        );
        assert!(!options.headers.contains_key("authorization"));
        assert_eq!(
            options.payload.as_deref(),
            Some("grant_type=client_credentials&client_id=the+client+id&client_secret=the+client+secret")
        );
    }

    #[test]
    fn test_body_authentication_honors_custom_param_names() {
        let mut config = config();
        config.client = ClientConfig::new("the client id", "the client secret")
            .with_id_param_name("app_id")
            .with_secret_param_name("app_secret");
        config.options = ClientOptions {
            authorization_method: AuthorizationMethod::Body,
            ..ClientOptions::default()
        };

        let options = RequestOptions::new(&config, &TokenParams::new());
        let payload = options.payload.unwrap();
        assert!(payload.contains("app_id=the+client+id"));
        assert!(payload.contains("app_secret=the+client+secret"));
    }

    #[test]
    fn test_query_string_format_bypasses_the_body() {
        let mut config = config();
        config.options = ClientOptions {
            body_format: BodyFormat::QueryString,
            ..ClientOptions::default()
        };

        let options = RequestOptions::new(
            &config,
            &params(json!({ "grant_type": "client_credentials" })),
        );
        assert!(options.payload.is_none());
        assert_eq!(
            options.url.as_deref(),
            Some("https://authorization-server.org/oauth/token?grant_type=client_credentials")
        );
    }

    #[test]
    fn test_null_values_never_reach_the_wire() {
        let options = RequestOptions::new(&config(), &params(json!({ "token": null, "a": "b" })));
        assert_eq!(options.payload.as_deref(), Some("a=b"));
    }
}
