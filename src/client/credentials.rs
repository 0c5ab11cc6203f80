//! Credential Encoding
//!
//! Basic-auth token construction for client credentials, under the strict
//! (RFC-compliant) and loose (raw concatenation) encoding modes.

use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::CredentialsEncodingMode;

/// Form-urlencoding set: everything except ALPHA / DIGIT / `-` / `_` / `.`
/// / `~` is percent-escaped with uppercase hex. The RFC 3986 reserved
/// characters `! ' ( ) *` stay in the set per RFC 6749 appendix B, even
/// though generic percent-encoding leaves them bare. Spaces are handled
/// separately so they serialize as `+`.
const CREDENTIAL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b' ');

fn form_url_encode(value: &str) -> String {
    utf8_percent_encode(value, CREDENTIAL_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}

/// Encodes client credentials into an HTTP Basic authorization token.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CredentialsEncoder {
    mode: CredentialsEncodingMode,
}

impl CredentialsEncoder {
    pub fn new(mode: CredentialsEncodingMode) -> Self {
        Self { mode }
    }

    /// Base64 token for the `Authorization: Basic` header. Pure function of
    /// the inputs and the encoding mode.
    pub fn authorization_token(&self, client_id: &str, client_secret: &str) -> String {
        let credentials = match self.mode {
            CredentialsEncodingMode::Strict => format!(
                "{}:{}",
                form_url_encode(client_id),
                form_url_encode(client_secret)
            ),
            CredentialsEncodingMode::Loose => format!("{client_id}:{client_secret}"),
        };

        base64::engine::general_purpose::STANDARD.encode(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_mode_form_urlencodes_credentials() {
        let encoder = CredentialsEncoder::new(CredentialsEncodingMode::Strict);
        let token = encoder.authorization_token("the client id", "the client secret");
        assert_eq!(token, "dGhlK2NsaWVudCtpZDp0aGUrY2xpZW50K3NlY3JldA==");
    }

    #[test]
    fn test_strict_mode_escapes_symbols() {
        let encoder = CredentialsEncoder::new(CredentialsEncodingMode::Strict);
        let token = encoder
            .authorization_token("the + client + id & symbols", "the + client + secret & symbols");
        assert_eq!(
            token,
            "dGhlKyUyQitjbGllbnQrJTJCK2lkKyUyNitzeW1ib2xzOnRoZSslMkIrY2xpZW50KyUyQitzZWNyZXQrJTI2K3N5bWJvbHM="
        );
    }

    #[test]
    fn test_strict_mode_escapes_rfc3986_reserved_characters() {
        // ! ' ( ) * are normally left bare by percent-encoding but must be
        // escaped with uppercase hex for Basic-auth credentials.
        let encoder = CredentialsEncoder::new(CredentialsEncodingMode::Strict);
        let token = encoder.authorization_token(
            "I'm the_client-id! & (symbols*)",
            "I'm the_client-secret! & (symbols*)",
        );
        assert_eq!(
            token,
            "SSUyN20rdGhlX2NsaWVudC1pZCUyMSslMjYrJTI4c3ltYm9scyUyQSUyOTpJJTI3bSt0aGVfY2xpZW50LXNlY3JldCUyMSslMjYrJTI4c3ltYm9scyUyQSUyOQ=="
        );
    }

    #[test]
    fn test_loose_mode_concatenates_raw_values() {
        let encoder = CredentialsEncoder::new(CredentialsEncodingMode::Loose);
        let token = encoder
            .authorization_token("the + client + id & symbols", "the + client + secret & symbols");
        assert_eq!(
            token,
            "dGhlICsgY2xpZW50ICsgaWQgJiBzeW1ib2xzOnRoZSArIGNsaWVudCArIHNlY3JldCAmIHN5bWJvbHM="
        );
    }

    #[test]
    fn test_strict_and_loose_differ_for_reserved_characters() {
        let id = "I'm the_client-id! & (symbols*)";
        let secret = "secret";
        let strict = CredentialsEncoder::new(CredentialsEncodingMode::Strict)
            .authorization_token(id, secret);
        let loose = CredentialsEncoder::new(CredentialsEncodingMode::Loose)
            .authorization_token(id, secret);
        assert_ne!(strict, loose);
    }

    #[test]
    fn test_empty_credentials() {
        let encoder = CredentialsEncoder::new(CredentialsEncodingMode::Strict);
        // base64(":")
        assert_eq!(encoder.authorization_token("", ""), "Og==");
    }
}
