//! Token Response Parsing
//!
//! Normalizes a raw token mapping: whichever expiration field the server
//! reported is reduced to a single concrete `expires_at` instant, stored
//! back into the mapping as an RFC 3339 string so serialization round-trips.

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::types::ClientOptions;

pub(crate) const ACCESS_TOKEN_PROPERTY: &str = "access_token";
pub(crate) const REFRESH_TOKEN_PROPERTY: &str = "refresh_token";
pub(crate) const EXPIRES_AT_PROPERTY: &str = "expires_at";
pub(crate) const EXPIRES_IN_PROPERTY: &str = "expires_in";
const CREATED_AT_PROPERTY: &str = "created_at";

/// Normalize a raw token mapping. Returns the mapping (with `expires_at`
/// rewritten when an expiration could be determined) and the parsed instant.
/// Mappings without any expiration field are passed through untouched.
pub(crate) fn parse_token(
    mut token: Map<String, Value>,
    options: &ClientOptions,
    now: DateTime<Utc>,
) -> (Map<String, Value>, Option<DateTime<Utc>>) {
    let expires_at = normalized_expiration(&token, options, now);
    if let Some(instant) = expires_at {
        token.insert(
            EXPIRES_AT_PROPERTY.to_string(),
            Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }
    (token, expires_at)
}

/// Expiration precedence: an existing `expires_at` wins; then `expires_in`
/// when it parses to a nonzero duration; then the configured custom expiry
/// field under the same rule.
fn normalized_expiration(
    token: &Map<String, Value>,
    options: &ClientOptions,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if let Some(value) = token.get(EXPIRES_AT_PROPERTY).filter(|v| !v.is_null()) {
        return parse_expiration_date(value);
    }

    if let Some(seconds) = duration_seconds(token.get(EXPIRES_IN_PROPERTY)) {
        return expiration_from_duration(seconds, token.get(CREATED_AT_PROPERTY), now);
    }

    if let Some(custom) = &options.expires_in_property_name {
        if let Some(seconds) = duration_seconds(token.get(custom.as_str())) {
            return expiration_from_duration(seconds, token.get(CREATED_AT_PROPERTY), now);
        }
    }

    debug!("no token expiration property found, skipping date parsing");
    None
}

/// `expires_at` may arrive as a UNIX-seconds number or an ISO-8601 string.
fn parse_expiration_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(|secs| Utc.timestamp_millis_opt((secs * 1000.0) as i64).single()),
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(error) => {
                warn!(%error, value = %s, "unparseable expires_at value");
                None
            }
        },
        _ => None,
    }
}

/// A nonzero seconds duration, accepted as a number or a numeric string.
fn duration_seconds(value: Option<&Value>) -> Option<i64> {
    let seconds = match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f as i64),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    };
    seconds.filter(|s| *s != 0)
}

/// Durations that overflow the representable range, or push the instant
/// past the calendar bounds, yield no expiration. Server responses are
/// untrusted input and must never panic the caller.
fn expiration_from_duration(
    seconds: i64,
    created_at: Option<&Value>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let anchor = created_at.and_then(parse_creation_date).unwrap_or(now);
    Duration::try_seconds(seconds).and_then(|duration| anchor.checked_add_signed(duration))
}

/// `created_at` anchors are UNIX seconds or an ISO-8601 string; anything
/// else falls back to the request time.
fn parse_creation_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        _ => None,
    }
}

/// Copy the configured expiry field into `expires_in` ahead of
/// normalization, substituting the fallback duration when the response
/// carries no usable expiry. Absent, null, zero, and non-numeric values
/// all count as unusable. Servers reporting expiry under a custom name
/// are folded into the standard field here.
pub(crate) fn apply_expiry_fallback(
    response: &mut Map<String, Value>,
    options: &ClientOptions,
    fallback: Option<u64>,
) {
    let key = options
        .expires_in_property_name
        .as_deref()
        .unwrap_or(EXPIRES_IN_PROPERTY);

    match response
        .get(key)
        .filter(|value| duration_seconds(Some(*value)).is_some())
        .cloned()
    {
        Some(value) => {
            response.insert(EXPIRES_IN_PROPERTY.to_string(), value);
        }
        None => {
            if let Some(seconds) = fallback {
                response.insert(EXPIRES_IN_PROPERTY.to_string(), Value::from(seconds));
            }
        }
    }
}
