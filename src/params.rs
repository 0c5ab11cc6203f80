//! Grant Type Parameters
//!
//! Maps grant-specific semantic parameters (scope sequences, grant names)
//! into the wire parameter set consumed by the request builder.

use serde_json::{Map, Value};

use crate::types::ClientOptions;

/// Ordered key/value parameters for a token request. Values are scalars,
/// except `scope`, which may be a sequence of strings joined with the
/// configured separator before transmission.
pub type TokenParams = Map<String, Value>;

pub(crate) const GRANT_TYPE_PARAM: &str = "grant_type";
const SCOPE_PARAM: &str = "scope";

/// Wire parameter set for a single token request.
#[derive(Clone, Debug)]
pub struct GrantTypeParams {
    params: TokenParams,
}

impl GrantTypeParams {
    /// Merge base and caller parameters, caller values winning, and join an
    /// array-valued `scope` with the configured separator. String scopes
    /// pass through unchanged.
    pub fn new(options: &ClientOptions, base: TokenParams, user: TokenParams) -> Self {
        let mut params = base;
        for (name, value) in user {
            params.insert(name, value);
        }

        let joined = match params.get(SCOPE_PARAM) {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(scalar_value)
                    .collect::<Vec<_>>()
                    .join(&options.scope_separator),
            ),
            _ => None,
        };
        if let Some(scope) = joined {
            params.insert(SCOPE_PARAM.to_string(), Value::String(scope));
        }

        Self { params }
    }

    /// Parameters for the named grant. The canonical grant name is injected
    /// as `grant_type` unless the caller supplies an override, which permits
    /// custom grant variants for non-standard servers.
    pub fn for_grant_type(grant_type: &str, options: &ClientOptions, user: TokenParams) -> Self {
        let mut base = TokenParams::new();
        base.insert(
            GRANT_TYPE_PARAM.to_string(),
            Value::String(grant_type.to_string()),
        );
        Self::new(options, base, user)
    }

    /// Consume the builder, yielding the wire parameter set.
    pub fn into_params(self) -> TokenParams {
        self.params
    }
}

/// Wire representation of a scalar parameter value.
pub(crate) fn scalar_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
