//! Response coercion at the gateway boundary.
//!
//! Every service body is untyped JSON. These helpers turn it into the typed
//! contracts the rest of the crate uses, so nothing deeper in the stack ever
//! sees a `serde_json::Value`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::types::errors::GatewayError;

/// Error body the service sends alongside non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// A decoded response: either the expected payload or the service's error.
#[derive(Debug)]
pub enum ApiResponse<T> {
    Success(T),
    Failure { status: u16, body: ErrorBody },
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, GatewayError> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::Failure { status: 401, .. } => Err(GatewayError::Unauthorized),
            ApiResponse::Failure { status, body } => Err(GatewayError::Service {
                status,
                message: body.message,
            }),
        }
    }
}

/// Classifies a raw status + body pair.
pub fn classify(status: u16, body: &str) -> ApiResponse<Value> {
    if (200..300).contains(&status) {
        let value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
        };
        ApiResponse::Success(value)
    } else {
        let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
        ApiResponse::Failure {
            status,
            body: parsed,
        }
    }
}

/// Decodes a single object payload.
pub fn decode_one<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Decodes a list payload, tolerating malformed bodies.
///
/// A body that is not a JSON array yields an empty list. Individual elements
/// that fail to decode are skipped.
pub fn coerce_list<T: DeserializeOwned>(what: &str, value: Value) -> Vec<T> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            warn!(what, kind = json_kind(&other), "expected a list payload, using empty list");
            return Vec::new();
        }
    };

    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(what, error = %e, "skipping malformed list element");
                None
            }
        })
        .collect();

    if decoded.len() != total {
        warn!(what, total, kept = decoded.len(), "list payload partially decoded");
    }
    decoded
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
