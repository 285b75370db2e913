//! Normalised response shape and body interpretation.
//!
//! Every success path returns an [`ApiResponse`]; every failure path returns a
//! [`BxError`]. [`interpret`] is the single place where an HTTP status and a
//! body become one or the other, and both live and demo responses go through
//! it, so the parse policy is identical for every endpoint.
//!
//! # Policy
//!
//! | Status | Body                          | Result                          |
//! |--------|-------------------------------|---------------------------------|
//! | 2xx    | empty                         | `Ok`: code 0, `"success"`, `{}` |
//! | 2xx    | not JSON                      | `Err(MalformedResponse)`        |
//! | 2xx    | `{code != 0, msg}`            | `Err(Api)`                      |
//! | 2xx    | `{code: 0, msg, data}`        | `Ok`                            |
//! | 2xx    | JSON without `code`           | `Ok`: whole value as `data`     |
//! | other  | `{code != 0, msg}`            | `Err(Api)`                      |
//! | other  | anything else                 | `Err(HttpStatus)`               |

use bx_core::error::BxError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest raw body carried inside an error.
const MAX_ERROR_BODY: usize = 512;

/// Normalised `{code, msg, data}` result of one API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Provider status code; always 0 on a returned response.
    pub code: i64,
    /// Provider message.
    pub msg: String,
    /// Payload (object or array).
    pub data: Value,
}

impl ApiResponse {
    /// Response used for 2xx replies with no body (some PUT/DELETE calls).
    pub fn empty_success() -> Self {
        Self { code: 0, msg: "success".into(), data: Value::Object(Default::default()) }
    }

    /// Build from a parsed JSON body.
    ///
    /// Bodies that carry a `code` field are read as the provider envelope;
    /// anything else is wrapped whole as `data`.
    pub fn from_value(value: Value) -> Self {
        let Some(code) = envelope_code(&value) else {
            return Self { code: 0, msg: String::new(), data: value };
        };
        let msg = value.get("msg").and_then(Value::as_str).unwrap_or_default().to_string();
        let data = match value.get("data") {
            Some(Value::Null) | None => Value::Object(Default::default()),
            Some(v) => v.clone(),
        };
        Self { code, msg, data }
    }

    /// Deserialize the payload into a typed value.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, BxError> {
        serde_json::from_value(self.data.clone()).map_err(|e| BxError::MalformedResponse {
            status: 200,
            body: truncate(&format!("data does not match the expected shape: {e}")),
        })
    }

    fn into_result(self) -> Result<Self, BxError> {
        if self.code == 0 {
            Ok(self)
        } else {
            Err(BxError::Api { code: self.code, msg: self.msg })
        }
    }
}

/// Turn an HTTP status and raw body into a response or a typed error.
pub fn interpret(status: u16, body: &str) -> Result<ApiResponse, BxError> {
    let trimmed = body.trim();

    if (200..300).contains(&status) {
        if trimmed.is_empty() {
            return Ok(ApiResponse::empty_success());
        }
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|_| BxError::MalformedResponse { status, body: truncate(trimmed) })?;
        return ApiResponse::from_value(value).into_result();
    }

    // Error statuses sometimes still carry the provider envelope.
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let parsed = ApiResponse::from_value(value);
        if parsed.code != 0 {
            return Err(BxError::Api { code: parsed.code, msg: parsed.msg });
        }
    }
    Err(BxError::HttpStatus { status, body: truncate(trimmed) })
}

/// `code` as an integer, accepting numeric strings.
fn envelope_code(value: &Value) -> Option<i64> {
    match value.get("code")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Cap a body for inclusion in an error, on a char boundary.
fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
