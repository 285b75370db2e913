//! Request description handed to [`SignedApiClient::execute`](crate::SignedApiClient::execute).
//!
//! A [`RequestSpec`] is built per call by a typed operation and consumed by
//! the call. Parameters live in a `BTreeMap`, so iteration order is always the
//! byte-order sort the signature canonicalisation needs.

use std::collections::BTreeMap;

/// Request parameters, sorted by key (byte order).
pub type Params = BTreeMap<String, String>;

/// HTTP method of a REST call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One REST call: method, path, parameters, and whether it must be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path below the base URL, starting with `/`.
    pub path: String,
    pub params: Params,
    /// Account / trade endpoints are signed; public market data is not.
    pub signed: bool,
    /// Safe to resend after a failure that may have reached the exchange.
    /// Order placement is not: a timed-out POST may already have filled.
    pub idempotent: bool,
}

impl RequestSpec {
    /// Signed request (account or trade state).
    pub fn signed(method: Method, path: &str) -> Self {
        Self { method, path: path.to_string(), params: Params::new(), signed: true, idempotent: true }
    }

    /// Unsigned public request (market data).
    pub fn public(method: Method, path: &str) -> Self {
        Self { method, path: path.to_string(), params: Params::new(), signed: false, idempotent: true }
    }

    /// Mark the call as state-changing: retried only when the request
    /// provably never left (connect failure) or the exchange refused it
    /// with a retryable status.
    pub fn non_idempotent(mut self) -> Self {
        self.idempotent = false;
        self
    }

    /// Add a parameter, replacing any earlier value for the same key.
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a parameter only when `value` is `Some`.
    pub fn opt_param<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }
}
