//! HTTP transport seam.
//!
//! [`SignedApiClient`](crate::SignedApiClient) never calls `reqwest`
//! directly; it talks to an [`HttpTransport`]. Production uses
//! [`ReqwestTransport`]; tests plug in a scripted double to count attempts
//! and observe request spacing without opening sockets.

use std::time::Duration;

use async_trait::async_trait;
use bx_core::error::BxError;

use crate::request::Method;

/// A fully built request: URL already carries the (signed) query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Raw HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Failure below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Connect or request deadline hit.
    Timeout(String),
    /// Connection never established (DNS, refused, TLS handshake); nothing
    /// reached the exchange.
    Connect(String),
    /// Failure after the request may have been sent (reset, body read).
    Network(String),
}

impl TransportFailure {
    /// Whether the exchange may have received the request.
    pub fn may_have_been_sent(&self) -> bool {
        !matches!(self, Self::Connect(_))
    }
}

/// Sends one HTTP request. Implementations must not retry on their own.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

// ---------------------------------------------------------------------------
// reqwest
// ---------------------------------------------------------------------------

/// [`HttpTransport`] backed by a pooled `reqwest::Client`.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with the given request and connect timeouts.
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Result<Self, BxError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| BxError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.send().await.map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

/// Map a reqwest error onto the transport failure kinds.
///
/// The URL is stripped so signed query strings never end up in error text.
fn classify(err: reqwest::Error) -> TransportFailure {
    let timed_out = err.is_timeout();
    let connect = err.is_connect();
    let text = err.without_url().to_string();
    if timed_out {
        TransportFailure::Timeout(text)
    } else if connect {
        TransportFailure::Connect(text)
    } else {
        TransportFailure::Network(text)
    }
}

// ---------------------------------------------------------------------------
// Test double
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use tokio::time::Instant;

    use super::*;

    /// One recorded attempt.
    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub request: HttpRequest,
        pub at: Instant,
    }

    /// Replays scripted outcomes in order; the last one repeats forever.
    pub struct ScriptedTransport {
        script: Mutex<VecDeque<Result<HttpResponse, TransportFailure>>>,
        last: Mutex<Option<Result<HttpResponse, TransportFailure>>>,
        calls: Mutex<Vec<Recorded>>,
    }

    impl ScriptedTransport {
        pub fn new(script: Vec<Result<HttpResponse, TransportFailure>>) -> Self {
            Self { script: Mutex::new(script.into()), last: Mutex::new(None), calls: Mutex::new(Vec::new()) }
        }

        /// Always answers `status` with `body`.
        pub fn always(status: u16, body: &str) -> Self {
            Self::new(vec![reply(status, body)])
        }

        pub fn calls(&self) -> Vec<Recorded> {
            self.calls.lock().unwrap().clone()
        }

        pub fn attempts(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    pub fn reply(status: u16, body: &str) -> Result<HttpResponse, TransportFailure> {
        Ok(HttpResponse { status, body: body.to_string() })
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
            self.calls.lock().unwrap().push(Recorded { request, at: Instant::now() });
            let next = self.script.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            match next {
                Some(outcome) => {
                    *last = Some(outcome.clone());
                    outcome
                }
                None => last.clone().unwrap_or_else(|| Err(TransportFailure::Network("script exhausted".into()))),
            }
        }
    }

    /// Fails the test on any call.
    pub struct NoNetwork;

    #[async_trait]
    impl HttpTransport for NoNetwork {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
            panic!("network access attempted: {} {}", request.method, request.url);
        }
    }
}
