//! BingX perpetual-swap REST client.
//!
//! [`SignedApiClient`] is the one call-in surface for the rest of the
//! system: construct it from a [`ClientConfig`], call a typed operation, get
//! back an [`ApiResponse`] or a [`BxError`].
//!
//! # Architecture
//!
//! ```text
//! typed operation (account / trade / market / listen_key)
//!   └── RequestSpec { method, path, params, signed }
//!         └── execute
//!               ├── DEMO: demo::respond(path)        (no I/O)
//!               └── LIVE: RateGate ─► sign ─► HttpTransport ─► retry ─► interpret
//! ```
//!
//! All operations take `&self`; a client can be shared behind an `Arc`.
//! Concurrent callers serialize on the rate gate.

pub mod account;
pub mod auth;
pub mod demo;
pub mod listen_key;
pub mod market;
pub mod trade;

use std::sync::Arc;

use bx_core::config::ClientConfig;
use bx_core::enums::ClientMode;
use bx_core::error::BxError;
use tracing::{debug, error, info, warn};

use self::auth::{API_KEY_HEADER, Credentials};
use crate::rate_limit::RateGate;
use crate::request::RequestSpec;
use crate::response::{ApiResponse, interpret};
use crate::retry::RetryPolicy;
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport, TransportFailure};

/// Signed REST client with rate limiting, bounded retry, and demo mode.
pub struct SignedApiClient {
    mode: ClientMode,
    credentials: Credentials,
    /// Base URL without trailing `/`.
    base_url: String,
    /// `recvWindow` for signed requests (0 = omitted).
    recv_window: u64,
    retry: RetryPolicy,
    gate: RateGate,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for SignedApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedApiClient")
            .field("mode", &self.mode)
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("rate_limit", &self.gate.interval())
            .finish()
    }
}

impl SignedApiClient {
    /// Create a client backed by `reqwest`.
    ///
    /// # Errors
    ///
    /// [`BxError::Configuration`] when LIVE credentials are empty or
    /// placeholders, when the base URL is invalid, when a delay exceeds
    /// [`MAX_DELAY_MS`](bx_core::config::MAX_DELAY_MS), or when the HTTP
    /// client cannot be built. No network access happens here.
    pub fn new(config: ClientConfig) -> Result<Self, BxError> {
        let transport = ReqwestTransport::new(config.request_timeout(), config.connect_timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Result<Self, BxError> {
        config.validate_limits()?;
        let credentials = Credentials::new(&config.api_key, &config.secret_key);
        if config.mode == ClientMode::Live {
            credentials.validate()?;
        }
        let base_url = normalize_base_url(&config.base_url)?;

        info!(
            "[bingx] client ready: mode={}, base_url={base_url}, key={}",
            config.mode,
            bx_core::mask_key(credentials.api_key()),
        );

        Ok(Self {
            mode: config.mode,
            credentials,
            base_url,
            recv_window: config.recv_window,
            retry: RetryPolicy::from_config(&config),
            gate: RateGate::new(config.rate_limit_delay()),
            transport,
        })
    }

    pub fn mode(&self) -> ClientMode {
        self.mode
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one request and normalise the outcome.
    pub async fn execute(&self, spec: RequestSpec) -> Result<ApiResponse, BxError> {
        match self.mode {
            ClientMode::Demo => {
                debug!("[bingx] demo {} {}", spec.method, spec.path);
                demo::respond(&spec.path)
            }
            ClientMode::Live => self.execute_live(spec).await,
        }
    }

    async fn execute_live(&self, spec: RequestSpec) -> Result<ApiResponse, BxError> {
        let _permit = self.gate.acquire().await;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            // Fresh timestamp and signature on every attempt.
            let request = self.build_request(&spec);
            debug!("[bingx] {} {} attempt={attempt}", spec.method, spec.path);

            let outcome = self.transport.send(request).await;
            let can_retry = self.retry.should_retry(attempt);

            match outcome {
                Ok(resp) if RetryPolicy::is_retryable_status(resp.status) && can_retry => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "[bingx] {} {} returned HTTP {}, retrying in {delay:?} ({attempt}/{})",
                        spec.method, spec.path, resp.status, self.retry.max_attempts,
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(resp) => {
                    let result = interpret(resp.status, &resp.body);
                    if let Err(ref e) = result {
                        warn!("[bingx] {} {} failed: {e}", spec.method, spec.path);
                    }
                    return result;
                }
                Err(failure) if can_retry && (spec.idempotent || !failure.may_have_been_sent()) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "[bingx] {} {} transport failure: {failure:?}, retrying in {delay:?} ({attempt}/{})",
                        spec.method, spec.path, self.retry.max_attempts,
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => {
                    error!("[bingx] {} {} gave up after {attempt} attempt(s): {failure:?}", spec.method, spec.path);
                    return Err(match failure {
                        TransportFailure::Timeout(msg) => {
                            BxError::Timeout(format!("{} {} after {attempt} attempt(s): {msg}", spec.method, spec.path))
                        }
                        TransportFailure::Connect(msg) | TransportFailure::Network(msg) => {
                            BxError::Transport(format!("{} {} after {attempt} attempt(s): {msg}", spec.method, spec.path))
                        }
                    });
                }
            }
        }
    }

    /// Complete `spec` into a wire request.
    ///
    /// `timestamp` is injected into every live request, replacing any
    /// caller value, and a caller-supplied `signature` is dropped. For signed
    /// requests `recvWindow` joins next, then the signature is computed over
    /// the full set and appended as the last query parameter.
    fn build_request(&self, spec: &RequestSpec) -> HttpRequest {
        let mut params = spec.params.clone();
        params.remove("signature");
        params.insert("timestamp".into(), bx_core::time_util::now_ms().to_string());

        let query = if spec.signed {
            if self.recv_window > 0 {
                params.insert("recvWindow".into(), self.recv_window.to_string());
            }
            let signature = self.credentials.sign(&params);
            auth::encode_query(&params, Some(&signature))
        } else {
            auth::encode_query(&params, None)
        };

        HttpRequest {
            method: spec.method,
            url: format!("{}{}?{query}", self.base_url, spec.path),
            headers: vec![(API_KEY_HEADER.to_string(), self.credentials.api_key().to_string())],
        }
    }
}

/// Validate an absolute `http(s)` base URL and strip the trailing `/`.
fn normalize_base_url(raw: &str) -> Result<String, BxError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| BxError::Configuration(format!("invalid base URL {trimmed:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(BxError::Configuration(format!("base URL must be http(s) with a host: {trimmed:?}")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::request::Method;
    use crate::transport::mock::{NoNetwork, ScriptedTransport, reply};

    pub(crate) const OK_BODY: &str = r#"{"code":0,"msg":"","data":{"ok":true}}"#;

    pub(crate) fn live_config() -> ClientConfig {
        ClientConfig {
            api_key: "test-api-key-0001".into(),
            secret_key: "test_secret".into(),
            ..ClientConfig::default()
        }
    }

    pub(crate) fn live_client(transport: Arc<ScriptedTransport>) -> SignedApiClient {
        SignedApiClient::with_transport(live_config(), transport).unwrap()
    }

    /// Parse the query string of a recorded URL into ordered pairs.
    pub(crate) fn query_pairs(url: &str) -> Vec<(String, String)> {
        url::Url::parse(url).unwrap().query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
    }

    fn demo_client() -> SignedApiClient {
        SignedApiClient::with_transport(ClientConfig::demo(), Arc::new(NoNetwork)).unwrap()
    }

    // -- construction ------------------------------------------------------

    #[test]
    fn placeholder_secret_is_configuration_error() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let config = ClientConfig { secret_key: "YOUR_SECRET_KEY_HERE".into(), ..live_config() };
        let err = SignedApiClient::with_transport(config, transport.clone()).unwrap_err();
        assert!(matches!(err, BxError::Configuration(_)));
        assert_eq!(transport.attempts(), 0);
    }

    #[test]
    fn empty_key_is_configuration_error_in_live_only() {
        let config = ClientConfig { api_key: String::new(), ..live_config() };
        assert!(SignedApiClient::with_transport(config, Arc::new(NoNetwork)).is_err());
        assert!(SignedApiClient::with_transport(ClientConfig::demo(), Arc::new(NoNetwork)).is_ok());
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let config = ClientConfig { base_url: "open-api.bingx.com".into(), ..live_config() };
        assert!(matches!(
            SignedApiClient::with_transport(config, Arc::new(NoNetwork)),
            Err(BxError::Configuration(_))
        ));
        let config = ClientConfig { base_url: "ftp://open-api.bingx.com".into(), ..live_config() };
        assert!(SignedApiClient::with_transport(config, Arc::new(NoNetwork)).is_err());
    }

    #[test]
    fn unbounded_rate_limit_is_rejected() {
        let config = ClientConfig { rate_limit_delay_ms: u64::MAX, ..live_config() };
        let err = SignedApiClient::with_transport(config, Arc::new(NoNetwork)).unwrap_err();
        assert!(matches!(err, BxError::Configuration(_)));

        let config = ClientConfig { retry_backoff_max_ms: u64::MAX, ..ClientConfig::demo() };
        assert!(SignedApiClient::with_transport(config, Arc::new(NoNetwork)).is_err());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig { base_url: "https://open-api-vst.bingx.com/".into(), ..live_config() };
        let client = SignedApiClient::with_transport(config, Arc::new(NoNetwork)).unwrap();
        assert_eq!(client.base_url(), "https://open-api-vst.bingx.com");
    }

    #[test]
    fn debug_never_prints_secret() {
        let client = live_client(Arc::new(ScriptedTransport::always(200, OK_BODY)));
        let text = format!("{client:?}");
        assert!(!text.contains("test_secret"));
        assert!(!text.contains("test-api-key-0001"));
    }

    // -- demo mode ---------------------------------------------------------

    #[tokio::test]
    async fn demo_balance_is_stable_and_offline() {
        let client = demo_client();
        let a = client.get_balance().await.unwrap();
        let b = client.get_balance().await.unwrap();
        let c = client.get_balance().await.unwrap();
        let bytes = |r: &ApiResponse| serde_json::to_vec(r).unwrap();
        assert_eq!(bytes(&a), bytes(&b));
        assert_eq!(bytes(&b), bytes(&c));
    }

    #[tokio::test]
    async fn demo_records_no_attempts() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let client = SignedApiClient::with_transport(ClientConfig::demo(), transport.clone()).unwrap();
        client.get_positions(None).await.unwrap();
        client.get_klines("BTCUSDT", "1m", 3).await.unwrap();
        client.create_listen_key().await.unwrap();
        assert_eq!(transport.attempts(), 0);
    }

    // -- signing on the wire -----------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn signed_request_carries_timestamp_then_signature() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let client = live_client(transport.clone());
        let spec = RequestSpec::signed(Method::Get, "/openApi/swap/v2/user/positions").param("symbol", "BTC-USDT");
        client.execute(spec).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        let req = &calls[0].request;
        assert!(req.url.starts_with("https://open-api.bingx.com/openApi/swap/v2/user/positions?"));
        assert_eq!(req.headers, vec![(API_KEY_HEADER.to_string(), "test-api-key-0001".to_string())]);
        assert!(!req.url.contains("test_secret"));
        assert!(!req.url.contains("test-api-key-0001"));

        let pairs = query_pairs(&req.url);
        let (last_key, signature) = pairs.last().unwrap();
        assert_eq!(last_key, "signature");
        assert!(pairs.iter().any(|(k, _)| k == "timestamp"));

        // The signature covers exactly the other transmitted parameters.
        let signed: crate::request::Params =
            pairs[..pairs.len() - 1].iter().cloned().collect();
        assert_eq!(*signature, auth::sign(&signed, "test_secret"));
    }

    #[tokio::test(start_paused = true)]
    async fn caller_signature_is_replaced() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let client = live_client(transport.clone());
        let spec = RequestSpec::signed(Method::Get, "/openApi/swap/v2/user/positions")
            .param("signature", "forged")
            .param("timestamp", "1");
        client.execute(spec).await.unwrap();

        let pairs = query_pairs(&transport.calls()[0].request.url);
        assert_eq!(pairs.iter().filter(|(k, _)| k == "signature").count(), 1);
        assert_eq!(pairs.iter().filter(|(k, _)| k == "timestamp").count(), 1);
        assert!(!pairs.iter().any(|(_, v)| v == "forged" || v == "1"));
        let signed: crate::request::Params = pairs[..pairs.len() - 1].iter().cloned().collect();
        assert_eq!(pairs.last().unwrap().1, auth::sign(&signed, "test_secret"));
    }

    #[tokio::test(start_paused = true)]
    async fn recv_window_is_signed() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let config = ClientConfig { recv_window: 5000, ..live_config() };
        let client = SignedApiClient::with_transport(config, transport.clone()).unwrap();
        client.get_balance().await.unwrap();

        let pairs = query_pairs(&transport.calls()[0].request.url);
        assert!(pairs.contains(&("recvWindow".to_string(), "5000".to_string())));
        let signed: crate::request::Params = pairs[..pairs.len() - 1].iter().cloned().collect();
        assert_eq!(pairs.last().unwrap().1, auth::sign(&signed, "test_secret"));
    }

    #[tokio::test(start_paused = true)]
    async fn public_request_has_timestamp_but_no_signature() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let client = live_client(transport.clone());
        client.get_depth("BTCUSDT", 5).await.unwrap();

        let pairs = query_pairs(&transport.calls()[0].request.url);
        assert!(pairs.iter().any(|(k, _)| k == "timestamp"));
        assert!(!pairs.iter().any(|(k, _)| k == "signature"));
        assert!(pairs.contains(&("symbol".to_string(), "BTC-USDT".to_string())));
    }

    // -- retry -------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn retries_503_then_succeeds() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply(503, "busy"), reply(200, OK_BODY)]));
        let client = live_client(transport.clone());
        let resp = client.get_balance().await.unwrap();
        assert_eq!(resp.data["ok"], true);
        assert_eq!(transport.attempts(), 2);

        let calls = transport.calls();
        assert!(calls[1].at - calls[0].at >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_status_is_single_attempt() {
        let transport = Arc::new(ScriptedTransport::always(404, "Not Found"));
        let client = live_client(transport.clone());
        let err = client.get_balance().await.unwrap_err();
        assert!(matches!(err, BxError::HttpStatus { status: 404, .. }));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retryable_status_exhausts_attempts() {
        let transport = Arc::new(ScriptedTransport::always(502, "Bad Gateway"));
        let client = live_client(transport.clone());
        let err = client.get_balance().await.unwrap_err();
        assert!(matches!(err, BxError::HttpStatus { status: 502, .. }));
        assert_eq!(transport.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failure_becomes_transport_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportFailure::Network(
            "connection refused".into(),
        ))]));
        let client = live_client(transport.clone());
        let err = client.get_balance().await.unwrap_err();
        assert!(matches!(err, BxError::Transport(_)));
        assert!(err.is_transient());
        assert_eq!(transport.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_becomes_timeout_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportFailure::Timeout(
            "operation timed out".into(),
        ))]));
        let client = live_client(transport.clone());
        let err = client.get_ticker_price(Some("BTCUSDT")).await.unwrap_err();
        assert!(matches!(err, BxError::Timeout(_)));
        assert_eq!(transport.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_then_success() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportFailure::Network("reset".into())),
            reply(200, OK_BODY),
        ]));
        let client = live_client(transport.clone());
        assert!(client.get_balance().await.is_ok());
        assert_eq!(transport.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn each_attempt_is_signed_fresh() {
        let transport = Arc::new(ScriptedTransport::new(vec![reply(429, ""), reply(200, OK_BODY)]));
        let client = live_client(transport.clone());
        client.get_balance().await.unwrap();
        for call in transport.calls() {
            let pairs = query_pairs(&call.request.url);
            let signed: crate::request::Params = pairs[..pairs.len() - 1].iter().cloned().collect();
            assert_eq!(pairs.last().unwrap().1, auth::sign(&signed, "test_secret"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn state_changing_call_is_not_resent_after_timeout() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportFailure::Timeout("operation timed out".into())),
            reply(200, OK_BODY),
        ]));
        let client = live_client(transport.clone());
        let spec = RequestSpec::signed(Method::Post, "/openApi/swap/v2/trade/order").non_idempotent();
        let err = client.execute(spec).await.unwrap_err();
        assert!(matches!(err, BxError::Timeout(_)));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn state_changing_call_is_resent_after_connect_failure() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(TransportFailure::Connect("connection refused".into())),
            reply(503, "busy"),
            reply(200, OK_BODY),
        ]));
        let client = live_client(transport.clone());
        let spec = RequestSpec::signed(Method::Post, "/openApi/swap/v2/trade/order").non_idempotent();
        assert!(client.execute(spec).await.is_ok());
        assert_eq!(transport.attempts(), 3);
    }

    // -- response policy ---------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn provider_rejection_is_api_error() {
        let transport = Arc::new(ScriptedTransport::always(
            200,
            r#"{"code":100001,"msg":"Signature verification failed","data":{}}"#,
        ));
        let client = live_client(transport.clone());
        let err = client.get_balance().await.unwrap_err();
        assert_eq!(err.api_code(), Some(100001));
        assert_eq!(err.user_message(), "Signature verification failed");
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_body_policy_is_uniform() {
        let transport = Arc::new(ScriptedTransport::always(200, "not json at all"));
        let client = live_client(transport.clone());
        let results = [
            client.get_balance().await,
            client.get_ticker_price(None).await,
            client.cancel_all_open_orders("BTCUSDT").await,
            client.extend_listen_key("abc").await,
        ];
        for r in results {
            assert!(matches!(r, Err(BxError::MalformedResponse { status: 200, .. })));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_body_is_empty_success() {
        let transport = Arc::new(ScriptedTransport::always(200, ""));
        let client = live_client(transport);
        let resp = client.extend_listen_key("abc").await.unwrap();
        assert_eq!(resp, ApiResponse::empty_success());
    }

    // -- rate gate ---------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn back_to_back_calls_are_spaced() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let client = live_client(transport.clone());
        client.get_balance().await.unwrap();
        client.get_positions(None).await.unwrap();

        let calls = transport.calls();
        assert!(calls[1].at - calls[0].at >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_calls_on_one_client_are_spaced() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let client = Arc::new(live_client(transport.clone()));
        let (a, b, c) = tokio::join!(client.get_balance(), client.get_positions(None), client.get_server_time());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());

        let mut times: Vec<Instant> = transport.calls().iter().map(|c| c.at).collect();
        times.sort();
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(200));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_call_releases_the_gate() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            reply(503, "busy"),
            reply(503, "busy"),
            reply(200, OK_BODY),
        ]));
        let client = live_client(transport.clone());

        // Dropped while sleeping in the first backoff.
        let first = tokio::time::timeout(Duration::from_millis(100), client.get_balance()).await;
        assert!(first.is_err());
        let cancelled_at = Instant::now();

        assert!(client.get_balance().await.is_ok());
        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].at - cancelled_at, Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_clients_do_not_share_the_gate() {
        let transport = Arc::new(ScriptedTransport::always(200, OK_BODY));
        let first = live_client(transport.clone());
        let second = live_client(transport.clone());
        let start = Instant::now();
        first.get_balance().await.unwrap();
        second.get_balance().await.unwrap();
        assert_eq!(Instant::now(), start);
    }
}
