//! Configuration for the BingX REST client.
//!
//! A [`ClientConfig`] is built once by the caller and handed to the client
//! constructor. It can be deserialized from a JSON file, overridden from
//! environment variables, or assembled in code. Every field except the keys
//! has a production default, so an empty `{}` file is a valid config.
//!
//! # Example config
//!
//! ```json
//! {
//!   "api_key": "...",
//!   "secret_key": "...",
//!   "mode": "live",
//!   "rate_limit_delay_ms": 200,
//!   "request_timeout_secs": 30,
//!   "log_file": "/tmp/log/bingx.log"
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::enums::ClientMode;
use crate::error::BxError;

/// Production REST host.
pub const DEFAULT_BASE_URL: &str = "https://open-api.bingx.com";

/// Upper bound for the rate-limit gap and the backoff cap (one minute).
pub const MAX_DELAY_MS: u64 = 60_000;

/// REST client configuration.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// API key sent in the `X-BX-APIKEY` header.
    #[serde(default)]
    pub api_key: String,

    /// Secret key used only for HMAC signing.
    #[serde(default)]
    pub secret_key: String,

    /// REST base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// LIVE talks to the exchange, DEMO serves fixtures.
    #[serde(default)]
    pub mode: ClientMode,

    // -- Timing --
    /// Minimum gap between the end of one request and the start of the next.
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Overall per-attempt request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TCP/TLS connection establishment timeout.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// `recvWindow` for signed requests (milliseconds, 0 = omitted).
    #[serde(default)]
    pub recv_window: u64,

    // -- Retry --
    /// Total attempts per request, first one included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First backoff delay; doubles after every failed attempt.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Backoff cap.
    #[serde(default = "default_retry_backoff_max_ms")]
    pub retry_backoff_max_ms: u64,

    // -- Logging --
    /// Default level if `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional log file path.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            base_url: default_base_url(),
            mode: ClientMode::default(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            recv_window: 0,
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            retry_backoff_max_ms: default_retry_backoff_max_ms(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &crate::mask_key(&self.api_key))
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .field("rate_limit_delay_ms", &self.rate_limit_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("recv_window", &self.recv_window)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("retry_backoff_max_ms", &self.retry_backoff_max_ms)
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl ClientConfig {
    /// Demo-mode config with no credentials.
    pub fn demo() -> Self {
        Self { mode: ClientMode::Demo, ..Self::default() }
    }

    /// Defaults, then environment overrides from the process environment.
    pub fn from_env() -> Result<Self, BxError> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Override fields from environment-style variables.
    ///
    /// `lookup` maps a variable name to its value; passing a closure over a
    /// map keeps tests independent of the real process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), BxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BINGX_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = lookup("BINGX_SECRET_KEY") {
            self.secret_key = v;
        }
        if let Some(v) = lookup("BINGX_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("BINGX_DEMO_MODE") {
            self.mode = if v.trim().eq_ignore_ascii_case("true") { ClientMode::Demo } else { ClientMode::Live };
        }
        if let Some(v) = lookup("RATE_LIMIT_DELAY") {
            // Seconds, fractional allowed (e.g. "0.2").
            let secs: f64 = parse_env("RATE_LIMIT_DELAY", &v)?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(BxError::Configuration(format!("RATE_LIMIT_DELAY must be >= 0, got {v}")));
            }
            self.rate_limit_delay_ms = (secs * 1000.0).round() as u64;
            check_delay("RATE_LIMIT_DELAY", self.rate_limit_delay_ms)?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT") {
            self.request_timeout_secs = parse_env("REQUEST_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("CONNECTION_TIMEOUT") {
            self.connect_timeout_secs = parse_env("CONNECTION_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("MAX_RETRIES") {
            self.max_attempts = parse_env("MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("RETRY_BACKOFF_MS") {
            self.retry_backoff_ms = parse_env("RETRY_BACKOFF_MS", &v)?;
            check_delay("RETRY_BACKOFF_MS", self.retry_backoff_ms)?;
        }
        if let Some(v) = lookup("BINGX_RECV_WINDOW") {
            self.recv_window = parse_env("BINGX_RECV_WINDOW", &v)?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v.to_lowercase();
        }
        if let Some(v) = lookup("LOG_FILE") {
            self.log_file = if v.is_empty() { None } else { Some(v) };
        }
        Ok(())
    }

    /// Reject delays that would stall a call for more than [`MAX_DELAY_MS`].
    pub fn validate_limits(&self) -> Result<(), BxError> {
        check_delay("rate_limit_delay_ms", self.rate_limit_delay_ms)?;
        check_delay("retry_backoff_ms", self.retry_backoff_ms)?;
        check_delay("retry_backoff_max_ms", self.retry_backoff_max_ms)
    }

    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn is_demo(&self) -> bool {
        self.mode == ClientMode::Demo
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, BxError> {
    value
        .trim()
        .parse()
        .map_err(|_| BxError::Configuration(format!("{name} has an invalid value: {value:?}")))
}

fn check_delay(name: &str, ms: u64) -> Result<(), BxError> {
    if ms > MAX_DELAY_MS {
        return Err(BxError::Configuration(format!("{name} must be at most {MAX_DELAY_MS} ms, got {ms}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Default helpers (used by serde)
// ---------------------------------------------------------------------------

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_rate_limit_delay_ms() -> u64 {
    200
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_retry_backoff_max_ms() -> u64 {
    8_000
}

fn default_log_level() -> String {
    "info".into()
}

/// Load and parse a JSON config file.
pub fn load_config(path: &Path) -> Result<ClientConfig, BxError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| BxError::Configuration(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| BxError::Configuration(format!("cannot parse {}: {e}", path.display())))
}
