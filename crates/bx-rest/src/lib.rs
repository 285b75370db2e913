//! # bx-rest
//!
//! Signed REST client for BingX perpetual swaps.
//!
//! [`SignedApiClient`] builds public and signed requests, signs them with
//! HMAC-SHA256, serializes them through a per-client rate gate, retries
//! transient failures a bounded number of times, and normalises every reply
//! into an [`ApiResponse`]. In DEMO mode it serves static fixtures and never
//! touches the network.
//!
//! ## Modules
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | `bingx`      | the client, credentials/signing, fixtures, endpoints|
//! | `request`    | `RequestSpec`, `Method`, sorted `Params`            |
//! | `response`   | `ApiResponse` and the status/body policy            |
//! | `transport`  | `HttpTransport` seam and the `reqwest` backend      |
//! | `rate_limit` | minimum-interval gate                               |
//! | `retry`      | attempt bound and exponential backoff               |
//!
//! ## Example
//!
//! ```no_run
//! # async fn run() -> Result<(), bx_core::error::BxError> {
//! let config = bx_core::config::ClientConfig::from_env()?;
//! let client = bx_rest::SignedApiClient::new(config)?;
//! let balance = client.get_balance().await?;
//! println!("{}", balance.data);
//! # Ok(())
//! # }
//! ```

pub mod bingx;
pub mod rate_limit;
pub mod request;
pub mod response;
pub mod retry;
pub mod transport;

pub use bingx::SignedApiClient;
pub use bingx::auth::sign;
pub use request::{Method, Params, RequestSpec};
pub use response::ApiResponse;
pub use transport::HttpTransport;
