//! Public market data. Unsigned, but still rate limited and retried.
//! Covers time, contracts, candles, depth, tickers, trades, funding and open interest.

use bx_core::error::BxError;
use bx_core::to_exchange_symbol;

use super::SignedApiClient;
use crate::request::{Method, RequestSpec};
use crate::response::ApiResponse;

const SERVER_TIME: &str = "/openApi/swap/v2/server/time";
const CONTRACTS: &str = "/openApi/swap/v2/quote/contracts";
const KLINES: &str = "/openApi/swap/v2/quote/klines";
const DEPTH: &str = "/openApi/swap/v2/quote/depth";
const TICKER_PRICE: &str = "/openApi/swap/v1/ticker/price";
const TICKER_24HR: &str = "/openApi/swap/v2/quote/ticker";
const RECENT_TRADES: &str = "/openApi/swap/v2/quote/trades";
const PREMIUM_INDEX: &str = "/openApi/swap/v2/quote/premiumIndex";
const OPEN_INTEREST: &str = "/openApi/swap/v2/quote/openInterest";

/// Depth levels the order book endpoint accepts.
const DEPTH_LIMITS: &[u32] = &[5, 10, 20, 50, 100, 500, 1000];

/// Upper bound on klines / trades per call.
const MAX_ROWS: u32 = 1440;

impl SignedApiClient {
    pub async fn get_server_time(&self) -> Result<ApiResponse, BxError> {
        self.execute(RequestSpec::public(Method::Get, SERVER_TIME)).await
    }

    /// Contract specifications for every listed perpetual.
    pub async fn get_contracts(&self) -> Result<ApiResponse, BxError> {
        self.execute(RequestSpec::public(Method::Get, CONTRACTS)).await
    }

    /// Candles for `symbol`, newest last. `limit` is clamped to `1..=1440`.
    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::public(Method::Get, KLINES)
            .param("symbol", to_exchange_symbol(symbol))
            .param("interval", interval)
            .param("limit", limit.clamp(1, MAX_ROWS));
        self.execute(spec).await
    }

    /// Order book snapshot. `limit` is rounded up to the next accepted level.
    pub async fn get_depth(&self, symbol: &str, limit: u32) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::public(Method::Get, DEPTH)
            .param("symbol", to_exchange_symbol(symbol))
            .param("limit", depth_level(limit));
        self.execute(spec).await
    }

    /// Latest price for `symbol`, or for every contract.
    pub async fn get_ticker_price(&self, symbol: Option<&str>) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::public(Method::Get, TICKER_PRICE).opt_param("symbol", symbol.map(to_exchange_symbol));
        self.execute(spec).await
    }

    /// Rolling 24h statistics.
    pub async fn get_24hr_ticker(&self, symbol: Option<&str>) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::public(Method::Get, TICKER_24HR).opt_param("symbol", symbol.map(to_exchange_symbol));
        self.execute(spec).await
    }

    pub async fn get_recent_trades(&self, symbol: &str, limit: u32) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::public(Method::Get, RECENT_TRADES)
            .param("symbol", to_exchange_symbol(symbol))
            .param("limit", limit.clamp(1, MAX_ROWS));
        self.execute(spec).await
    }

    /// Mark price, index price, and the current funding rate.
    pub async fn get_funding_rate(&self, symbol: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::public(Method::Get, PREMIUM_INDEX).param("symbol", to_exchange_symbol(symbol));
        self.execute(spec).await
    }

    /// Total open contracts on `symbol`.
    pub async fn get_open_interest(&self, symbol: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::public(Method::Get, OPEN_INTEREST).param("symbol", to_exchange_symbol(symbol));
        self.execute(spec).await
    }
}

fn depth_level(limit: u32) -> u32 {
    DEPTH_LIMITS.iter().copied().find(|&l| l >= limit).unwrap_or(1000)
}
