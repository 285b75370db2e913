//! Signed account queries.
//!
//! | Operation        | Method | Path                                  |
//! |------------------|--------|---------------------------------------|
//! | Balance          | GET    | `/openApi/swap/v3/user/balance`       |
//! | Positions        | GET    | `/openApi/swap/v2/user/positions`     |
//! | Income history   | GET    | `/openApi/swap/v2/user/income`        |
//! | Commission rate  | GET    | `/openApi/swap/v2/user/commissionRate`|

use bx_core::enums::ClientMode;
use bx_core::error::BxError;
use bx_core::trading::IncomeQuery;
use bx_core::to_exchange_symbol;
use tracing::{info, warn};

use super::SignedApiClient;
use crate::request::{Method, RequestSpec};
use crate::response::ApiResponse;

const BALANCE: &str = "/openApi/swap/v3/user/balance";
const POSITIONS: &str = "/openApi/swap/v2/user/positions";
const INCOME: &str = "/openApi/swap/v2/user/income";
const COMMISSION_RATE: &str = "/openApi/swap/v2/user/commissionRate";

impl SignedApiClient {
    /// Perpetual account balance and margin summary.
    pub async fn get_balance(&self) -> Result<ApiResponse, BxError> {
        self.execute(RequestSpec::signed(Method::Get, BALANCE)).await
    }

    /// Open positions, optionally for a single symbol.
    pub async fn get_positions(&self, symbol: Option<&str>) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Get, POSITIONS).opt_param("symbol", symbol.map(to_exchange_symbol));
        self.execute(spec).await
    }

    /// Realised PnL, funding fees and trading fees.
    pub async fn get_income_history(&self, query: &IncomeQuery) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Get, INCOME)
            .opt_param("symbol", query.symbol.as_deref().map(to_exchange_symbol))
            .opt_param("incomeType", query.income_type.as_deref())
            .opt_param("startTime", query.start_time)
            .opt_param("endTime", query.end_time)
            .opt_param("limit", query.limit);
        self.execute(spec).await
    }

    /// Maker / taker fee rates for this account.
    pub async fn get_commission_rate(&self) -> Result<ApiResponse, BxError> {
        self.execute(RequestSpec::signed(Method::Get, COMMISSION_RATE)).await
    }

    /// Probe the credentials with a balance query.
    ///
    /// Returns `Ok(false)` when the exchange rejects the keys (provider error
    /// code, or HTTP 401/403). Transport and timeout failures are returned as
    /// errors since they say nothing about the keys. Always `Ok(true)` in DEMO.
    pub async fn validate_credentials(&self) -> Result<bool, BxError> {
        if self.mode() == ClientMode::Demo {
            return Ok(true);
        }
        match self.get_balance().await {
            Ok(_) => {
                info!("[bingx] credentials accepted");
                Ok(true)
            }
            Err(BxError::Api { code, msg }) => {
                warn!("[bingx] credentials rejected: code={code}, msg={msg}");
                Ok(false)
            }
            Err(BxError::HttpStatus { status: status @ (401 | 403), .. }) => {
                warn!("[bingx] credentials rejected: HTTP {status}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
