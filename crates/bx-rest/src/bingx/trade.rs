//! Signed trade operations.
//!
//! | Operation          | Method | Path                                      |
//! |--------------------|--------|-------------------------------------------|
//! | Place order        | POST   | `/openApi/swap/v2/trade/order`            |
//! | Test order         | POST   | `/openApi/swap/v2/trade/order/test`       |
//! | Cancel order       | DELETE | `/openApi/swap/v2/trade/order`            |
//! | Query order        | GET    | `/openApi/swap/v2/trade/order`            |
//! | Cancel all         | DELETE | `/openApi/swap/v2/trade/allOpenOrders`    |
//! | Open orders        | GET    | `/openApi/swap/v2/trade/openOrders`       |
//! | Order history      | GET    | `/openApi/swap/v2/trade/allOrders`        |
//! | Amend order        | POST   | `/openApi/swap/v1/trade/amend`            |
//! | Fills              | GET    | `/openApi/swap/v2/trade/allFillOrders`    |
//! | Close positions    | POST   | `/openApi/swap/v2/trade/closeAllPositions`|
//! | Leverage           | POST/GET | `/openApi/swap/v2/trade/leverage`       |
//! | Margin type        | POST/GET | `/openApi/swap/v2/trade/marginType`     |
//! | Batch place        | POST   | `/openApi/swap/v2/trade/batchOrders`      |
//! | Batch cancel       | DELETE | `/openApi/swap/v2/trade/batchOrders`      |
//! | Close one position | POST   | `/openApi/swap/v1/trade/closePosition`    |
//! | Isolated margin    | POST   | `/openApi/swap/v2/trade/positionMargin`   |
//! | Position mode      | POST/GET | `/openApi/swap/v1/positionSide/dual`    |
//!
//! Order placement, amend and position closing are marked non-idempotent: a
//! timeout or mid-request failure is not retried, since the first attempt may
//! already have executed. Connect failures and retryable statuses still are.

use bx_core::enums::{MarginAdjustment, MarginType, PositionSide};
use bx_core::error::BxError;
use bx_core::to_exchange_symbol;
use bx_core::trading::{AmendRequest, OrderRequest};
use tracing::info;

use super::SignedApiClient;
use crate::request::{Method, RequestSpec};
use crate::response::ApiResponse;

const ORDER: &str = "/openApi/swap/v2/trade/order";
const TEST_ORDER: &str = "/openApi/swap/v2/trade/order/test";
const ALL_OPEN_ORDERS: &str = "/openApi/swap/v2/trade/allOpenOrders";
const OPEN_ORDERS: &str = "/openApi/swap/v2/trade/openOrders";
const ALL_ORDERS: &str = "/openApi/swap/v2/trade/allOrders";
const AMEND: &str = "/openApi/swap/v1/trade/amend";
const FILL_ORDERS: &str = "/openApi/swap/v2/trade/allFillOrders";
const CLOSE_ALL_POSITIONS: &str = "/openApi/swap/v2/trade/closeAllPositions";
const LEVERAGE: &str = "/openApi/swap/v2/trade/leverage";
const MARGIN_TYPE: &str = "/openApi/swap/v2/trade/marginType";
const BATCH_ORDERS: &str = "/openApi/swap/v2/trade/batchOrders";
const CLOSE_POSITION: &str = "/openApi/swap/v1/trade/closePosition";
const POSITION_MARGIN: &str = "/openApi/swap/v2/trade/positionMargin";
const POSITION_MODE: &str = "/openApi/swap/v1/positionSide/dual";

/// Orders accepted per batch call.
pub const MAX_BATCH_ORDERS: usize = 5;

/// Flatten an order into the exchange's parameter names.
fn order_spec(path: &str, order: &OrderRequest) -> Result<RequestSpec, BxError> {
    order.validate().map_err(BxError::InvalidRequest)?;
    let spec = RequestSpec::signed(Method::Post, path)
        .param("symbol", to_exchange_symbol(&order.symbol))
        .param("side", order.side.as_str())
        .param("positionSide", order.position_side.as_str())
        .param("type", order.order_type.as_str())
        .param("quantity", order.quantity.trim())
        .opt_param("price", order.price.as_deref())
        .opt_param("stopPrice", order.stop_price.as_deref())
        .opt_param("timeInForce", order.time_in_force.map(|t| t.as_str()))
        .opt_param("clientOrderID", order.client_order_id.as_deref());
    // `reduceOnly` is rejected in hedge mode, so only send it when set.
    Ok(if order.reduce_only { spec.param("reduceOnly", "true") } else { spec })
}

fn check_batch_len(len: usize) -> Result<(), BxError> {
    if len == 0 || len > MAX_BATCH_ORDERS {
        return Err(BxError::InvalidRequest(format!("batch must hold 1 to {MAX_BATCH_ORDERS} entries, got {len}")));
    }
    Ok(())
}

/// JSON array of order objects for the `batchOrders` parameter.
fn batch_payload(orders: &[OrderRequest]) -> Result<String, BxError> {
    check_batch_len(orders.len())?;
    let mut entries = Vec::with_capacity(orders.len());
    for order in orders {
        let params = order_spec(BATCH_ORDERS, order)?.params;
        let object: serde_json::Map<String, serde_json::Value> =
            params.into_iter().map(|(k, v)| (k, serde_json::Value::String(v))).collect();
        entries.push(serde_json::Value::Object(object));
    }
    Ok(serde_json::Value::Array(entries).to_string())
}

/// JSON array of numeric order IDs for the `orderIdList` parameter.
fn order_id_list(order_ids: &[&str]) -> Result<String, BxError> {
    check_batch_len(order_ids.len())?;
    let ids = order_ids
        .iter()
        .map(|id| {
            id.trim()
                .parse::<u64>()
                .map_err(|_| BxError::InvalidRequest(format!("order ID is not numeric: {id:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::Value::from(ids).to_string())
}

impl SignedApiClient {
    /// Submit a new order.
    ///
    /// # Errors
    ///
    /// [`BxError::InvalidRequest`] if the order lacks a field its type
    /// requires; nothing is sent in that case.
    pub async fn place_order(&self, order: &OrderRequest) -> Result<ApiResponse, BxError> {
        let spec = order_spec(ORDER, order)?.non_idempotent();
        let resp = self.execute(spec).await?;
        info!(
            "[bingx] order placed: {} {} {} qty={}",
            order.symbol,
            order.side.as_str(),
            order.order_type.as_str(),
            order.quantity,
        );
        Ok(resp)
    }

    /// Validate an order against the matching engine without placing it.
    pub async fn test_order(&self, order: &OrderRequest) -> Result<ApiResponse, BxError> {
        self.execute(order_spec(TEST_ORDER, order)?).await
    }

    pub async fn cancel_order(&self, symbol: &str, order_id: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Delete, ORDER)
            .param("symbol", to_exchange_symbol(symbol))
            .param("orderId", order_id);
        self.execute(spec).await
    }

    /// Cancel every open order on `symbol`.
    pub async fn cancel_all_open_orders(&self, symbol: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Delete, ALL_OPEN_ORDERS).param("symbol", to_exchange_symbol(symbol));
        self.execute(spec).await
    }

    pub async fn get_open_orders(&self, symbol: Option<&str>) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Get, OPEN_ORDERS).opt_param("symbol", symbol.map(to_exchange_symbol));
        self.execute(spec).await
    }

    pub async fn get_order(&self, symbol: &str, order_id: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Get, ORDER)
            .param("symbol", to_exchange_symbol(symbol))
            .param("orderId", order_id);
        self.execute(spec).await
    }

    /// Order history, optionally bounded by `[start_time, end_time]` in ms.
    pub async fn get_all_orders(
        &self,
        symbol: &str,
        start_time: Option<u64>,
        end_time: Option<u64>,
        limit: u32,
    ) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Get, ALL_ORDERS)
            .param("symbol", to_exchange_symbol(symbol))
            .opt_param("startTime", start_time)
            .opt_param("endTime", end_time)
            .param("limit", limit);
        self.execute(spec).await
    }

    /// Change quantity and/or price of an open order.
    pub async fn amend_order(&self, amend: &AmendRequest) -> Result<ApiResponse, BxError> {
        if amend.quantity.trim().is_empty() {
            return Err(BxError::InvalidRequest("amend requires a quantity".into()));
        }
        let spec = RequestSpec::signed(Method::Post, AMEND)
            .non_idempotent()
            .param("symbol", to_exchange_symbol(&amend.symbol))
            .param("orderId", &amend.order_id)
            .param("side", amend.side.as_str())
            .param("positionSide", amend.position_side.as_str())
            .param("quantity", amend.quantity.trim())
            .opt_param("price", amend.price.as_deref());
        self.execute(spec).await
    }

    /// Recent fills on `symbol`.
    pub async fn get_my_trades(&self, symbol: &str, limit: u32) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Get, FILL_ORDERS)
            .param("symbol", to_exchange_symbol(symbol))
            .param("limit", limit);
        self.execute(spec).await
    }

    /// Market-close every position, or only those on `symbol`.
    pub async fn close_all_positions(&self, symbol: Option<&str>) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Post, CLOSE_ALL_POSITIONS)
            .non_idempotent()
            .opt_param("symbol", symbol.map(to_exchange_symbol));
        let resp = self.execute(spec).await?;
        info!("[bingx] close-all-positions sent for {}", symbol.unwrap_or("all symbols"));
        Ok(resp)
    }

    /// Set leverage for one side of `symbol`.
    ///
    /// `PositionSide::Both` is sent as `BOTH`, which one-way accounts expect.
    pub async fn set_leverage(&self, symbol: &str, leverage: u32, side: PositionSide) -> Result<ApiResponse, BxError> {
        if leverage == 0 {
            return Err(BxError::InvalidRequest("leverage must be at least 1".into()));
        }
        let spec = RequestSpec::signed(Method::Post, LEVERAGE)
            .param("symbol", to_exchange_symbol(symbol))
            .param("side", side.as_str())
            .param("leverage", leverage);
        self.execute(spec).await
    }

    pub async fn get_leverage(&self, symbol: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Get, LEVERAGE).param("symbol", to_exchange_symbol(symbol));
        self.execute(spec).await
    }

    pub async fn set_margin_type(&self, symbol: &str, margin_type: MarginType) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Post, MARGIN_TYPE)
            .param("symbol", to_exchange_symbol(symbol))
            .param("marginType", margin_type.as_str());
        self.execute(spec).await
    }

    pub async fn get_margin_type(&self, symbol: &str) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Get, MARGIN_TYPE).param("symbol", to_exchange_symbol(symbol));
        self.execute(spec).await
    }

    /// Submit up to [`MAX_BATCH_ORDERS`] orders in one call.
    ///
    /// Every order is validated first; one invalid order rejects the batch.
    pub async fn place_batch_orders(&self, orders: &[OrderRequest]) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Post, BATCH_ORDERS)
            .non_idempotent()
            .param("batchOrders", batch_payload(orders)?);
        let resp = self.execute(spec).await?;
        info!("[bingx] batch of {} order(s) placed", orders.len());
        Ok(resp)
    }

    /// Cancel up to [`MAX_BATCH_ORDERS`] orders on `symbol` by exchange ID.
    pub async fn cancel_batch_orders(&self, symbol: &str, order_ids: &[&str]) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Delete, BATCH_ORDERS)
            .param("symbol", to_exchange_symbol(symbol))
            .param("orderIdList", order_id_list(order_ids)?);
        self.execute(spec).await
    }

    /// Market-close one position by its exchange position ID.
    pub async fn close_position(&self, position_id: &str) -> Result<ApiResponse, BxError> {
        if position_id.trim().is_empty() {
            return Err(BxError::InvalidRequest("position ID is required".into()));
        }
        let spec = RequestSpec::signed(Method::Post, CLOSE_POSITION)
            .non_idempotent()
            .param("positionId", position_id.trim());
        let resp = self.execute(spec).await?;
        info!("[bingx] close-position sent for {position_id}");
        Ok(resp)
    }

    /// Add or remove margin on an isolated position. `amount` is in USDT.
    pub async fn adjust_isolated_margin(
        &self,
        symbol: &str,
        amount: &str,
        adjustment: MarginAdjustment,
        side: PositionSide,
    ) -> Result<ApiResponse, BxError> {
        if amount.trim().is_empty() {
            return Err(BxError::InvalidRequest("margin amount is required".into()));
        }
        let spec = RequestSpec::signed(Method::Post, POSITION_MARGIN)
            .non_idempotent()
            .param("symbol", to_exchange_symbol(symbol))
            .param("amount", amount.trim())
            .param("type", adjustment.code())
            .param("positionSide", side.as_str());
        self.execute(spec).await
    }

    /// Whether the account is in hedge (dual-side) mode.
    pub async fn get_position_mode(&self) -> Result<ApiResponse, BxError> {
        self.execute(RequestSpec::signed(Method::Get, POSITION_MODE)).await
    }

    /// Switch between hedge mode (`true`) and one-way mode (`false`).
    pub async fn set_position_mode(&self, dual_side: bool) -> Result<ApiResponse, BxError> {
        let spec = RequestSpec::signed(Method::Post, POSITION_MODE).param("dualSidePosition", dual_side);
        self.execute(spec).await
    }
}
