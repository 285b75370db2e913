//! Trading request structures passed into the typed REST operations.
//!
//! These are caller-facing inputs; the REST layer flattens them into the
//! exchange's parameter names.

use serde::{Deserialize, Serialize};

use super::enums::{OrderType, PositionSide, Side, TimeInForce};

// ---------------------------------------------------------------------------
// New order
// ---------------------------------------------------------------------------

/// A new-order request for the swap trade endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol in any accepted form (`BTCUSDT`, `BTC-USDT`).
    pub symbol: String,
    /// Buy or sell.
    pub side: Side,
    /// Order type.
    pub order_type: OrderType,
    /// Position side (`Both` for one-way mode).
    #[serde(default)]
    pub position_side: PositionSide,
    /// Order quantity in contract units, as a decimal string.
    pub quantity: String,
    /// Limit price (required for limit-family types).
    #[serde(default)]
    pub price: Option<String>,
    /// Trigger price (required for stop / take-profit families).
    #[serde(default)]
    pub stop_price: Option<String>,
    /// Time in force for limit orders.
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    /// Client-assigned order ID.
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Only reduce an existing position.
    #[serde(default)]
    pub reduce_only: bool,
}

impl OrderRequest {
    /// Market order on a one-way account.
    pub fn market(symbol: &str, side: Side, quantity: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Market,
            position_side: PositionSide::Both,
            quantity: quantity.to_string(),
            price: None,
            stop_price: None,
            time_in_force: None,
            client_order_id: None,
            reduce_only: false,
        }
    }

    /// GTC limit order on a one-way account.
    pub fn limit(symbol: &str, side: Side, quantity: &str, price: &str) -> Self {
        Self {
            order_type: OrderType::Limit,
            price: Some(price.to_string()),
            time_in_force: Some(TimeInForce::Gtc),
            ..Self::market(symbol, side, quantity)
        }
    }

    /// Check the type-dependent required fields.
    pub fn validate(&self) -> Result<(), String> {
        if self.quantity.trim().is_empty() {
            return Err("quantity is required".into());
        }
        if self.order_type.requires_price() && self.price.is_none() {
            return Err(format!("{} order requires a price", self.order_type.as_str()));
        }
        if self.order_type.requires_stop_price() && self.stop_price.is_none() {
            return Err(format!("{} order requires a stop price", self.order_type.as_str()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Amend
// ---------------------------------------------------------------------------

/// Modify quantity and/or price of an open order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmendRequest {
    pub symbol: String,
    pub order_id: String,
    pub side: Side,
    #[serde(default)]
    pub position_side: PositionSide,
    pub quantity: String,
    #[serde(default)]
    pub price: Option<String>,
}

// ---------------------------------------------------------------------------
// Income history query
// ---------------------------------------------------------------------------

/// Filters for the income (PnL / funding / fee) history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeQuery {
    #[serde(default)]
    pub symbol: Option<String>,
    /// `REALIZED_PNL`, `FUNDING_FEE`, `TRADING_FEE`, ...
    #[serde(default)]
    pub income_type: Option<String>,
    #[serde(default)]
    pub start_time: Option<u64>,
    #[serde(default)]
    pub end_time: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
}
