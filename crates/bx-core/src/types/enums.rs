//! Enumerations used throughout the BingX gateway.
//!
//! Trading enums serialize to the exchange's wire spelling
//! (`SCREAMING_SNAKE_CASE`) and expose that spelling via `as_str()` so the
//! REST builders can drop them straight into a parameter map.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client mode
// ---------------------------------------------------------------------------

/// Whether the client talks to the exchange or serves canned fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    #[default]
    Live,
    Demo,
}

impl std::fmt::Display for ClientMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Demo => write!(f, "demo"),
        }
    }
}

// ---------------------------------------------------------------------------
// Order / trading enums
// ---------------------------------------------------------------------------

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

/// Position side for hedge-mode (`Long`/`Short`) or one-way (`Both`) accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    Long,
    Short,
    #[default]
    Both,
}

impl PositionSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
            Self::Both => "BOTH",
        }
    }
}

/// Order type accepted by the swap order endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
    TakeProfitMarket,
    Stop,
    TakeProfit,
    TriggerLimit,
    TriggerMarket,
    TrailingStopMarket,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::StopMarket => "STOP_MARKET",
            Self::TakeProfitMarket => "TAKE_PROFIT_MARKET",
            Self::Stop => "STOP",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TriggerLimit => "TRIGGER_LIMIT",
            Self::TriggerMarket => "TRIGGER_MARKET",
            Self::TrailingStopMarket => "TRAILING_STOP_MARKET",
        }
    }

    /// Whether the exchange requires a `price` for this type.
    pub fn requires_price(self) -> bool {
        matches!(self, Self::Limit | Self::Stop | Self::TakeProfit | Self::TriggerLimit)
    }

    /// Whether the exchange requires a `stopPrice` for this type.
    pub fn requires_stop_price(self) -> bool {
        !matches!(self, Self::Market | Self::Limit | Self::TrailingStopMarket)
    }
}

/// Time in force for limit orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    Gtc,
    #[serde(rename = "IOC")]
    Ioc,
    #[serde(rename = "FOK")]
    Fok,
    #[serde(rename = "PostOnly")]
    PostOnly,
}

impl TimeInForce {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
            Self::PostOnly => "PostOnly",
        }
    }
}

/// Margin mode of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarginType {
    Isolated,
    Crossed,
}

impl MarginType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Isolated => "ISOLATED",
            Self::Crossed => "CROSSED",
        }
    }
}

impl std::str::FromStr for MarginType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ISOLATED" => Ok(Self::Isolated),
            "CROSSED" | "CROSS" => Ok(Self::Crossed),
            other => Err(format!("unknown margin type: {other}")),
        }
    }
}

/// Direction of an isolated-margin adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarginAdjustment {
    Add,
    Reduce,
}

impl MarginAdjustment {
    /// Wire value of the `type` parameter: 1 adds, 2 reduces.
    pub fn code(self) -> u8 {
        match self {
            Self::Add => 1,
            Self::Reduce => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_spelling_matches_serde() {
        assert_eq!(serde_json::to_string(&OrderType::TakeProfitMarket).unwrap(), "\"TAKE_PROFIT_MARKET\"");
        assert_eq!(OrderType::TakeProfitMarket.as_str(), "TAKE_PROFIT_MARKET");
        assert_eq!(serde_json::to_string(&TimeInForce::PostOnly).unwrap(), "\"PostOnly\"");
        assert_eq!(serde_json::to_string(&PositionSide::Both).unwrap(), "\"BOTH\"");
    }

    #[test]
    fn price_requirements() {
        assert!(OrderType::Limit.requires_price());
        assert!(!OrderType::Market.requires_price());
        assert!(OrderType::StopMarket.requires_stop_price());
        assert!(!OrderType::Limit.requires_stop_price());
    }

    #[test]
    fn margin_type_parses_aliases() {
        assert_eq!("cross".parse::<MarginType>().unwrap(), MarginType::Crossed);
        assert_eq!("ISOLATED".parse::<MarginType>().unwrap(), MarginType::Isolated);
        assert!("portfolio".parse::<MarginType>().is_err());
    }
}
