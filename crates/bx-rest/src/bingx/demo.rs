//! Offline fixtures served in DEMO mode.
//!
//! Lookup is by path substring, first match wins, so more specific keys sit
//! above broader ones (`/trade/order/test` is covered by `/trade/order`).
//! Bodies are static JSON and contain no clock reads or randomness: the same
//! call returns the same bytes for the whole process lifetime.

use bx_core::error::BxError;

use crate::response::{ApiResponse, interpret};

/// `(path substring, response body)` in match order.
const FIXTURES: &[(&str, &str)] = &[
    (
        "/user/balance",
        r#"{"code":0,"msg":"","data":{"balance":{"userId":"100000001","asset":"USDT","balance":"10000.00","equity":"10050.00","unrealizedProfit":"50.00","realisedProfit":"25.50","availableMargin":"9400.00","usedMargin":"600.00","freezedMargin":"0.00"}}}"#,
    ),
    (
        "/user/positions",
        r#"{"code":0,"msg":"","data":[{"symbol":"BTC-USDT","positionId":"1000000000000001","positionSide":"LONG","isolated":false,"positionAmt":"0.001","availableAmt":"0.001","avgPrice":"60000.00","unrealizedProfit":"50.00","realisedProfit":"0.00","initialMargin":"6.00","leverage":10}]}"#,
    ),
    (
        "/user/income",
        r#"{"code":0,"msg":"","data":[{"symbol":"BTC-USDT","incomeType":"REALIZED_PNL","income":"25.50","asset":"USDT","info":"Realized PnL for closed position","time":1700000000000,"tranId":"1001","tradeId":"2001"},{"symbol":"ETH-USDT","incomeType":"FUNDING_FEE","income":"-1.20","asset":"USDT","info":"Funding fee","time":1699996400000,"tranId":"1002","tradeId":""}]}"#,
    ),
    (
        "/user/commissionRate",
        r#"{"code":0,"msg":"","data":{"commission":{"takerCommissionRate":0.0005,"makerCommissionRate":0.0002}}}"#,
    ),
    (
        "/trade/allFillOrders",
        r#"{"code":0,"msg":"","data":{"fill_orders":[{"symbol":"BTC-USDT","filledTm":"2023-11-14T22:13:20Z","orderId":"789012","side":"BUY","price":"60000.00","volume":"0.001","amount":"60.00","commission":"-0.03","commissionAsset":"USDT"}]}}"#,
    ),
    ("/trade/openOrders", r#"{"code":0,"msg":"","data":{"orders":[]}}"#),
    ("/trade/allOrders", r#"{"code":0,"msg":"","data":{"orders":[]}}"#),
    (
        "/trade/batchOrders",
        r#"{"code":0,"msg":"","data":{"orders":[{"symbol":"BTC-USDT","orderId":1700000000000000002,"side":"BUY","positionSide":"BOTH","type":"MARKET","status":"NEW","clientOrderId":""}]}}"#,
    ),
    (
        "/trade/closePosition",
        r#"{"code":0,"msg":"","data":{"orderId":1700000000000000003,"positionId":"1000000000000001","symbol":"BTC-USDT","side":"SELL","type":"MARKET"}}"#,
    ),
    ("/trade/positionMargin", r#"{"code":0,"msg":"","data":{"amount":"10.00","type":1}}"#),
    ("/positionSide/dual", r#"{"code":0,"msg":"","data":{"dualSidePosition":"false"}}"#),
    ("/trade/amend", r#"{"code":0,"msg":"","data":{"orderId":"1700000000000000001","status":"NEW"}}"#),
    (
        "/trade/order",
        r#"{"code":0,"msg":"","data":{"order":{"symbol":"BTC-USDT","orderId":1700000000000000001,"side":"BUY","positionSide":"BOTH","type":"MARKET","status":"NEW","clientOrderId":""}}}"#,
    ),
    (
        "/trade/leverage",
        r#"{"code":0,"msg":"","data":{"longLeverage":10,"shortLeverage":10,"maxLongLeverage":125,"maxShortLeverage":125}}"#,
    ),
    ("/trade/marginType", r#"{"code":0,"msg":"","data":{"marginType":"CROSSED"}}"#),
    ("/trade/closeAllPositions", r#"{"code":0,"msg":"","data":{"success":[],"failed":null}}"#),
    ("/trade/allOpenOrders", r#"{"code":0,"msg":"","data":{"success":[],"failed":null}}"#),
    ("/ticker/price", r#"{"code":0,"msg":"","data":[{"symbol":"BTC-USDT","price":"60000.00","time":1700000000000}]}"#),
    (
        "/quote/ticker",
        r#"{"code":0,"msg":"","data":{"symbol":"BTC-USDT","priceChange":"0.00","priceChangePercent":"0.00","lastPrice":"60000.00","lastQty":"0.001","highPrice":"60000.00","lowPrice":"60000.00","volume":"0","quoteVolume":"0","openPrice":"60000.00","openTime":1699913600000,"closeTime":1700000000000}}"#,
    ),
    (
        "/quote/premiumIndex",
        r#"{"code":0,"msg":"","data":{"symbol":"BTC-USDT","markPrice":"60000.00","indexPrice":"60000.00","lastFundingRate":"0.0001","nextFundingTime":1700006400000}}"#,
    ),
    (
        "/quote/klines",
        r#"{"code":0,"msg":"","data":[{"open":"60000.00","close":"60000.00","high":"60000.00","low":"60000.00","volume":"0","time":1699999880000},{"open":"60000.00","close":"60000.00","high":"60000.00","low":"60000.00","volume":"0","time":1699999940000},{"open":"60000.00","close":"60000.00","high":"60000.00","low":"60000.00","volume":"0","time":1700000000000}]}"#,
    ),
    (
        "/quote/depth",
        r#"{"code":0,"msg":"","data":{"T":1700000000000,"bids":[["59999.90","1.000"],["59999.80","2.000"]],"asks":[["60000.10","1.000"],["60000.20","2.000"]]}}"#,
    ),
    ("/quote/openInterest", r#"{"code":0,"msg":"","data":{"openInterest":"1250000.00","symbol":"BTC-USDT","time":1700000000000}}"#),
    ("/quote/trades", r#"{"code":0,"msg":"","data":[{"time":1700000000000,"isBuyerMaker":false,"price":"60000.00","qty":"0.001","quoteQty":"60.00"}]}"#),
    ("/quote/contracts", r#"{"code":0,"msg":"","data":[{"contractId":"100","symbol":"BTC-USDT","quantityPrecision":4,"pricePrecision":1,"tradeMinQuantity":0.0001,"currency":"USDT","asset":"BTC","status":1}]}"#),
    ("/server/time", r#"{"code":0,"msg":"","data":{"serverTime":1700000000000}}"#),
    ("/userDataStream", r#"{"listenKey":"demo0000000000000000000000000000000000000000000000000000000000000"}"#),
];

/// Body returned for paths with no fixture.
const FALLBACK: &str = r#"{"code":0,"msg":"","data":{}}"#;

/// Fixture body for `path`.
pub fn fixture_body(path: &str) -> &'static str {
    FIXTURES
        .iter()
        .find(|(key, _)| path.contains(key))
        .map(|(_, body)| *body)
        .unwrap_or(FALLBACK)
}

/// Canned response for `path`, interpreted like a live 200 reply.
pub fn respond(path: &str) -> Result<ApiResponse, BxError> {
    interpret(200, fixture_body(path))
}
