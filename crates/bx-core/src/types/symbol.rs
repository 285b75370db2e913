//! Symbol normalisation for the swap API.
//!
//! BingX perpetual contracts use dashed symbols (`BTC-USDT`), while most
//! other tooling and user input uses the concatenated form (`BTCUSDT`) or a
//! slash (`BTC/USDT`). [`to_exchange_symbol`] accepts all three.

/// Quote assets recognised when splitting a concatenated symbol.
///
/// Longer suffixes come first so `USDC` is not mistaken for a `USD` quote.
const COMMON_QUOTES: &[&str] = &["USDT", "USDC", "FDUSD", "BUSD", "USD", "BTC", "ETH"];

/// Convert a user-supplied symbol to the exchange's `BASE-QUOTE` form.
///
/// Unknown shapes are upper-cased and passed through unchanged.
pub fn to_exchange_symbol(symbol: &str) -> String {
    let upper = symbol.trim().to_ascii_uppercase();
    if upper.contains('-') {
        return upper;
    }
    if upper.contains('/') || upper.contains('_') {
        return upper.replace(['/', '_'], "-");
    }
    for quote in COMMON_QUOTES {
        if let Some(base) = upper.strip_suffix(quote) {
            if !base.is_empty() {
                return format!("{base}-{quote}");
            }
        }
    }
    upper
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenated_symbol_is_split() {
        assert_eq!(to_exchange_symbol("BTCUSDT"), "BTC-USDT");
        assert_eq!(to_exchange_symbol("ethusdc"), "ETH-USDC");
        assert_eq!(to_exchange_symbol("1000PEPEUSDT"), "1000PEPE-USDT");
    }

    #[test]
    fn dashed_and_slashed_pass() {
        assert_eq!(to_exchange_symbol("BTC-USDT"), "BTC-USDT");
        assert_eq!(to_exchange_symbol("sol/usdt"), "SOL-USDT");
        assert_eq!(to_exchange_symbol("DOGE_USDT"), "DOGE-USDT");
    }

    #[test]
    fn unknown_shape_passthrough() {
        assert_eq!(to_exchange_symbol("usdt"), "USDT");
        assert_eq!(to_exchange_symbol("NCCOGOLD2USD"), "NCCOGOLD2-USD");
        assert_eq!(to_exchange_symbol("XAUT"), "XAUT");
    }
}
