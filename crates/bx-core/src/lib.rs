//! # bx-core
//!
//! Core crate for the BingX gateway, providing:
//!
//! - **Types** (`types`): enums, order request structs, symbol utils
//! - **Configuration** (`config`): JSON + environment config
//! - **Error types** (`error`): the `BxError` taxonomy via thiserror
//! - **Time utilities** (`time_util`): millisecond timestamps
//! - **Logging** (`logging`): tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod time_util;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;

/// Shorten an API key for log output: first four characters, then `***`.
///
/// Keys of eight characters or fewer are hidden entirely.
pub fn mask_key(key: &str) -> String {
    if key.chars().count() <= 8 {
        return "***".to_string();
    }
    let head: String = key.chars().take(4).collect();
    format!("{head}***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_key_keeps_prefix_only() {
        assert_eq!(mask_key("l6aSBNGk0qIWFi03rQgQ"), "l6aS***");
        assert_eq!(mask_key("short"), "***");
        assert_eq!(mask_key(""), "***");
    }
}
