//! Static Jito endpoint and tip-account tables
//!
//! These are configuration data, not discovery targets: the block-engine
//! base URLs and tip-receiving accounts are fixed and published by the
//! relay operator. Clients take a base URL by value, so tests and
//! multi-region setups pick whichever entry they want.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Public tip-floor market data endpoint (REST, not JSON-RPC)
pub const TIP_FLOOR_URL: &str = "https://bundles.jito.wtf/api/v1/bundles/tip_floor";

/// Mainnet block-engine base URLs: the global endpoint plus 8 regions
pub const MAINNET_BLOCK_ENGINES: [&str; 9] = [
    "https://mainnet.block-engine.jito.wtf/api/v1",
    "https://amsterdam.mainnet.block-engine.jito.wtf/api/v1",
    "https://dublin.mainnet.block-engine.jito.wtf/api/v1",
    "https://frankfurt.mainnet.block-engine.jito.wtf/api/v1",
    "https://london.mainnet.block-engine.jito.wtf/api/v1",
    "https://ny.mainnet.block-engine.jito.wtf/api/v1",
    "https://salt-lake-city.mainnet.block-engine.jito.wtf/api/v1",
    "https://singapore.mainnet.block-engine.jito.wtf/api/v1",
    "https://tokyo.mainnet.block-engine.jito.wtf/api/v1",
];

/// Testnet block-engine base URLs
pub const TESTNET_BLOCK_ENGINES: [&str; 3] = [
    "https://testnet.block-engine.jito.wtf/api/v1",
    "https://dallas.testnet.block-engine.jito.wtf/api/v1",
    "https://ny.testnet.block-engine.jito.wtf/api/v1",
];

/// Jito tip receiver addresses
pub const TIP_ACCOUNTS: [&str; 8] = [
    "96gYZGLnJYVFmbjzopPSU6QiEV5fGqZNyN9nmNhvrZU5",
    "HFqU5x63VTqvQss8hp11i4wVV8bD44PvwucfZ2bU7gRe",
    "Cw8CFyM9FkoMi7K7Crf6HNQqf4uEMzpKw6QNghXLvLkY",
    "ADaUMid9yfUytqMBgopwjb2DTLSokTSzL1zt6iGPaS49",
    "DfXygSm4jCyNCybVYYK6DwvWqjKee8pbDmJGcLWNDXjh",
    "ADuUkR4vqLUMWXxW9gh6D6L8pMSawimctcNZ5pGwDcEt",
    "DttWaMuVvTiduZRnguLF7jNxTgiMBZ1hyAumKUiL2KRL",
    "3AVi9Tg9Uo68tJfuvoKvqKNWKkC5wPdSSdeBnizKZ6jT",
];

/// Parse one of the hardcoded tip accounts
///
/// The table above is static and known-valid, so a parse failure here is
/// a programming error, not a runtime condition.
pub(crate) fn tip_account_at(index: usize) -> Pubkey {
    Pubkey::from_str(TIP_ACCOUNTS[index]).expect("hardcoded tip account must parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tip_accounts_parse() {
        for i in 0..TIP_ACCOUNTS.len() {
            let _ = tip_account_at(i);
        }
    }

    #[test]
    fn endpoint_counts() {
        assert_eq!(MAINNET_BLOCK_ENGINES.len(), 9);
        assert_eq!(TESTNET_BLOCK_ENGINES.len(), 3);
        assert_eq!(TIP_ACCOUNTS.len(), 8);
    }

    #[test]
    fn endpoints_have_no_trailing_slash() {
        for url in MAINNET_BLOCK_ENGINES.iter().chain(&TESTNET_BLOCK_ENGINES) {
            assert!(!url.ends_with('/'), "{}", url);
        }
    }
}
