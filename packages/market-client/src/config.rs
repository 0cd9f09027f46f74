//! Client configuration.

use market_types::{Address, Currency};
use serde::Deserialize;

/// Configuration for the marketplace client.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::marketplace_contract")]
    pub marketplace_contract: String,

    #[serde(default = "defaults::collection_contract")]
    pub collection_contract: String,

    /// Chain the contracts live on; any other wallet network is a mismatch.
    #[serde(default = "defaults::chain_id")]
    pub chain_id: u64,

    #[serde(default = "defaults::native_symbol")]
    pub native_symbol: String,

    #[serde(default = "defaults::native_decimals")]
    pub native_decimals: u8,

    #[serde(default = "defaults::listing_duration_secs")]
    pub listing_duration_secs: u64,

    /// Where the client lands after a purchase, accepted offer, new listing or mint.
    #[serde(default = "defaults::index_path")]
    pub index_path: String,

    /// JSON snapshot served by the offline backend.
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marketplace_contract: defaults::marketplace_contract(),
            collection_contract: defaults::collection_contract(),
            chain_id: defaults::chain_id(),
            native_symbol: defaults::native_symbol(),
            native_decimals: defaults::native_decimals(),
            listing_duration_secs: defaults::listing_duration_secs(),
            index_path: defaults::index_path(),
            snapshot_path: defaults::snapshot_path(),
        }
    }
}

impl Config {
    /// Load `market.toml` (optional) overlaid with `MARKET_*` environment variables.
    pub fn load() -> Result<Self, crate::Error> {
        config::Config::builder()
            .add_source(config::File::with_name("market").required(false))
            .add_source(config::Environment::with_prefix("MARKET"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn native_currency(&self) -> Currency {
        Currency::new(self.native_symbol.clone(), self.native_decimals)
    }

    pub fn collection_address(&self) -> Address {
        Address::new(self.collection_contract.clone())
    }
}

mod defaults {
    fn network() -> String {
        std::env::var("MARKET_NETWORK").unwrap_or_else(|_| "goerli".into())
    }

    pub fn marketplace_contract() -> String {
        String::new()
    }

    pub fn collection_contract() -> String {
        String::new()
    }

    pub fn chain_id() -> u64 {
        match network().as_str() {
            "mainnet" => 1,
            "sepolia" => 11_155_111,
            "mumbai" => 80_001,
            "polygon" => 137,
            _ => 5,
        }
    }

    pub fn native_symbol() -> String {
        match network().as_str() {
            "mumbai" | "polygon" => "MATIC".into(),
            _ => "ETH".into(),
        }
    }

    pub fn native_decimals() -> u8 {
        18
    }

    pub fn listing_duration_secs() -> u64 {
        60 * 60 * 24 * 7
    }

    pub fn index_path() -> String {
        "/".into()
    }

    pub fn snapshot_path() -> String {
        "./market-snapshot.json".into()
    }
}
