//! Shared helpers for the marketplace integration tests.

use anyhow::Result;
use serde_json::{json, Value};
use std::path::PathBuf;

/// Fresh scratch directory under the system temp dir, unique per test.
pub fn scratch_dir(name: &str) -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("market-it-{name}-{}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir)?;
    }
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn eth_value(wei: &str) -> Value {
    json!({ "value": wei, "decimals": 18, "symbol": "ETH" })
}

/// Snapshot with one direct listing (buyout 1 ETH, one open offer) and one
/// auction (buyout 2 ETH, minimum next bid 0.5 ETH), seen from `wallet`.
pub fn sample_snapshot(wallet: &str) -> Value {
    json!({
        "chain_id": 5,
        "wallet": wallet,
        "listings": [
            {
                "id": "1",
                "seller": "0x5E11E7000000000000000000000000000000A11C",
                "asset": { "id": "10", "name": "Gecko #10", "description": "direct" },
                "buyout_price": eth_value("1000000000000000000"),
                "terms": { "type": "direct" }
            },
            {
                "id": "2",
                "seller": "0x5e11e7000000000000000000000000000000a11c",
                "asset": { "id": "11", "name": "Gecko #11" },
                "buyout_price": eth_value("2000000000000000000"),
                "terms": {
                    "type": "auction",
                    "end_time_secs": 1900000000u64,
                    "min_next_bid": eth_value("500000000000000000")
                }
            }
        ],
        "offers": [
            {
                "listing_id": "1",
                "offeror": "0xb0b0000000000000000000000000000000000b0b",
                "total_offer_amount": "300000000000000000"
            }
        ],
        "owned_assets": {
            "0x5e11e7000000000000000000000000000000a11c": [
                { "id": "12", "name": "Gecko #12" }
            ]
        },
        "minters": ["0x5e11e7000000000000000000000000000000a11c"]
    })
}
