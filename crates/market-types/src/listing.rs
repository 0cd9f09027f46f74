//! Read-only listing snapshots as reported by the marketplace contract.

use serde::{Deserialize, Serialize};

use crate::amount::{CurrencyValue, TokenAmount};

/// Wallet or contract address. Hex addresses only differ in checksum
/// casing, so equality ignores ASCII case.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234...abcde` style: first five and last five characters.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The NFT being sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Direct,
    Auction,
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "Direct Listing"),
            Self::Auction => write!(f, "Auction Listing"),
        }
    }
}

/// Kind-specific fields. Auction fields are only meaningful on auctions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListingTerms {
    Direct,
    Auction {
        end_time_secs: u64,
        /// Snapshot taken with the listing; refreshed separately.
        #[serde(default)]
        min_next_bid: Option<CurrencyValue>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub seller: Address,
    pub asset: Asset,
    /// Buy-it-now price per token.
    pub buyout_price: CurrencyValue,
    pub terms: ListingTerms,
}

impl Listing {
    pub fn kind(&self) -> ListingKind {
        match self.terms {
            ListingTerms::Direct => ListingKind::Direct,
            ListingTerms::Auction { .. } => ListingKind::Auction,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.kind() == ListingKind::Direct
    }

    pub fn end_time_secs(&self) -> Option<u64> {
        match self.terms {
            ListingTerms::Auction { end_time_secs, .. } => Some(end_time_secs),
            ListingTerms::Direct => None,
        }
    }

    /// Seconds left on an auction, saturating at zero. `None` for direct listings.
    pub fn seconds_remaining(&self, now_secs: u64) -> Option<u64> {
        self.end_time_secs()
            .map(|end| end.saturating_sub(now_secs))
    }

    pub fn is_seller(&self, address: &Address) -> bool {
        &self.seller == address
    }
}

/// Offer on a direct listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub listing_id: ListingId,
    pub offeror: Address,
    pub total_offer_amount: TokenAmount,
}

/// Metadata for a new item minted into the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMetadata {
    pub name: String,
    pub description: String,
    pub image: ImageSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Uri(String),
    Bytes(Vec<u8>),
}
