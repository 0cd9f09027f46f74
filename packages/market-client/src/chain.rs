//! Contract and wallet boundary.
//!
//! Everything stateful (prices, ownership, auction timing, escrow) lives
//! behind these traits. Implementations wrap a chain SDK; the client only
//! issues requests and reacts to the results.

use crate::error::ContractError;
use market_types::{
    Address, Asset, AssetMetadata, CurrencyValue, Listing, ListingId, ListingKind, Offer,
    TokenAmount,
};

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyRequest {
    pub listing_id: ListingId,
    pub quantity: u32,
    pub kind: ListingKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRequest {
    pub listing_id: ListingId,
    pub quantity: u32,
    pub price_per_token: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidRequest {
    pub listing_id: ListingId,
    pub bid: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptOfferRequest {
    pub listing_id: ListingId,
    pub offeror: Address,
}

/// Terms shared by direct and auction listing creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub asset_contract: Address,
    pub token_id: String,
    /// `None` = the chain's native token.
    pub currency_contract: Option<Address>,
    pub quantity: u32,
    pub buyout_price_per_token: TokenAmount,
    pub start_time_secs: u64,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuction {
    pub listing: NewListing,
    pub reserve_price_per_token: TokenAmount,
}

/// Marketplace contract operations.
#[async_trait::async_trait]
pub trait Marketplace: Send + Sync {
    async fn listing(&self, id: &ListingId) -> Result<Option<Listing>, ContractError>;
    async fn active_listings(&self) -> Result<Vec<Listing>, ContractError>;
    async fn offers(&self, id: &ListingId) -> Result<Vec<Offer>, ContractError>;
    async fn minimum_next_bid(&self, id: &ListingId) -> Result<CurrencyValue, ContractError>;

    async fn buy_now(&self, req: BuyRequest) -> Result<TxReceipt, ContractError>;
    async fn make_offer(&self, req: OfferRequest) -> Result<TxReceipt, ContractError>;
    async fn make_bid(&self, req: BidRequest) -> Result<TxReceipt, ContractError>;
    async fn accept_offer(&self, req: AcceptOfferRequest) -> Result<TxReceipt, ContractError>;
    async fn create_direct_listing(&self, req: NewListing) -> Result<TxReceipt, ContractError>;
    async fn create_auction_listing(&self, req: NewAuction) -> Result<TxReceipt, ContractError>;
}

/// NFT collection contract operations.
#[async_trait::async_trait]
pub trait Collection: Send + Sync {
    async fn mint_to(
        &self,
        owner: &Address,
        metadata: AssetMetadata,
    ) -> Result<TxReceipt, ContractError>;
    async fn has_minter_role(&self, address: &Address) -> Result<bool, ContractError>;
    async fn owned_assets(&self, owner: &Address) -> Result<Vec<Asset>, ContractError>;
}

/// Connected wallet.
#[async_trait::async_trait]
pub trait Wallet: Send + Sync {
    fn address(&self) -> Option<Address>;
    fn chain_id(&self) -> u64;
    async fn switch_network(&self, chain_id: u64) -> Result<(), ContractError>;
}
