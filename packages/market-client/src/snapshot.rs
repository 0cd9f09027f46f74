//! Offline backend served from a JSON snapshot.
//!
//! Reads answer from the file; actions are journaled and logged instead of
//! reaching a chain, so every flow can be dry-run against recorded data.

use crate::chain::{
    AcceptOfferRequest, BidRequest, BuyRequest, Collection, Marketplace, NewAuction, NewListing,
    OfferRequest, TxReceipt, Wallet,
};
use crate::error::{ContractError, Error};
use market_types::{
    Address, Asset, AssetMetadata, Currency, CurrencyValue, Listing, ListingId, ListingTerms,
    Offer, TokenAmount,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// On-disk layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub chain_id: u64,
    #[serde(default)]
    pub wallet: Option<Address>,
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub owned_assets: HashMap<String, Vec<Asset>>,
    #[serde(default)]
    pub minters: Vec<Address>,
    /// Actions recorded by earlier dry runs, oldest first.
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub tx_hash: String,
    pub action: String,
    pub detail: String,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Snapshot(format!("Failed to read {}: {e}", path.display())))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .map_err(|e| Error::Snapshot(format!("Invalid snapshot JSON: {e}")))?;
        info!(
            path = %path.display(),
            listings = snapshot.listings.len(),
            offers = snapshot.offers.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }
}

/// Snapshot-backed marketplace, collection and wallet in one.
pub struct SnapshotBackend {
    path: PathBuf,
    currency: Currency,
    state: Mutex<Snapshot>,
}

impl SnapshotBackend {
    pub fn open(path: impl Into<PathBuf>, currency: Currency) -> Result<Self, Error> {
        let path = path.into();
        let snapshot = Snapshot::load(&path)?;
        Ok(Self::from_snapshot(path, currency, snapshot))
    }

    pub fn from_snapshot(path: impl Into<PathBuf>, currency: Currency, snapshot: Snapshot) -> Self {
        Self {
            path: path.into(),
            currency,
            state: Mutex::new(snapshot),
        }
    }

    fn snapshot(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn journal(&self) -> Vec<JournalEntry> {
        self.snapshot().journal.clone()
    }

    /// Write the snapshot (journal included) back to disk.
    pub fn save(&self) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&*self.snapshot())
            .map_err(|e| Error::Snapshot(format!("Failed to serialize snapshot: {e}")))?;

        // Atomic write: tmp + rename
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| Error::Snapshot(format!("Failed to write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::Snapshot(format!("Failed to replace snapshot: {e}")))?;
        info!(path = %self.path.display(), "Snapshot saved");
        Ok(())
    }

    fn record(&self, action: &str, detail: String) -> TxReceipt {
        let mut snapshot = self.snapshot();
        let tx_hash = format!("dry-run-{}", snapshot.journal.len() + 1);
        info!(tx = %tx_hash, action, detail = %detail, "Dry-run action recorded");
        snapshot.journal.push(JournalEntry {
            tx_hash: tx_hash.clone(),
            action: action.to_string(),
            detail,
        });
        TxReceipt { tx_hash }
    }

    fn find_listing(&self, id: &ListingId) -> Option<Listing> {
        self.snapshot().listings.iter().find(|l| &l.id == id).cloned()
    }

    fn require_listing(&self, id: &ListingId) -> Result<Listing, ContractError> {
        self.find_listing(id)
            .ok_or_else(|| ContractError::new(format!("listing {id} does not exist")))
    }
}

#[async_trait::async_trait]
impl Marketplace for SnapshotBackend {
    async fn listing(&self, id: &ListingId) -> Result<Option<Listing>, ContractError> {
        Ok(self.find_listing(id))
    }

    async fn active_listings(&self) -> Result<Vec<Listing>, ContractError> {
        Ok(self.snapshot().listings.clone())
    }

    async fn offers(&self, id: &ListingId) -> Result<Vec<Offer>, ContractError> {
        Ok(self
            .snapshot()
            .offers
            .iter()
            .filter(|o| &o.listing_id == id)
            .cloned()
            .collect())
    }

    async fn minimum_next_bid(&self, id: &ListingId) -> Result<CurrencyValue, ContractError> {
        let listing = self.require_listing(id)?;
        match listing.terms {
            ListingTerms::Auction {
                min_next_bid: Some(min),
                ..
            } => Ok(min),
            ListingTerms::Auction { .. } => Ok(listing.buyout_price.with_value(TokenAmount::ZERO)),
            ListingTerms::Direct => Err(ContractError::new(format!(
                "listing {id} is not an auction"
            ))),
        }
    }

    async fn buy_now(&self, req: BuyRequest) -> Result<TxReceipt, ContractError> {
        self.require_listing(&req.listing_id)?;
        Ok(self.record(
            "buy_now",
            format!("listing={} quantity={}", req.listing_id, req.quantity),
        ))
    }

    async fn make_offer(&self, req: OfferRequest) -> Result<TxReceipt, ContractError> {
        let listing = self.require_listing(&req.listing_id)?;
        let price = listing.buyout_price.with_value(req.price_per_token);
        Ok(self.record(
            "make_offer",
            format!("listing={} quantity={} price={price}", req.listing_id, req.quantity),
        ))
    }

    async fn make_bid(&self, req: BidRequest) -> Result<TxReceipt, ContractError> {
        let listing = self.require_listing(&req.listing_id)?;
        let bid = listing.buyout_price.with_value(req.bid);
        Ok(self.record("make_bid", format!("listing={} bid={bid}", req.listing_id)))
    }

    async fn accept_offer(&self, req: AcceptOfferRequest) -> Result<TxReceipt, ContractError> {
        self.require_listing(&req.listing_id)?;
        Ok(self.record(
            "accept_offer",
            format!("listing={} offeror={}", req.listing_id, req.offeror),
        ))
    }

    async fn create_direct_listing(&self, req: NewListing) -> Result<TxReceipt, ContractError> {
        let price = self.currency.value(req.buyout_price_per_token);
        Ok(self.record(
            "create_direct_listing",
            format!("token={} price={price}", req.token_id),
        ))
    }

    async fn create_auction_listing(&self, req: NewAuction) -> Result<TxReceipt, ContractError> {
        let price = self.currency.value(req.listing.buyout_price_per_token);
        Ok(self.record(
            "create_auction_listing",
            format!("token={} buyout={price}", req.listing.token_id),
        ))
    }
}

#[async_trait::async_trait]
impl Collection for SnapshotBackend {
    async fn mint_to(
        &self,
        owner: &Address,
        metadata: AssetMetadata,
    ) -> Result<TxReceipt, ContractError> {
        Ok(self.record(
            "mint_to",
            format!("owner={owner} name={}", metadata.name),
        ))
    }

    async fn has_minter_role(&self, address: &Address) -> Result<bool, ContractError> {
        Ok(self.snapshot().minters.contains(address))
    }

    async fn owned_assets(&self, owner: &Address) -> Result<Vec<Asset>, ContractError> {
        Ok(self
            .snapshot()
            .owned_assets
            .iter()
            .find(|(k, _)| Address::new(k.as_str()) == *owner)
            .map(|(_, assets)| assets.clone())
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl Wallet for SnapshotBackend {
    fn address(&self) -> Option<Address> {
        self.snapshot().wallet.clone()
    }

    fn chain_id(&self) -> u64 {
        self.snapshot().chain_id
    }

    async fn switch_network(&self, chain_id: u64) -> Result<(), ContractError> {
        info!(chain_id, "Switching snapshot wallet network");
        self.snapshot().chain_id = chain_id;
        Ok(())
    }
}
