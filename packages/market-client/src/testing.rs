//! Recording fakes of every boundary trait, plus listing builders.
//!
//! Queries answer from seeded data; actions are recorded in call order and
//! answer with a synthetic receipt (or the configured failure).

use crate::chain::{
    AcceptOfferRequest, BidRequest, BuyRequest, Collection, Marketplace, NewAuction, NewListing,
    OfferRequest, TxReceipt, Wallet,
};
use crate::config::Config;
use crate::error::ContractError;
use crate::notify::{Navigator, Notice, Notifier};
use crate::session::Session;
use market_types::{
    Address, Asset, AssetMetadata, Currency, CurrencyValue, Listing, ListingId, ListingTerms,
    Offer, TokenAmount,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const SELLER: &str = "0x5e11e7000000000000000000000000000000a11c";
pub const BUYER: &str = "0xb0b0000000000000000000000000000000000b0b";
pub const CHAIN_ID: u64 = 5;

pub fn eth_currency() -> Currency {
    Currency::new("ETH", 18)
}

/// Parse an ETH amount; panics on bad test input.
pub fn eth(amount: &str) -> TokenAmount {
    market_types::parse_units(amount, 18).expect("valid test amount")
}

fn eth_value(amount: &str) -> CurrencyValue {
    eth_currency().value(eth(amount))
}

fn asset(id: &str) -> Asset {
    Asset {
        id: id.to_string(),
        name: format!("Item #{id}"),
        description: "test asset".into(),
        image: Some(format!("ipfs://asset/{id}")),
    }
}

pub fn direct_listing(id: &str, buyout: &str) -> Listing {
    Listing {
        id: ListingId::new(id),
        seller: Address::new(SELLER),
        asset: asset(id),
        buyout_price: eth_value(buyout),
        terms: ListingTerms::Direct,
    }
}

pub fn auction_listing(id: &str, buyout: &str, min_next_bid: Option<&str>) -> Listing {
    Listing {
        id: ListingId::new(id),
        seller: Address::new(SELLER),
        asset: asset(id),
        buyout_price: eth_value(buyout),
        terms: ListingTerms::Auction {
            end_time_secs: 1_900_000_000,
            min_next_bid: min_next_bid.map(eth_value),
        },
    }
}

/// Everything a fake saw, in order. Only the minimum-next-bid read is
/// recorded among queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    MinimumNextBid(ListingId),
    Buy(BuyRequest),
    Offer(OfferRequest),
    Bid(BidRequest),
    AcceptOffer(AcceptOfferRequest),
    CreateDirect(NewListing),
    CreateAuction(NewAuction),
    Mint { owner: Address, name: String },
}

impl Call {
    fn is_action(&self) -> bool {
        !matches!(self, Call::MinimumNextBid(_))
    }
}

/// Shared failure switch, pause gate and call log.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<String>>,
    paused: AtomicBool,
    resume: Notify,
    next_tx: AtomicU64,
}

impl Recorder {
    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn act(&self, call: Call) -> Result<TxReceipt, ContractError> {
        self.push(call);
        if self.paused.load(Ordering::Acquire) {
            self.resume.notified().await;
        }
        if let Some(msg) = self.failure.lock().unwrap().clone() {
            return Err(ContractError::new(msg));
        }
        let n = self.next_tx.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(TxReceipt {
            tx_hash: format!("0x{n:064x}"),
        })
    }
}

#[derive(Default)]
pub struct RecordingMarketplace {
    listings: Mutex<Vec<Listing>>,
    offers: Mutex<Vec<Offer>>,
    min_bid_failure: Mutex<Option<String>>,
    recorder: Recorder,
}

impl RecordingMarketplace {
    pub fn add_listing(&self, listing: Listing) {
        self.listings.lock().unwrap().push(listing);
    }

    pub fn add_offer(&self, offer: Offer) {
        self.offers.lock().unwrap().push(offer);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.calls.lock().unwrap().clone()
    }

    /// Recorded calls minus queries.
    pub fn actions(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_action).collect()
    }

    pub fn fail_with(&self, msg: &str) {
        *self.recorder.failure.lock().unwrap() = Some(msg.to_string());
    }

    /// Make every minimum-next-bid read fail with `msg`.
    pub fn fail_minimum_next_bid(&self, msg: &str) {
        *self.min_bid_failure.lock().unwrap() = Some(msg.to_string());
    }

    /// Hold every subsequent action until [`release`](Self::release).
    pub fn pause(&self) {
        self.recorder.paused.store(true, Ordering::Release);
    }

    pub fn release(&self) {
        self.recorder.paused.store(false, Ordering::Release);
        self.recorder.resume.notify_waiters();
        self.recorder.resume.notify_one();
    }
}

#[async_trait::async_trait]
impl Marketplace for RecordingMarketplace {
    async fn listing(&self, id: &ListingId) -> Result<Option<Listing>, ContractError> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| &l.id == id)
            .cloned())
    }

    async fn active_listings(&self) -> Result<Vec<Listing>, ContractError> {
        Ok(self.listings.lock().unwrap().clone())
    }

    async fn offers(&self, id: &ListingId) -> Result<Vec<Offer>, ContractError> {
        Ok(self
            .offers
            .lock()
            .unwrap()
            .iter()
            .filter(|o| &o.listing_id == id)
            .cloned()
            .collect())
    }

    async fn minimum_next_bid(&self, id: &ListingId) -> Result<CurrencyValue, ContractError> {
        self.recorder.push(Call::MinimumNextBid(id.clone()));
        if let Some(msg) = self.min_bid_failure.lock().unwrap().clone() {
            return Err(ContractError::new(msg));
        }
        let listings = self.listings.lock().unwrap();
        let listing = listings
            .iter()
            .find(|l| &l.id == id)
            .ok_or_else(|| ContractError::new("listing not found"))?;
        match &listing.terms {
            ListingTerms::Auction {
                min_next_bid: Some(min),
                ..
            } => Ok(min.clone()),
            _ => Ok(eth_currency().value(TokenAmount::ZERO)),
        }
    }

    async fn buy_now(&self, req: BuyRequest) -> Result<TxReceipt, ContractError> {
        self.recorder.act(Call::Buy(req)).await
    }

    async fn make_offer(&self, req: OfferRequest) -> Result<TxReceipt, ContractError> {
        self.recorder.act(Call::Offer(req)).await
    }

    async fn make_bid(&self, req: BidRequest) -> Result<TxReceipt, ContractError> {
        self.recorder.act(Call::Bid(req)).await
    }

    async fn accept_offer(&self, req: AcceptOfferRequest) -> Result<TxReceipt, ContractError> {
        self.recorder.act(Call::AcceptOffer(req)).await
    }

    async fn create_direct_listing(&self, req: NewListing) -> Result<TxReceipt, ContractError> {
        self.recorder.act(Call::CreateDirect(req)).await
    }

    async fn create_auction_listing(&self, req: NewAuction) -> Result<TxReceipt, ContractError> {
        self.recorder.act(Call::CreateAuction(req)).await
    }
}

#[derive(Default)]
pub struct RecordingCollection {
    minters: Mutex<Vec<Address>>,
    owned: Mutex<HashMap<Address, Vec<Asset>>>,
    recorder: Recorder,
}

impl RecordingCollection {
    pub fn grant_minter(&self, address: &str) {
        self.minters.lock().unwrap().push(Address::new(address));
    }

    pub fn give(&self, owner: &str, asset_id: &str) {
        self.owned
            .lock()
            .unwrap()
            .entry(Address::new(owner))
            .or_default()
            .push(asset(asset_id));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.calls.lock().unwrap().clone()
    }

    pub fn fail_with(&self, msg: &str) {
        *self.recorder.failure.lock().unwrap() = Some(msg.to_string());
    }
}

#[async_trait::async_trait]
impl Collection for RecordingCollection {
    async fn mint_to(
        &self,
        owner: &Address,
        metadata: AssetMetadata,
    ) -> Result<TxReceipt, ContractError> {
        self.recorder
            .act(Call::Mint {
                owner: owner.clone(),
                name: metadata.name,
            })
            .await
    }

    async fn has_minter_role(&self, address: &Address) -> Result<bool, ContractError> {
        Ok(self.minters.lock().unwrap().contains(address))
    }

    async fn owned_assets(&self, owner: &Address) -> Result<Vec<Asset>, ContractError> {
        Ok(self
            .owned
            .lock()
            .unwrap()
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }
}

/// Wallet that records switch requests but stays on its chain.
pub struct RecordingWallet {
    address: Option<Address>,
    chain_id: u64,
    switches: Mutex<Vec<u64>>,
}

impl RecordingWallet {
    pub fn new(address: Option<&str>, chain_id: u64) -> Self {
        Self {
            address: address.map(Address::new),
            chain_id,
            switches: Mutex::new(Vec::new()),
        }
    }

    pub fn switch_requests(&self) -> Vec<u64> {
        self.switches.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Wallet for RecordingWallet {
    fn address(&self) -> Option<Address> {
        self.address.clone()
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn switch_network(&self, chain_id: u64) -> Result<(), ContractError> {
        self.switches.lock().unwrap().push(chain_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

pub fn test_config() -> Config {
    Config {
        marketplace_contract: "0xmarket".into(),
        collection_contract: "0xcollection".into(),
        chain_id: CHAIN_ID,
        native_symbol: "ETH".into(),
        native_decimals: 18,
        listing_duration_secs: 604_800,
        index_path: "/".into(),
        snapshot_path: "./market-snapshot.json".into(),
    }
}

/// Session wired to recording fakes, with handles to each.
pub struct Fixture {
    pub session: Arc<Session>,
    pub marketplace: Arc<RecordingMarketplace>,
    pub collection: Arc<RecordingCollection>,
    pub wallet: Arc<RecordingWallet>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

pub struct FixtureBuilder {
    chain_id: u64,
    address: Option<String>,
    with_marketplace: bool,
    listings: Vec<Listing>,
    offers: Vec<Offer>,
}

pub fn fixture() -> FixtureBuilder {
    FixtureBuilder {
        chain_id: CHAIN_ID,
        address: Some(BUYER.to_string()),
        with_marketplace: true,
        listings: Vec::new(),
        offers: Vec::new(),
    }
}

impl FixtureBuilder {
    pub fn on_chain(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn address(mut self, address: Option<&str>) -> Self {
        self.address = address.map(str::to_string);
        self
    }

    pub fn without_marketplace(mut self) -> Self {
        self.with_marketplace = false;
        self
    }

    pub fn listing(mut self, listing: Listing) -> Self {
        self.listings.push(listing);
        self
    }

    pub fn offer(mut self, listing_id: &str, offeror: &str, amount: &str) -> Self {
        self.offers.push(Offer {
            listing_id: ListingId::new(listing_id),
            offeror: Address::new(offeror),
            total_offer_amount: eth(amount),
        });
        self
    }

    pub fn build(self) -> Fixture {
        let marketplace = Arc::new(RecordingMarketplace::default());
        for listing in self.listings {
            marketplace.add_listing(listing);
        }
        for offer in self.offers {
            marketplace.add_offer(offer);
        }
        let collection = Arc::new(RecordingCollection::default());
        let wallet = Arc::new(RecordingWallet::new(self.address.as_deref(), self.chain_id));
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());

        let mut session = Session::new(
            test_config(),
            wallet.clone(),
            notifier.clone(),
            navigator.clone(),
        );
        if self.with_marketplace {
            session = session.with_marketplace(marketplace.clone());
        }
        session = session.with_collection(collection.clone());

        Fixture {
            session: Arc::new(session),
            marketplace,
            collection,
            wallet,
            notifier,
            navigator,
        }
    }
}
