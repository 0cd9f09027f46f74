//! Listing detail page: buy now, bid or offer, and seller-side offer acceptance.

use crate::chain::{AcceptOfferRequest, BuyRequest};
use crate::error::Error;
use crate::guard::{ActionKey, ActionKind};
use crate::metrics::METRICS;
use crate::notify::Notice;
use crate::resolver::{resolve, PlannedAction};
use crate::session::{Outcome, Session};
use market_types::{Address, CurrencyValue, Listing, ListingId, ListingKind, Offer};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Default)]
struct PageState {
    listing: Option<Listing>,
    offers: Vec<Offer>,
    min_next_bid: Option<CurrencyValue>,
    /// Bid/offer amount as typed, whitespace trimmed.
    pending_amount: String,
}

/// Controller behind one listing page.
///
/// Holds the last listing snapshot plus the pending amount. All methods take
/// `&self`; the state lock is never held across an await.
pub struct ListingPage {
    session: Arc<Session>,
    listing_id: ListingId,
    state: Mutex<PageState>,
}

impl ListingPage {
    pub fn new(session: Arc<Session>, listing_id: ListingId) -> Self {
        Self {
            session,
            listing_id,
            state: Mutex::new(PageState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // --- Loading ---

    /// Fetch the listing, then its offers (direct) or minimum next bid (auction).
    /// `Ok(None)` when there is no marketplace handle or no such listing.
    pub async fn load(&self) -> Result<Option<Listing>, Error> {
        let Some(marketplace) = self.session.marketplace() else {
            debug!(listing = %self.listing_id, "No marketplace contract, skipping load");
            return Ok(None);
        };

        let listing = marketplace
            .listing(&self.listing_id)
            .await
            .map_err(Error::Query)?;
        {
            let mut state = self.state();
            state.listing = listing.clone();
            state.offers.clear();
            state.min_next_bid = None;
        }

        match listing.as_ref().map(Listing::kind) {
            Some(ListingKind::Direct) => self.refresh_offers().await?,
            Some(ListingKind::Auction) => {
                // Only feeds the placeholder; the page stays usable without it.
                if let Err(e) = self.refresh_minimum_next_bid().await {
                    warn!(listing = %self.listing_id, error = %e, "Minimum next bid unavailable");
                }
            }
            None => info!(listing = %self.listing_id, "Listing not found"),
        }
        Ok(listing)
    }

    pub async fn refresh_offers(&self) -> Result<(), Error> {
        let Some(marketplace) = self.session.marketplace() else {
            return Ok(());
        };
        let offers = marketplace
            .offers(&self.listing_id)
            .await
            .map_err(Error::Query)?;
        debug!(listing = %self.listing_id, count = offers.len(), "Offers loaded");
        self.state().offers = offers;
        Ok(())
    }

    /// Informational only: feeds the placeholder, never gates a bid.
    pub async fn refresh_minimum_next_bid(&self) -> Result<(), Error> {
        let is_auction = self
            .listing()
            .is_some_and(|l| l.kind() == ListingKind::Auction);
        let Some(marketplace) = self.session.marketplace() else {
            return Ok(());
        };
        if !is_auction {
            return Ok(());
        }
        let min = marketplace
            .minimum_next_bid(&self.listing_id)
            .await
            .map_err(Error::Query)?;
        debug!(listing = %self.listing_id, min_next_bid = %min, "Minimum next bid loaded");
        self.state().min_next_bid = Some(min);
        Ok(())
    }

    // --- View state ---

    pub fn listing_id(&self) -> &ListingId {
        &self.listing_id
    }

    pub fn listing(&self) -> Option<Listing> {
        self.state().listing.clone()
    }

    pub fn offers(&self) -> Vec<Offer> {
        self.state().offers.clone()
    }

    pub fn minimum_next_bid(&self) -> Option<CurrencyValue> {
        self.state().min_next_bid.clone()
    }

    pub fn pending_amount(&self) -> String {
        self.state().pending_amount.clone()
    }

    pub fn set_amount(&self, input: &str) {
        self.state().pending_amount = input.trim().to_string();
    }

    /// Hint shown in the empty amount field.
    pub fn placeholder(&self) -> Option<String> {
        let state = self.state();
        let listing = state.listing.as_ref()?;
        let text = match listing.kind() {
            ListingKind::Direct => "Enter Offer Amount".to_string(),
            ListingKind::Auction => match &state.min_next_bid {
                Some(min) if !min.is_zero() => format!("{min} or more"),
                _ => "Enter Bid Amount".to_string(),
            },
        };
        Some(text)
    }

    pub fn seconds_remaining(&self, now_secs: u64) -> Option<u64> {
        self.state()
            .listing
            .as_ref()
            .and_then(|l| l.seconds_remaining(now_secs))
    }

    /// Accept buttons are only offered to the seller of a direct listing.
    /// The contract does the real authorization.
    pub fn can_accept_offers(&self) -> bool {
        let Some(address) = self.session.address() else {
            return false;
        };
        self.state()
            .listing
            .as_ref()
            .is_some_and(|l| l.is_direct() && l.is_seller(&address))
    }

    /// Offer amount rendered in the native currency, e.g. `"0.5 ETH"`.
    pub fn format_offer(&self, offer: &Offer) -> String {
        self.session
            .currency()
            .value(offer.total_offer_amount)
            .to_string()
    }

    // --- Actions ---

    /// Submit the pending amount as a buy, offer or bid.
    ///
    /// Success clears the pending amount; failure keeps it for correction.
    pub async fn submit(&self) -> Result<Outcome, Error> {
        if let Some(outcome) = self.session.switch_if_mismatched().await {
            return Ok(outcome);
        }
        let (Some(listing), Some(marketplace)) = (self.listing(), self.session.marketplace())
        else {
            debug!(listing = %self.listing_id, "Listing or contract missing, ignoring submit");
            return Ok(Outcome::Skipped);
        };

        let amount = self.pending_amount();
        let plan = match resolve(&listing, &amount) {
            Ok(plan) => plan,
            Err(e) => {
                METRICS.invalid_amounts.fetch_add(1, Ordering::Relaxed);
                warn!(listing = %listing.id, amount = %amount, error = %e, "Invalid amount");
                self.session
                    .notify(Notice::Error(format!("Enter a valid amount: {e}")));
                return Err(Error::InvalidAmount(e));
            }
        };

        info!(listing = %listing.id, action = %plan.kind(), amount = %amount, "Submitting");
        let key = ActionKey::on(plan.kind(), &listing.id);
        let result = match plan {
            PlannedAction::Buy(req) => {
                let result = self
                    .session
                    .execute(
                        key,
                        Some(Notice::Loading("Buyout price met, buying NFT...".into())),
                        marketplace.buy_now(req),
                    )
                    .await;
                if !matches!(result, Ok(Outcome::AlreadyInFlight(_))) {
                    METRICS.buyouts_detected.fetch_add(1, Ordering::Relaxed);
                }
                result
            }
            PlannedAction::Offer(req) => {
                self.session
                    .execute(key, None, marketplace.make_offer(req))
                    .await
            }
            PlannedAction::Bid(req) => {
                self.session
                    .execute(key, None, marketplace.make_bid(req))
                    .await
            }
        };

        if matches!(result, Ok(Outcome::Submitted { .. })) {
            // Keep anything typed while the call was pending.
            let mut state = self.state();
            if state.pending_amount == amount {
                state.pending_amount.clear();
            }
        }
        result
    }

    /// "Buy Now": purchase one token at the buyout price.
    pub async fn buy_now(&self) -> Result<Outcome, Error> {
        if let Some(outcome) = self.session.switch_if_mismatched().await {
            return Ok(outcome);
        }
        let (Some(listing), Some(marketplace)) = (self.listing(), self.session.marketplace())
        else {
            debug!(listing = %self.listing_id, "Listing or contract missing, ignoring buy");
            return Ok(Outcome::Skipped);
        };

        let req = BuyRequest {
            listing_id: listing.id.clone(),
            quantity: 1,
            kind: listing.kind(),
        };
        self.session
            .execute(
                ActionKey::on(ActionKind::Buy, &listing.id),
                None,
                marketplace.buy_now(req),
            )
            .await
    }

    /// Seller accepts the offer made by `offeror`.
    pub async fn accept_offer(&self, offeror: &Address) -> Result<Outcome, Error> {
        if let Some(outcome) = self.session.switch_if_mismatched().await {
            return Ok(outcome);
        }
        let Some(marketplace) = self.session.marketplace() else {
            return Ok(Outcome::Skipped);
        };
        if !self.can_accept_offers() {
            warn!(listing = %self.listing_id, "Accept offer requested by non-seller, ignoring");
            return Ok(Outcome::Skipped);
        }

        let req = AcceptOfferRequest {
            listing_id: self.listing_id.clone(),
            offeror: offeror.clone(),
        };
        info!(listing = %self.listing_id, offeror = %offeror, "Accepting offer");
        self.session
            .execute(
                ActionKey::on(ActionKind::AcceptOffer, &self.listing_id),
                None,
                marketplace.accept_offer(req),
            )
            .await
    }
}
