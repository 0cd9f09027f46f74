//! Listing creation: put an owned asset up for direct sale or auction.

use crate::chain::{NewAuction, NewListing};
use crate::error::Error;
use crate::guard::{ActionKey, ActionKind};
use crate::metrics::METRICS;
use crate::notify::Notice;
use crate::session::{Outcome, Session};
use market_types::{Asset, ListingKind, TokenAmount};
use std::sync::atomic::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// What the seller filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingForm {
    /// Token id of the selected owned asset; `None` until one is picked.
    pub token_id: Option<String>,
    pub kind: ListingKind,
    pub price: String,
}

/// Assets the connected wallet holds in the configured collection.
/// Empty when no wallet or collection is connected.
pub async fn owned_assets(session: &Session) -> Result<Vec<Asset>, Error> {
    let (Some(owner), Some(collection)) = (session.address(), session.collection()) else {
        return Ok(Vec::new());
    };
    collection.owned_assets(&owner).await.map_err(Error::Query)
}

/// List the selected asset. One week, one token, native currency, starting
/// now; auctions carry no reserve price.
pub async fn create_listing(session: &Session, form: &ListingForm) -> Result<Outcome, Error> {
    if let Some(outcome) = session.switch_if_mismatched().await {
        return Ok(outcome);
    }
    let (Some(token_id), Some(marketplace)) = (form.token_id.as_ref(), session.marketplace())
    else {
        debug!("No asset selected or marketplace missing, ignoring create");
        return Ok(Outcome::Skipped);
    };

    let price = match session.currency().parse(form.price.trim()) {
        Ok(price) => price.value,
        Err(e) => {
            METRICS.invalid_amounts.fetch_add(1, Ordering::Relaxed);
            warn!(price = %form.price, error = %e, "Invalid listing price");
            session.notify(Notice::Error(format!("Enter a valid price: {e}")));
            return Err(Error::InvalidAmount(e));
        }
    };

    let listing = NewListing {
        asset_contract: session.config().collection_address(),
        token_id: token_id.clone(),
        currency_contract: None,
        quantity: 1,
        buyout_price_per_token: price,
        start_time_secs: now_secs(),
        duration_secs: session.config().listing_duration_secs,
    };

    info!(token_id = %token_id, kind = ?form.kind, price = %price, "Creating listing");
    let key = ActionKey::on(ActionKind::CreateListing, token_id);
    match form.kind {
        ListingKind::Direct => {
            session
                .execute(key, None, marketplace.create_direct_listing(listing))
                .await
        }
        ListingKind::Auction => {
            let auction = NewAuction {
                listing,
                reserve_price_per_token: TokenAmount::ZERO,
            };
            session
                .execute(key, None, marketplace.create_auction_listing(auction))
                .await
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
