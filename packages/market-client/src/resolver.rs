//! Bid / offer / buyout resolution.
//!
//! Turns the amount typed on a listing page into exactly one contract
//! request. Minimum-bid rules are the contract's business; nothing here
//! second-guesses them.

use crate::chain::{BidRequest, BuyRequest, OfferRequest};
use crate::guard::ActionKind;
use market_types::{parse_units, AmountError, Listing, ListingKind};

/// The single request a submission turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    Buy(BuyRequest),
    Offer(OfferRequest),
    Bid(BidRequest),
}

impl PlannedAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlannedAction::Buy(_) => ActionKind::Buy,
            PlannedAction::Offer(_) => ActionKind::Offer,
            PlannedAction::Bid(_) => ActionKind::Bid,
        }
    }
}

/// Decide what `amount` means for `listing`.
///
/// The amount is parsed with the decimals of the listing's currency. On a
/// direct listing an amount equal to the buyout price (compared in smallest
/// units) is a purchase; anything else is an offer for one token. On an
/// auction every amount is a bid.
pub fn resolve(listing: &Listing, amount: &str) -> Result<PlannedAction, AmountError> {
    let value = parse_units(amount, listing.buyout_price.decimals)?;

    let action = match listing.kind() {
        ListingKind::Direct if value == listing.buyout_price.value => {
            PlannedAction::Buy(BuyRequest {
                listing_id: listing.id.clone(),
                quantity: 1,
                kind: ListingKind::Direct,
            })
        }
        ListingKind::Direct => PlannedAction::Offer(OfferRequest {
            listing_id: listing.id.clone(),
            quantity: 1,
            price_per_token: value,
        }),
        ListingKind::Auction => PlannedAction::Bid(BidRequest {
            listing_id: listing.id.clone(),
            bid: value,
        }),
    };
    Ok(action)
}
