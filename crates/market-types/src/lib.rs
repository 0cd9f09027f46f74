//! Shared listing types and amount arithmetic for the marketplace client.
//! No chain dependency, so any contract backend can use them.

mod amount;
mod error;
mod listing;

pub use amount::{format_units, parse_units, Currency, CurrencyValue, TokenAmount};
pub use error::AmountError;
pub use listing::{
    Address, Asset, AssetMetadata, ImageSource, Listing, ListingId, ListingKind, ListingTerms,
    Offer,
};
