//! # Marketplace client
//!
//! Wallet-side controller for an NFT marketplace. Browsing, bidding,
//! offering, buying, accepting offers, listing and minting all resolve to a
//! single contract call behind the [`chain`] traits; the contracts own every
//! rule about prices, auctions and escrow.
//!
//! ## Quick Start
//! ```bash
//! cargo run --bin market -- listings
//! cargo run --bin market -- bid 2 0.25
//! ```

pub mod chain;
pub mod config;
pub mod create_listing;
mod error;
pub mod guard;
pub mod listing_page;
pub mod metrics;
pub mod mint;
pub mod notify;
pub mod resolver;
pub mod session;
pub mod snapshot;
pub mod storefront;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::Config;
pub use error::{ContractError, Error};
pub use listing_page::ListingPage;
pub use session::{Outcome, Session};
