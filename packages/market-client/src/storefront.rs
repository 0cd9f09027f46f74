//! Index page: the active listings grid.

use crate::error::Error;
use crate::session::Session;
use market_types::{Listing, ListingKind};
use tracing::debug;

/// Active listings, optionally only those of one kind.
/// Empty when no marketplace contract is connected.
pub async fn active_listings(
    session: &Session,
    kind: Option<ListingKind>,
) -> Result<Vec<Listing>, Error> {
    let Some(marketplace) = session.marketplace() else {
        return Ok(Vec::new());
    };
    let mut listings = marketplace.active_listings().await.map_err(Error::Query)?;
    if let Some(kind) = kind {
        listings.retain(|l| l.kind() == kind);
    }
    debug!(count = listings.len(), "Active listings loaded");
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{auction_listing, direct_listing, fixture};

    #[tokio::test]
    async fn test_filters_by_kind() {
        let fx = fixture()
            .listing(direct_listing("1", "1"))
            .listing(auction_listing("2", "2", None))
            .listing(direct_listing("3", "3"))
            .build();

        assert_eq!(active_listings(&fx.session, None).await.unwrap().len(), 3);
        let auctions = active_listings(&fx.session, Some(ListingKind::Auction))
            .await
            .unwrap();
        assert_eq!(auctions.len(), 1);
        assert_eq!(auctions[0].id.as_str(), "2");
    }

    #[tokio::test]
    async fn test_without_marketplace_is_empty() {
        let fx = fixture()
            .listing(direct_listing("1", "1"))
            .without_marketplace()
            .build();
        assert!(active_listings(&fx.session, None).await.unwrap().is_empty());
    }
}
