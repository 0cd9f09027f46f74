// =============================================================================
// Listing Page Flow Integration Tests
// =============================================================================
// End-to-end flows through ListingPage against the recording fakes:
// - offer vs. buyout resolution on direct listings
// - auction bids never become purchases
// - seller-side offer acceptance
// - in-flight guards shared per listing across pages
// - network mismatch aborts every action
//
// Run with:
//   cargo test -p market-integration-tests listing_flow_tests

use anyhow::Result;
use market_client::chain::{AcceptOfferRequest, BidRequest, BuyRequest, OfferRequest};
use market_client::guard::{ActionKey, ActionKind};
use market_client::notify::Notice;
use market_client::testing::{auction_listing, direct_listing, eth, fixture, Call, BUYER, SELLER};
use market_client::{Error, ListingPage, Outcome};
use market_types::{Address, ListingId, ListingKind};
use std::sync::Arc;

fn page(fx: &market_client::testing::Fixture, id: &str) -> ListingPage {
    ListingPage::new(Arc::clone(&fx.session), ListingId::new(id))
}

#[tokio::test]
async fn test_offer_then_buyout_on_direct_listing() -> Result<()> {
    let fx = fixture().listing(direct_listing("1", "1")).build();
    let page = page(&fx, "1");
    page.load().await?;
    assert_eq!(page.placeholder().as_deref(), Some("Enter Offer Amount"));

    page.set_amount(" 0.4 ");
    let outcome = page.submit().await?;
    assert!(outcome.is_submitted());
    assert_eq!(page.pending_amount(), "");

    page.set_amount("1.000");
    page.submit().await?;

    assert_eq!(
        fx.marketplace.actions(),
        vec![
            Call::Offer(OfferRequest {
                listing_id: ListingId::new("1"),
                quantity: 1,
                price_per_token: eth("0.4"),
            }),
            Call::Buy(BuyRequest {
                listing_id: ListingId::new("1"),
                quantity: 1,
                kind: ListingKind::Direct,
            }),
        ]
    );
    // Only the purchase leaves the page.
    assert_eq!(fx.navigator.paths(), vec!["/".to_string()]);
    assert!(fx
        .notifier
        .notices()
        .contains(&Notice::Loading("Buyout price met, buying NFT...".into())));
    Ok(())
}

#[tokio::test]
async fn test_auction_bid_at_buyout_stays_a_bid() -> Result<()> {
    let fx = fixture()
        .listing(auction_listing("2", "2", Some("0.5")))
        .build();
    let page = page(&fx, "2");
    page.load().await?;
    assert_eq!(page.placeholder().as_deref(), Some("0.5 ETH or more"));

    page.set_amount("2");
    page.submit().await?;

    assert_eq!(
        fx.marketplace.actions(),
        vec![Call::Bid(BidRequest {
            listing_id: ListingId::new("2"),
            bid: eth("2"),
        })]
    );
    assert!(fx.navigator.paths().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_amount_keeps_input_and_calls_nothing() -> Result<()> {
    let fx = fixture().listing(direct_listing("1", "1")).build();
    let page = page(&fx, "1");
    page.load().await?;

    page.set_amount("abc");
    let err = page.submit().await.unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));
    assert_eq!(page.pending_amount(), "abc");
    assert!(fx.marketplace.actions().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_bid_keeps_amount_for_retry() -> Result<()> {
    let fx = fixture()
        .listing(auction_listing("2", "2", None))
        .build();
    fx.marketplace.fail_with("bid too low");
    let page = page(&fx, "2");
    page.load().await?;

    page.set_amount("0.1");
    let err = page.submit().await.unwrap_err();
    assert!(matches!(
        err,
        Error::ActionRejected {
            action: ActionKind::Bid,
            ..
        }
    ));
    assert_eq!(page.pending_amount(), "0.1");
    assert_eq!(
        fx.notifier.notices().last(),
        Some(&Notice::Error("Bid could not be made".into()))
    );
    Ok(())
}

#[tokio::test]
async fn test_seller_accepts_listed_offer() -> Result<()> {
    let fx = fixture()
        .address(Some(SELLER))
        .listing(direct_listing("1", "1"))
        .offer("1", BUYER, "0.3")
        .build();
    let page = page(&fx, "1");
    page.load().await?;
    assert!(page.can_accept_offers());

    let offers = page.offers();
    assert_eq!(offers.len(), 1);
    assert_eq!(page.format_offer(&offers[0]), "0.3 ETH");

    let outcome = page.accept_offer(&offers[0].offeror).await?;
    assert!(outcome.is_submitted());
    assert_eq!(
        fx.marketplace.actions(),
        vec![Call::AcceptOffer(AcceptOfferRequest {
            listing_id: ListingId::new("1"),
            offeror: Address::new(BUYER),
        })]
    );
    assert_eq!(fx.navigator.paths(), vec!["/".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_buyer_cannot_accept_offers() -> Result<()> {
    let fx = fixture()
        .listing(direct_listing("1", "1"))
        .offer("1", BUYER, "0.3")
        .build();
    let page = page(&fx, "1");
    page.load().await?;
    assert!(!page.can_accept_offers());
    assert_eq!(page.accept_offer(&Address::new(BUYER)).await?, Outcome::Skipped);
    assert!(fx.marketplace.actions().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_buy_guard_is_shared_per_listing() -> Result<()> {
    let fx = fixture()
        .listing(direct_listing("1", "1"))
        .listing(direct_listing("3", "3"))
        .build();
    let first = Arc::new(page(&fx, "1"));
    let same_listing = page(&fx, "1");
    let other_listing = Arc::new(page(&fx, "3"));
    first.load().await?;
    same_listing.load().await?;
    other_listing.load().await?;

    fx.marketplace.pause();
    let pending: Vec<_> = [&first, &other_listing]
        .into_iter()
        .map(|page| {
            let page = Arc::clone(page);
            tokio::spawn(async move { page.buy_now().await })
        })
        .collect();
    while fx.marketplace.actions().len() < 2 {
        tokio::task::yield_now().await;
    }
    let key = ActionKey::on(ActionKind::Buy, "1");
    assert!(fx.session.in_flight().is_pending(&key));

    // A second page on the same listing shares the session guard.
    assert_eq!(
        same_listing.buy_now().await?,
        Outcome::AlreadyInFlight(ActionKind::Buy)
    );

    fx.marketplace.release();
    for handle in pending {
        assert!(handle.await??.is_submitted());
    }
    assert!(!fx.session.in_flight().is_pending(&key));
    assert_eq!(fx.marketplace.actions().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_wrong_network_blocks_every_action() -> Result<()> {
    let fx = fixture()
        .on_chain(137)
        .address(Some(SELLER))
        .listing(direct_listing("1", "1"))
        .build();
    let page = page(&fx, "1");
    page.load().await?;
    page.set_amount("1");

    assert_eq!(page.submit().await?, Outcome::NetworkSwitchRequested);
    assert_eq!(page.buy_now().await?, Outcome::NetworkSwitchRequested);
    assert_eq!(
        page.accept_offer(&Address::new(BUYER)).await?,
        Outcome::NetworkSwitchRequested
    );

    assert_eq!(fx.wallet.switch_requests(), vec![5, 5, 5]);
    assert!(fx.marketplace.actions().is_empty());
    assert_eq!(page.pending_amount(), "1");
    Ok(())
}
