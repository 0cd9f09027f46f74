// =============================================================================
// Create Listing and Mint Integration Tests
// =============================================================================
// Seller-side flows: mint an item, list an owned asset, browse the storefront.
//
// Run with:
//   cargo test -p market-integration-tests create_and_mint_tests

use anyhow::Result;
use market_client::create_listing::{create_listing, owned_assets, ListingForm};
use market_client::mint::{can_mint, mint_item, MintForm};
use market_client::notify::Notice;
use market_client::storefront::active_listings;
use market_client::testing::{auction_listing, direct_listing, eth, fixture, Call, SELLER};
use market_client::{Error, Outcome};
use market_types::{Address, ImageSource, ListingKind, TokenAmount};

#[tokio::test]
async fn test_mint_then_list_owned_asset() -> Result<()> {
    let fx = fixture().address(Some(SELLER)).build();
    fx.collection.grant_minter(SELLER);
    assert!(can_mint(&fx.session).await?);

    let minted = mint_item(
        &fx.session,
        MintForm {
            name: "Gecko".into(),
            description: "A lizard".into(),
            image: Some(ImageSource::Uri("ipfs://gecko.png".into())),
        },
    )
    .await?;
    assert!(minted.is_submitted());
    assert_eq!(
        fx.collection.calls(),
        vec![Call::Mint {
            owner: Address::new(SELLER),
            name: "Gecko".into(),
        }]
    );

    fx.collection.give(SELLER, "7");
    let assets = owned_assets(&fx.session).await?;
    assert_eq!(assets.len(), 1);

    let form = ListingForm {
        token_id: Some(assets[0].id.clone()),
        kind: ListingKind::Auction,
        price: "1.5".into(),
    };
    assert!(create_listing(&fx.session, &form).await?.is_submitted());

    let calls = fx.marketplace.actions();
    let [Call::CreateAuction(auction)] = calls.as_slice() else {
        panic!("expected a single auction creation, got {calls:?}");
    };
    assert_eq!(auction.listing.token_id, "7");
    assert_eq!(auction.listing.buyout_price_per_token, eth("1.5"));
    assert_eq!(auction.reserve_price_per_token, TokenAmount::ZERO);
    assert_eq!(fx.navigator.paths(), vec!["/".to_string(), "/".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_invalid_listing_price_is_reported() -> Result<()> {
    let fx = fixture().build();
    let form = ListingForm {
        token_id: Some("7".into()),
        kind: ListingKind::Direct,
        price: "1.2.3".into(),
    };
    let err = create_listing(&fx.session, &form).await.unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)));
    assert!(matches!(fx.notifier.notices().as_slice(), [Notice::Error(_)]));
    assert!(fx.marketplace.actions().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_create_listing_on_wrong_network() -> Result<()> {
    let fx = fixture().on_chain(1).build();
    let form = ListingForm {
        token_id: Some("7".into()),
        kind: ListingKind::Direct,
        price: "1".into(),
    };
    assert_eq!(
        create_listing(&fx.session, &form).await?,
        Outcome::NetworkSwitchRequested
    );
    assert_eq!(fx.wallet.switch_requests(), vec![5]);
    assert!(fx.marketplace.actions().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_mint_without_role_is_refused() -> Result<()> {
    let fx = fixture().build();
    assert!(!can_mint(&fx.session).await?);
    let err = mint_item(
        &fx.session,
        MintForm {
            name: "Gecko".into(),
            description: String::new(),
            image: Some(ImageSource::Bytes(vec![0x89, 0x50])),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
    assert!(fx.collection.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_storefront_filters_listing_kinds() -> Result<()> {
    let fx = fixture()
        .listing(direct_listing("1", "1"))
        .listing(auction_listing("2", "2", None))
        .build();
    let direct = active_listings(&fx.session, Some(ListingKind::Direct)).await?;
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].kind(), ListingKind::Direct);
    assert_eq!(active_listings(&fx.session, None).await?.len(), 2);
    Ok(())
}
