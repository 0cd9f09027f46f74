// =============================================================================
// Snapshot Dry-Run Integration Tests
// =============================================================================
// Drives the real session against SnapshotBackend loaded from a JSON file,
// then checks the journal written back to disk.
//
// Run with:
//   cargo test -p market-integration-tests snapshot_dry_run_tests

use anyhow::Result;
use market_client::chain::Wallet;
use market_client::notify::{LogNavigator, LogNotifier};
use market_client::snapshot::{Snapshot, SnapshotBackend};
use market_client::testing::{test_config, BUYER, SELLER};
use market_client::{ListingPage, Outcome, Session};
use market_types::{Address, Currency, ListingId};
use std::sync::Arc;

use crate::utils::{sample_snapshot, scratch_dir};

fn open_session(path: &std::path::Path) -> Result<(Arc<Session>, Arc<SnapshotBackend>)> {
    let backend = Arc::new(SnapshotBackend::open(path, Currency::new("ETH", 18))?);
    let session = Session::new(
        test_config(),
        backend.clone(),
        Arc::new(LogNotifier),
        Arc::new(LogNavigator),
    )
    .with_marketplace(backend.clone())
    .with_collection(backend.clone());
    Ok((Arc::new(session), backend))
}

#[tokio::test]
async fn test_offer_and_bid_are_journaled_to_disk() -> Result<()> {
    let dir = scratch_dir("journal")?;
    let path = dir.join("snapshot.json");
    std::fs::write(&path, serde_json::to_string_pretty(&sample_snapshot(BUYER))?)?;

    let (session, backend) = open_session(&path)?;

    let direct = ListingPage::new(Arc::clone(&session), ListingId::new("1"));
    direct.load().await?;
    assert_eq!(direct.offers().len(), 1);
    direct.set_amount("0.5");
    assert!(direct.submit().await?.is_submitted());

    let auction = ListingPage::new(Arc::clone(&session), ListingId::new("2"));
    auction.load().await?;
    assert_eq!(auction.placeholder().as_deref(), Some("0.5 ETH or more"));
    auction.set_amount("0.75");
    assert!(auction.submit().await?.is_submitted());

    backend.save()?;
    let reloaded = Snapshot::load(&path)?;
    let actions: Vec<&str> = reloaded.journal.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["make_offer", "make_bid"]);
    assert_eq!(reloaded.journal[1].detail, "listing=2 bid=0.75 ETH");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn test_seller_is_matched_case_insensitively() -> Result<()> {
    let dir = scratch_dir("seller")?;
    let path = dir.join("snapshot.json");
    std::fs::write(&path, serde_json::to_string(&sample_snapshot(SELLER))?)?;

    let (session, backend) = open_session(&path)?;
    let page = ListingPage::new(Arc::clone(&session), ListingId::new("1"));
    page.load().await?;
    assert!(page.can_accept_offers());
    assert!(page.accept_offer(&Address::new(BUYER)).await?.is_submitted());
    assert_eq!(backend.journal()[0].action, "accept_offer");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[tokio::test]
async fn test_snapshot_wallet_switches_network() -> Result<()> {
    let dir = scratch_dir("network")?;
    let path = dir.join("snapshot.json");
    let mut snapshot = sample_snapshot(BUYER);
    snapshot["chain_id"] = 1.into();
    std::fs::write(&path, serde_json::to_string(&snapshot)?)?;

    let (session, backend) = open_session(&path)?;
    let page = ListingPage::new(Arc::clone(&session), ListingId::new("1"));
    page.load().await?;

    assert_eq!(page.buy_now().await?, Outcome::NetworkSwitchRequested);
    assert_eq!(backend.chain_id(), 5);
    assert!(backend.journal().is_empty());

    // Next attempt goes through on the switched network.
    assert!(page.buy_now().await?.is_submitted());
    assert_eq!(backend.journal()[0].action, "buy_now");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
