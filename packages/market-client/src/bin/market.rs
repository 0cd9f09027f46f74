//! Marketplace client binary: dry-runs every flow against a JSON snapshot.

use market_client::metrics::METRICS;
use market_client::notify::{LogNavigator, LogNotifier};
use market_client::snapshot::SnapshotBackend;
use market_client::storefront::active_listings;
use market_client::{Config, ListingPage, Outcome, Session};
use market_types::{Address, ListingId, ListingKind};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: market <listings [direct|auction] | show <id> | bid <id> <amount> | buy <id> | accept <id> <offeror>>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "FATAL: Config error, check MARKET_* env vars or market.toml");
            std::process::exit(1);
        }
    };
    info!(chain_id = config.chain_id, snapshot = %config.snapshot_path, "Configuration loaded");

    let backend = Arc::new(SnapshotBackend::open(
        config.snapshot_path.clone(),
        config.native_currency(),
    )?);
    let session = Arc::new(
        Session::new(
            config,
            backend.clone(),
            Arc::new(LogNotifier),
            Arc::new(LogNavigator),
        )
        .with_marketplace(backend.clone())
        .with_collection(backend.clone()),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match args.as_slice() {
        ["listings"] => return list(&session, None).await,
        ["listings", "direct"] => return list(&session, Some(ListingKind::Direct)).await,
        ["listings", "auction"] => return list(&session, Some(ListingKind::Auction)).await,
        ["show", id] => return show(&session, id).await,
        ["bid", id, amount] => {
            let page = open_page(&session, id).await?;
            page.set_amount(amount);
            page.submit().await
        }
        ["buy", id] => open_page(&session, id).await?.buy_now().await,
        ["accept", id, offeror] => {
            open_page(&session, id)
                .await?
                .accept_offer(&Address::new(*offeror))
                .await
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    match outcome {
        Ok(Outcome::Submitted { action, receipt }) => {
            println!("{action} submitted: {}", receipt.tx_hash);
            backend.save()?;
        }
        Ok(other) => println!("nothing submitted: {other:?}"),
        Err(e) => {
            error!(error = %e, "Action failed");
            std::process::exit(1);
        }
    }

    debug!("\n{}", METRICS.render(session.in_flight().pending_count()));
    Ok(())
}

async fn open_page(session: &Arc<Session>, id: &str) -> Result<ListingPage, market_client::Error> {
    let page = ListingPage::new(Arc::clone(session), ListingId::new(id));
    if page.load().await?.is_none() {
        return Err(market_client::Error::PreconditionUnmet(format!(
            "Listing {id} not found"
        )));
    }
    Ok(page)
}

async fn list(
    session: &Session,
    kind: Option<ListingKind>,
) -> Result<(), Box<dyn std::error::Error>> {
    for listing in active_listings(session, kind).await? {
        println!(
            "{:>6}  {:<16}  {:<24}  {}",
            listing.id,
            listing.kind().to_string(),
            listing.asset.name,
            listing.buyout_price
        );
    }
    Ok(())
}

async fn show(session: &Arc<Session>, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let page = open_page(session, id).await?;
    let Some(listing) = page.listing() else {
        return Ok(());
    };

    println!("{}", listing.asset.name);
    if !listing.asset.description.is_empty() {
        println!("{}", listing.asset.description);
    }
    println!("Seller:        {}", listing.seller);
    println!("Listing Type:  {}", listing.kind());
    println!("Buy it Now:    {}", listing.buyout_price);

    if let Some(min) = page.minimum_next_bid() {
        println!("Minimum Bid:   {min}");
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    if let Some(secs) = page.seconds_remaining(now) {
        println!(
            "Time Left:     {}d {:02}h {:02}m {:02}s",
            secs / 86_400,
            secs % 86_400 / 3_600,
            secs % 3_600 / 60,
            secs % 60
        );
    }

    let offers = page.offers();
    if listing.is_direct() {
        println!("Offers:        {}", offers.len());
        for offer in &offers {
            println!("  {}  {}", offer.offeror.short(), page.format_offer(offer));
        }
    }
    if let Some(hint) = page.placeholder() {
        println!("Amount hint:   {hint}");
    }
    Ok(())
}
