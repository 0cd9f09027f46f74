//! Session context shared by every page controller.
//!
//! Built once when the wallet connects and passed around behind an `Arc`:
//! connected wallet, contract handles, feedback sinks and in-flight guards.

use crate::chain::{Collection, Marketplace, TxReceipt, Wallet};
use crate::config::Config;
use crate::error::{ContractError, Error};
use crate::guard::{ActionKey, ActionKind, InFlight};
use crate::metrics::METRICS;
use crate::notify::{Navigator, Notice, Notifier};
use market_types::{Address, Currency};
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a user-initiated action that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exactly one external call was made and it succeeded.
    Submitted {
        action: ActionKind,
        receipt: TxReceipt,
    },
    /// Wallet was on the wrong chain; a switch was requested instead.
    NetworkSwitchRequested,
    /// A precondition was unmet; nothing happened.
    Skipped,
    /// An identical action is still pending.
    AlreadyInFlight(ActionKind),
}

impl Outcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Outcome::Submitted { .. })
    }
}

pub struct Session {
    config: Config,
    wallet: Arc<dyn Wallet>,
    marketplace: Option<Arc<dyn Marketplace>>,
    collection: Option<Arc<dyn Collection>>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    in_flight: Arc<InFlight>,
}

impl Session {
    pub fn new(
        config: Config,
        wallet: Arc<dyn Wallet>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        info!(
            chain_id = config.chain_id,
            marketplace = %config.marketplace_contract,
            collection = %config.collection_contract,
            "Session created"
        );
        Self {
            config,
            wallet,
            marketplace: None,
            collection: None,
            notifier,
            navigator,
            in_flight: InFlight::new(),
        }
    }

    pub fn with_marketplace(mut self, marketplace: Arc<dyn Marketplace>) -> Self {
        self.marketplace = Some(marketplace);
        self
    }

    pub fn with_collection(mut self, collection: Arc<dyn Collection>) -> Self {
        self.collection = Some(collection);
        self
    }

    // --- Accessors ---

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn address(&self) -> Option<Address> {
        self.wallet.address()
    }

    pub fn currency(&self) -> Currency {
        self.config.native_currency()
    }

    pub fn marketplace(&self) -> Option<&Arc<dyn Marketplace>> {
        self.marketplace.as_ref()
    }

    pub fn collection(&self) -> Option<&Arc<dyn Collection>> {
        self.collection.as_ref()
    }

    pub fn in_flight(&self) -> &Arc<InFlight> {
        &self.in_flight
    }

    pub fn is_network_mismatched(&self) -> bool {
        self.wallet.chain_id() != self.config.chain_id
    }

    // --- Feedback ---

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    pub fn navigate_index(&self) {
        self.navigator.navigate(&self.config.index_path);
    }

    // --- Action plumbing ---

    /// Request a switch when the wallet is on another chain.
    /// `Err(NetworkMismatch)` means the caller must abort its action.
    pub async fn ensure_network(&self) -> Result<(), Error> {
        if !self.is_network_mismatched() {
            return Ok(());
        }
        let actual = self.wallet.chain_id();
        let expected = self.config.chain_id;

        METRICS.network_switches.fetch_add(1, Ordering::Relaxed);
        info!(expected, actual, "Network mismatch, requesting switch");
        if let Err(e) = self.wallet.switch_network(expected).await {
            warn!(error = %e, "Network switch request failed");
        }
        Err(Error::NetworkMismatch { expected, actual })
    }

    /// [`ensure_network`](Self::ensure_network) folded into an early-return outcome.
    pub(crate) async fn switch_if_mismatched(&self) -> Option<Outcome> {
        match self.ensure_network().await {
            Ok(()) => None,
            Err(_) => Some(Outcome::NetworkSwitchRequested),
        }
    }

    /// Run one external call under the in-flight guard for `key`, then
    /// report the result. `loading` is shown only once the guard is held.
    /// Navigation to the index only follows a resolved success, and only for
    /// actions that leave the current page.
    pub(crate) async fn execute<F>(
        &self,
        key: ActionKey,
        loading: Option<Notice>,
        call: F,
    ) -> Result<Outcome, Error>
    where
        F: Future<Output = Result<TxReceipt, ContractError>>,
    {
        let action = key.kind();
        let Some(_guard) = self.in_flight.try_acquire(key) else {
            METRICS.in_flight_refusals.fetch_add(1, Ordering::Relaxed);
            warn!(action = %action, "Action already in flight, ignoring");
            return Ok(Outcome::AlreadyInFlight(action));
        };

        if let Some(notice) = loading {
            self.notify(notice);
        }
        METRICS.actions_submitted.fetch_add(1, Ordering::Relaxed);
        match call.await {
            Ok(receipt) => {
                METRICS.record_outcome(true);
                info!(action = %action, tx = %receipt.tx_hash, "Action confirmed");
                self.notify(Notice::Success(success_message(action).into()));
                if leaves_page(action) {
                    self.navigate_index();
                }
                Ok(Outcome::Submitted { action, receipt })
            }
            Err(source) => {
                METRICS.record_outcome(false);
                warn!(action = %action, error = %source, "Action failed");
                self.notify(Notice::Error(failure_message(action).into()));
                Err(Error::ActionRejected { action, source })
            }
        }
    }
}

fn success_message(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Buy => "NFT bought successfully!",
        ActionKind::Offer => "Offer made successfully!",
        ActionKind::Bid => "Bid made successfully!",
        ActionKind::AcceptOffer => "Offer accepted successfully!",
        ActionKind::CreateListing => "Listing created successfully!",
        ActionKind::Mint => "Item minted!",
    }
}

fn failure_message(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Buy => "NFT could not be bought",
        ActionKind::Offer => "Offer could not be made",
        ActionKind::Bid => "Bid could not be made",
        ActionKind::AcceptOffer => "Offer could not be accepted",
        ActionKind::CreateListing => "Listing could not be created",
        ActionKind::Mint => "Item could not be minted",
    }
}

fn leaves_page(action: ActionKind) -> bool {
    matches!(
        action,
        ActionKind::Buy | ActionKind::AcceptOffer | ActionKind::CreateListing | ActionKind::Mint
    )
}
