//! In-flight tracking so the same action is never submitted twice at once.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// User-initiated operations that reach the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Buy,
    Offer,
    Bid,
    AcceptOffer,
    CreateListing,
    Mint,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Buy => "buy",
            Self::Offer => "offer",
            Self::Bid => "bid",
            Self::AcceptOffer => "accept offer",
            Self::CreateListing => "create listing",
            Self::Mint => "mint",
        };
        f.write_str(name)
    }
}

/// What a guard is held for: an action kind plus the listing or token it
/// targets. A bid on one auction never blocks a bid on another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionKey {
    kind: ActionKind,
    target: Option<String>,
}

impl ActionKey {
    pub fn on(kind: ActionKind, target: impl std::fmt::Display) -> Self {
        Self {
            kind,
            target: Some(target.to_string()),
        }
    }

    /// Key with no target; at most one such action at a time.
    pub fn global(kind: ActionKind) -> Self {
        Self { kind, target: None }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }
}

impl std::fmt::Display for ActionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} on {target}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Keys of the calls currently pending.
#[derive(Debug, Default)]
pub struct InFlight {
    pending: Mutex<HashSet<ActionKey>>,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn pending(&self) -> MutexGuard<'_, HashSet<ActionKey>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claim `key`. `None` if a call for the same key is already pending.
    pub fn try_acquire(self: &Arc<Self>, key: ActionKey) -> Option<ActionGuard> {
        if !self.pending().insert(key.clone()) {
            return None;
        }
        Some(ActionGuard {
            flags: Arc::clone(self),
            key,
        })
    }

    pub fn is_pending(&self, key: &ActionKey) -> bool {
        self.pending().contains(key)
    }

    pub fn pending_count(&self) -> u32 {
        self.pending().len() as u32
    }
}

/// RAII guard from [`InFlight::try_acquire`]. Releases the key on drop.
#[derive(Debug)]
pub struct ActionGuard {
    flags: Arc<InFlight>,
    key: ActionKey,
}

impl ActionGuard {
    pub fn key(&self) -> &ActionKey {
        &self.key
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.flags.pending().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_of_same_key_is_refused() {
        let flags = InFlight::new();
        let key = ActionKey::on(ActionKind::Bid, "2");
        let guard = flags.try_acquire(key.clone()).unwrap();
        assert!(flags.try_acquire(key.clone()).is_none());
        assert!(flags.is_pending(&key));
        assert_eq!(guard.key(), &key);
        assert_eq!(key.to_string(), "bid on 2");
    }

    #[test]
    fn test_kinds_and_targets_are_independent() {
        let flags = InFlight::new();
        let _bid = flags.try_acquire(ActionKey::on(ActionKind::Bid, "2")).unwrap();
        let _other = flags.try_acquire(ActionKey::on(ActionKind::Bid, "3")).unwrap();
        let _buy = flags.try_acquire(ActionKey::on(ActionKind::Buy, "2")).unwrap();
        assert_eq!(flags.pending_count(), 3);
        assert!(!flags.is_pending(&ActionKey::global(ActionKind::Mint)));
    }

    #[test]
    fn test_drop_releases() {
        let flags = InFlight::new();
        let key = ActionKey::global(ActionKind::Mint);
        drop(flags.try_acquire(key.clone()).unwrap());
        assert!(!flags.is_pending(&key));
        assert!(flags.try_acquire(key).is_some());
    }
}
