//! Error types for the marketplace client.

use crate::guard::ActionKind;
use market_types::AmountError;
use std::fmt;

/// Opaque failure reported by a contract, wallet or storage backend.
/// The cause (insufficient funds, bid too low, expired listing, wallet
/// rejection) is logged, never classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError(pub String);

impl ContractError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ContractError {}

/// Client error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error.
    Config(String),
    /// Wallet is on another chain; a switch was requested.
    NetworkMismatch { expected: u64, actual: u64 },
    /// Listing, contract handle or wallet address is missing.
    PreconditionUnmet(String),
    /// User input is not a valid amount.
    InvalidAmount(AmountError),
    /// Caller may not perform the action (e.g. lacks the minter role).
    Unauthorized(String),
    /// A contract read failed.
    Query(ContractError),
    /// The external call failed.
    ActionRejected {
        action: ActionKind,
        source: ContractError,
    },
    /// Snapshot file could not be read or parsed.
    Snapshot(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::NetworkMismatch { expected, actual } => {
                write!(f, "wallet is on chain {actual}, expected {expected}")
            }
            Error::PreconditionUnmet(msg) => write!(f, "precondition unmet: {msg}"),
            Error::InvalidAmount(e) => write!(f, "invalid amount: {e}"),
            Error::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            Error::Query(e) => write!(f, "query failed: {e}"),
            Error::ActionRejected { action, source } => {
                write!(f, "{action} rejected: {source}")
            }
            Error::Snapshot(msg) => write!(f, "snapshot error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidAmount(e) => Some(e),
            Error::ActionRejected { source, .. } => Some(source),
            Error::Query(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AmountError> for Error {
    fn from(e: AmountError) -> Self {
        Error::InvalidAmount(e)
    }
}
