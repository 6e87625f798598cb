//! Custody wallet domain types
//!
//! A custody wallet is shared by a fixed set of weighted owners. Every
//! sensitive action (fund withdrawal, owner addition/removal, owner or
//! weight change) travels through a request lifecycle: proposed by one
//! owner, approved by others, and executed only once enough vote weight
//! has accumulated.
//!
//! # Key Concepts
//!
//! - **Owner**: an identity holding a nonzero vote level. Owners are the
//!   only parties allowed to create, approve, or execute requests.
//! - **ConsensusPolicy**: the quorum rule. Required votes are recomputed
//!   from live totals on every decision, never cached.
//! - **Request**: a persisted, uniquely-identified proposal of one action,
//!   carrying its own vote tally, voter set, and lifecycle status.
//! - **EventLog**: the journal of committed transitions, kept for
//!   observers. No read path depends on it.
//!
//! This crate holds data and invariant checks only; the lifecycle state
//! machine lives in `wallet-runtime`.

#![deny(unsafe_code)]

mod error;
mod event;
mod owner;
mod request;

pub use error::*;
pub use event::*;
pub use owner::*;
pub use request::*;

use serde::{Deserialize, Serialize};

/// Unique identifier for a wallet instance
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletId(pub String);

impl WalletId {
    /// Generate a new random WalletId
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create a WalletId from a known string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Short display form (first 8 chars)
    pub fn short(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount of custodied value
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(pub u64);

impl Amount {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
