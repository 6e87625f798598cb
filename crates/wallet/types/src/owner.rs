//! Owner identities and the consensus policy
//!
//! Owners are external key holders, each carrying a vote level. The
//! consensus policy turns the live vote total into the number of votes a
//! request must accumulate before it can execute.

use crate::{WalletError, WalletResult};
use serde::{Deserialize, Serialize};

/// Identity of an account interacting with the wallet
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a known string
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// The reserved empty identity; never a valid owner
    pub fn zero() -> Self {
        Self(String::new())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vote level an owner contributes toward consensus
///
/// Absence from the registry is the zero state; a registered owner always
/// holds level one or two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VoteLevel {
    One,
    Two,
}

impl VoteLevel {
    /// Both levels, lowest first
    pub const ALL: [VoteLevel; 2] = [VoteLevel::One, VoteLevel::Two];

    /// Weight this level contributes to vote totals
    pub fn weight(&self) -> u64 {
        match self {
            VoteLevel::One => 1,
            VoteLevel::Two => 2,
        }
    }
}

impl std::fmt::Display for VoteLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.weight())
    }
}

/// An owner snapshot: address plus vote level
///
/// Requests carry these by value so that later owner-set mutations never
/// retroactively alter a pending request's recorded intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAccount {
    /// The owner's identity
    pub address: Address,
    /// Vote level held by this owner
    pub vote: VoteLevel,
}

impl OwnerAccount {
    pub fn new(address: Address, vote: VoteLevel) -> Self {
        Self { address, vote }
    }

    /// Weight this owner contributes to vote totals
    pub fn weight(&self) -> u64 {
        self.vote.weight()
    }
}

impl std::fmt::Display for OwnerAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (level {})", self.address, self.vote)
    }
}

/// The quorum rule: a ratio of the live vote total, floored by an
/// absolute minimum
///
/// Both parameters are fixed at wallet construction. The required vote
/// count is a function of the live total and must be recomputed on every
/// decision; owner-set changes move the bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusPolicy {
    /// Required fraction of total votes, as an integer percentage
    ratio_percent: u32,
    /// Absolute floor on the required votes
    min_votes: u64,
}

impl ConsensusPolicy {
    /// Create a policy; the ratio must be a percentage in 1..=100 and the
    /// floor must be at least one vote
    pub fn new(ratio_percent: u32, min_votes: u64) -> WalletResult<Self> {
        if ratio_percent == 0 || ratio_percent > 100 {
            return Err(WalletError::InvalidPolicy(format!(
                "ratio must be a percentage in 1..=100, got {}",
                ratio_percent
            )));
        }
        if min_votes == 0 {
            return Err(WalletError::InvalidPolicy(
                "minimum votes for consensus must be at least 1".into(),
            ));
        }
        Ok(Self {
            ratio_percent,
            min_votes,
        })
    }

    pub fn ratio_percent(&self) -> u32 {
        self.ratio_percent
    }

    pub fn min_votes(&self) -> u64 {
        self.min_votes
    }

    /// Votes required for consensus at the given live total
    ///
    /// `max(ceil(total * ratio), min_votes)`, in integer arithmetic.
    pub fn required_votes(&self, total_votes: u64) -> u64 {
        let scaled = (total_votes as u128 * self.ratio_percent as u128).div_ceil(100) as u64;
        scaled.max(self.min_votes)
    }

    /// Whether a vote total can still satisfy its own quorum
    ///
    /// Holds for every legal owner set; an owner-set mutation that would
    /// break it must be rejected.
    pub fn is_satisfiable(&self, total_votes: u64) -> bool {
        total_votes >= self.required_votes(total_votes)
    }
}
