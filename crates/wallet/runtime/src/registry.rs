//! Owner Registry: the weighted owner set and its vote totals
//!
//! The registry is the source of truth for who may act on the wallet and
//! with what weight. Mutations are reserved for the consensus engine's
//! execute transition; everything else reads.
//!
//! Every mutation validates fully, including the post-mutation
//! feasibility invariant `total' >= required_votes(total')`, before
//! touching any field. A rejected mutation therefore needs no rollback.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use wallet_types::{
    Address, ConsensusPolicy, OwnerAccount, VoteLevel, WalletError, WalletResult,
};

/// Host-supplied check that an address is controlled by an external key
/// holder rather than by code
///
/// Authorization power must rest with keys; admitting an address the
/// wallet cannot hold accountable would let code vote on custody.
pub trait AccountInspector: Send + Sync {
    fn is_externally_owned(&self, address: &Address) -> bool;
}

/// Inspector for hosts where every address is an external key holder
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeExternallyOwned;

impl AccountInspector for AssumeExternallyOwned {
    fn is_externally_owned(&self, _address: &Address) -> bool {
        true
    }
}

/// The weighted owner set with incrementally maintained totals
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnerRegistry {
    /// Vote level per owner; absence means not an owner
    owners: HashMap<Address, VoteLevel>,
    /// Count of level-one owners
    level_one_owners: u64,
    /// Count of level-two owners
    level_two_owners: u64,
    /// Running sum of all owners' vote weights
    total_votes: u64,
    /// The quorum rule; immutable after construction
    policy: ConsensusPolicy,
}

impl OwnerRegistry {
    /// Build a registry from the initial owner list
    ///
    /// Fails if any owner is invalid or if the resulting totals could
    /// never reach quorum; the wallet must not start in a state from
    /// which no action can execute.
    pub fn new(
        policy: ConsensusPolicy,
        initial_owners: &[OwnerAccount],
        inspector: &dyn AccountInspector,
    ) -> WalletResult<Self> {
        let mut registry = Self {
            owners: HashMap::new(),
            level_one_owners: 0,
            level_two_owners: 0,
            total_votes: 0,
            policy,
        };

        for owner in initial_owners {
            registry.admit(owner, inspector)?;
        }

        if !policy.is_satisfiable(registry.total_votes) {
            return Err(WalletError::ConsensusUnreachable {
                total_votes: registry.total_votes,
                required: policy.required_votes(registry.total_votes),
            });
        }

        Ok(registry)
    }

    // --- Query methods ---

    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.contains_key(address)
    }

    /// The owner's vote level, if registered
    pub fn vote_level_of(&self, address: &Address) -> Option<VoteLevel> {
        self.owners.get(address).copied()
    }

    /// The owner's vote weight; zero for non-owners
    pub fn vote_weight_of(&self, address: &Address) -> u64 {
        self.vote_level_of(address).map_or(0, |level| level.weight())
    }

    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    /// Number of owners registered at the given level
    pub fn owner_counter(&self, level: VoteLevel) -> u64 {
        match level {
            VoteLevel::One => self.level_one_owners,
            VoteLevel::Two => self.level_two_owners,
        }
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn policy(&self) -> &ConsensusPolicy {
        &self.policy
    }

    /// Votes required for consensus against the live total
    pub fn required_votes(&self) -> u64 {
        self.policy.required_votes(self.total_votes)
    }

    // --- Mutations (consensus engine only) ---

    /// Register a new owner
    pub(crate) fn add_owner(
        &mut self,
        account: &OwnerAccount,
        inspector: &dyn AccountInspector,
    ) -> WalletResult<()> {
        self.admit(account, inspector)
    }

    /// Deregister an owner
    ///
    /// The snapshot's recorded vote level must match the live registry;
    /// a stale snapshot must not decrement the wrong counter.
    pub(crate) fn remove_owner(&mut self, account: &OwnerAccount) -> WalletResult<()> {
        self.check_departure(account)?;
        self.check_feasible(self.total_votes - account.weight())?;

        self.owners.remove(&account.address);
        self.decrement(account.vote);
        Ok(())
    }

    /// Replace an owner with another account: address change, level
    /// change, or both in one step
    pub(crate) fn change_owner(
        &mut self,
        current: &OwnerAccount,
        replacement: &OwnerAccount,
        inspector: &dyn AccountInspector,
    ) -> WalletResult<()> {
        self.check_departure(current)?;
        if replacement.address != current.address {
            self.check_admission(replacement, inspector)?;
        }
        self.check_feasible(self.total_votes - current.weight() + replacement.weight())?;

        self.owners.remove(&current.address);
        self.decrement(current.vote);
        self.owners
            .insert(replacement.address.clone(), replacement.vote);
        self.increment(replacement.vote);
        Ok(())
    }

    // --- Internal helpers ---

    /// Validate and commit one admission
    fn admit(
        &mut self,
        account: &OwnerAccount,
        inspector: &dyn AccountInspector,
    ) -> WalletResult<()> {
        self.check_admission(account, inspector)?;
        self.owners
            .insert(account.address.clone(), account.vote);
        self.increment(account.vote);
        Ok(())
    }

    fn check_admission(
        &self,
        account: &OwnerAccount,
        inspector: &dyn AccountInspector,
    ) -> WalletResult<()> {
        if account.address.is_zero() {
            return Err(WalletError::ZeroAddressOwner);
        }
        if !inspector.is_externally_owned(&account.address) {
            return Err(WalletError::NotExternallyOwned(account.address.clone()));
        }
        if self.owners.contains_key(&account.address) {
            return Err(WalletError::OwnerAlreadyExists(account.address.clone()));
        }
        Ok(())
    }

    fn check_departure(&self, account: &OwnerAccount) -> WalletResult<()> {
        let current = self
            .owners
            .get(&account.address)
            .copied()
            .ok_or_else(|| WalletError::OwnerNotFound(account.address.clone()))?;
        if current != account.vote {
            return Err(WalletError::OwnerVoteMismatch {
                address: account.address.clone(),
                recorded: account.vote,
                current,
            });
        }
        Ok(())
    }

    fn check_feasible(&self, prospective_total: u64) -> WalletResult<()> {
        if !self.policy.is_satisfiable(prospective_total) {
            let required = self.policy.required_votes(prospective_total);
            warn!(
                total_votes = prospective_total,
                required, "Owner-set change rejected: quorum would become unreachable"
            );
            return Err(WalletError::ConsensusUnreachable {
                total_votes: prospective_total,
                required,
            });
        }
        Ok(())
    }

    fn increment(&mut self, level: VoteLevel) {
        match level {
            VoteLevel::One => self.level_one_owners += 1,
            VoteLevel::Two => self.level_two_owners += 1,
        }
        self.total_votes += level.weight();
    }

    fn decrement(&mut self, level: VoteLevel) {
        match level {
            VoteLevel::One => self.level_one_owners -= 1,
            VoteLevel::Two => self.level_two_owners -= 1,
        }
        self.total_votes -= level.weight();
    }
}
