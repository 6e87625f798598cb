//! Request records: proposals moving through the consensus lifecycle
//!
//! A request is created by one owner, accumulates approvals from others,
//! and is terminated exactly once by execution or cancellation. It is
//! immutable after creation except for its vote tally, voter set, and
//! status.

use crate::{Address, Amount, OwnerAccount, VoteLevel, WalletError, WalletResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Sequential identifier of a request; never reused
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RequestId(pub u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of action a request proposes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    /// Transfer custodied funds to the requester
    Withdraw,
    /// Register a new owner
    AddOwner,
    /// Deregister an existing owner
    RemoveOwner,
    /// Replace an owner's address, vote level, or both
    ChangeOwner,
    /// Reserved marker kind; cancellation is tracked via [`RequestStatus`]
    /// and no request is ever created with this kind
    Cancel,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RequestKind::Withdraw => "withdraw",
            RequestKind::AddOwner => "add_owner",
            RequestKind::RemoveOwner => "remove_owner",
            RequestKind::ChangeOwner => "change_owner",
            RequestKind::Cancel => "cancel",
        };
        write!(f, "{}", name)
    }
}

/// Lifecycle status of a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequestStatus {
    /// Collecting approvals; both terminal transitions leave from here
    #[default]
    Pending,
    /// Executed; terminal
    Executed,
    /// Canceled by its requester; terminal
    Canceled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// The action payload a request was created with
///
/// Owner snapshots are carried by value; fields inapplicable to a kind are
/// unrepresentable rather than zero-valued.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestAction {
    /// Transfer funds to the requester on execution
    Withdraw { amount: Amount },
    /// Admit a new owner on execution
    AddOwner { new_owner: OwnerAccount },
    /// Remove the snapshotted owner on execution
    RemoveOwner { owner: OwnerAccount },
    /// Swap the current owner for the replacement on execution; address
    /// change, level change, or both
    ChangeOwner {
        current: OwnerAccount,
        replacement: OwnerAccount,
    },
}

impl RequestAction {
    /// The kind tag for this action
    pub fn kind(&self) -> RequestKind {
        match self {
            RequestAction::Withdraw { .. } => RequestKind::Withdraw,
            RequestAction::AddOwner { .. } => RequestKind::AddOwner,
            RequestAction::RemoveOwner { .. } => RequestKind::RemoveOwner,
            RequestAction::ChangeOwner { .. } => RequestKind::ChangeOwner,
        }
    }

    /// Argument validation at creation time
    ///
    /// Withdrawals must name a nonzero amount. Owner snapshots are checked
    /// against the live registry at execute time, not here.
    pub fn validate(&self) -> WalletResult<()> {
        match self {
            RequestAction::Withdraw { amount } if amount.is_zero() => {
                Err(WalletError::ZeroAmount)
            }
            _ => Ok(()),
        }
    }
}

/// A persisted request and its accumulated votes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Request {
    /// Sequence number, allocated at creation
    pub id: RequestId,
    /// The owner who created the request; fixed
    pub requester: Address,
    /// What the request proposes; fixed
    pub action: RequestAction,
    /// Accumulated vote weight
    pub votes: u64,
    /// Addresses that have cast an approval (requester included)
    pub voters: HashSet<Address>,
    /// Lifecycle status
    pub status: RequestStatus,
    /// When the request was created
    pub created_at: DateTime<Utc>,
}

impl Request {
    /// Create a new pending request
    ///
    /// The requester's own vote is counted immediately; creation is an
    /// implicit self-approval.
    pub fn new(
        id: RequestId,
        requester: Address,
        requester_vote: VoteLevel,
        action: RequestAction,
    ) -> Self {
        let mut voters = HashSet::new();
        voters.insert(requester.clone());
        Self {
            id,
            requester,
            action,
            votes: requester_vote.weight(),
            voters,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.action.kind()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, RequestStatus::Pending)
    }

    pub fn is_executed(&self) -> bool {
        matches!(self.status, RequestStatus::Executed)
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self.status, RequestStatus::Canceled)
    }

    /// Whether the address has an approval on record
    pub fn has_voted(&self, address: &Address) -> bool {
        self.voters.contains(address)
    }

    /// Number of approvals on record
    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Amount requested for withdrawal; zero for other kinds
    pub fn withdrawal_amount(&self) -> Amount {
        match &self.action {
            RequestAction::Withdraw { amount } => *amount,
            _ => Amount::zero(),
        }
    }

    /// Snapshot of the owner this request operates on, when applicable
    pub fn current_owner(&self) -> Option<&OwnerAccount> {
        match &self.action {
            RequestAction::RemoveOwner { owner } => Some(owner),
            RequestAction::ChangeOwner { current, .. } => Some(current),
            _ => None,
        }
    }

    /// Snapshot of the owner this request would install, when applicable
    pub fn new_owner(&self) -> Option<&OwnerAccount> {
        match &self.action {
            RequestAction::AddOwner { new_owner } => Some(new_owner),
            RequestAction::ChangeOwner { replacement, .. } => Some(replacement),
            _ => None,
        }
    }

    /// Add an approval to the tally
    pub fn record_approval(&mut self, owner: Address, weight: u64) -> WalletResult<()> {
        if self.voters.contains(&owner) {
            return Err(WalletError::AlreadyApproved {
                owner,
                request_id: self.id,
            });
        }
        self.voters.insert(owner);
        self.votes += weight;
        Ok(())
    }

    /// Remove a previously cast approval from the tally
    pub fn record_revocation(&mut self, owner: &Address, weight: u64) -> WalletResult<()> {
        if !self.voters.remove(owner) {
            return Err(WalletError::ApprovalNotFound {
                owner: owner.clone(),
                request_id: self.id,
            });
        }
        self.votes -= weight;
        Ok(())
    }

    /// Flip to the executed terminal state
    pub fn mark_executed(&mut self) {
        self.status = RequestStatus::Executed;
    }

    /// Flip to the canceled terminal state
    pub fn mark_canceled(&mut self) {
        self.status = RequestStatus::Canceled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn withdraw_request() -> Request {
        Request::new(
            RequestId::new(0),
            Address::new("owner-a"),
            VoteLevel::Two,
            RequestAction::Withdraw {
                amount: Amount::new(500),
            },
        )
    }

    #[test]
    fn test_creation_is_self_approval() {
        let request = withdraw_request();

        assert_eq!(request.votes, 2);
        assert_eq!(request.voter_count(), 1);
        assert!(request.has_voted(&Address::new("owner-a")));
        assert!(request.is_pending());
    }

    #[test]
    fn test_action_kind_mapping() {
        let owner = OwnerAccount::new(Address::new("owner-b"), VoteLevel::One);

        assert_eq!(
            RequestAction::Withdraw {
                amount: Amount::new(1)
            }
            .kind(),
            RequestKind::Withdraw
        );
        assert_eq!(
            RequestAction::AddOwner {
                new_owner: owner.clone()
            }
            .kind(),
            RequestKind::AddOwner
        );
        assert_eq!(
            RequestAction::RemoveOwner {
                owner: owner.clone()
            }
            .kind(),
            RequestKind::RemoveOwner
        );
        assert_eq!(
            RequestAction::ChangeOwner {
                current: owner.clone(),
                replacement: owner
            }
            .kind(),
            RequestKind::ChangeOwner
        );
    }

    #[test]
    fn test_zero_withdrawal_rejected() {
        let action = RequestAction::Withdraw {
            amount: Amount::zero(),
        };
        assert!(matches!(action.validate(), Err(WalletError::ZeroAmount)));

        let action = RequestAction::Withdraw {
            amount: Amount::new(1),
        };
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_approval_accumulates() {
        let mut request = withdraw_request();

        request
            .record_approval(Address::new("owner-b"), 2)
            .unwrap();
        assert_eq!(request.votes, 4);
        assert_eq!(request.voter_count(), 2);
    }

    #[test]
    fn test_duplicate_approval_rejected() {
        let mut request = withdraw_request();

        request
            .record_approval(Address::new("owner-b"), 2)
            .unwrap();
        let result = request.record_approval(Address::new("owner-b"), 2);

        assert!(matches!(result, Err(WalletError::AlreadyApproved { .. })));
        assert_eq!(request.votes, 4); // Tally unchanged
    }

    #[test]
    fn test_approve_revoke_round_trip() {
        let mut request = withdraw_request();
        let before_votes = request.votes;
        let before_voters = request.voters.clone();

        request
            .record_approval(Address::new("owner-b"), 2)
            .unwrap();
        request
            .record_revocation(&Address::new("owner-b"), 2)
            .unwrap();

        assert_eq!(request.votes, before_votes);
        assert_eq!(request.voters, before_voters);
    }

    #[test]
    fn test_revoke_without_approval_rejected() {
        let mut request = withdraw_request();

        let result = request.record_revocation(&Address::new("owner-c"), 1);
        assert!(matches!(result, Err(WalletError::ApprovalNotFound { .. })));
    }

    #[test]
    fn test_terminal_marks() {
        let mut request = withdraw_request();
        assert!(!request.status.is_terminal());

        request.mark_executed();
        assert!(request.is_executed());
        assert!(request.status.is_terminal());

        let mut request = withdraw_request();
        request.mark_canceled();
        assert!(request.is_canceled());
        assert!(request.status.is_terminal());
    }

    #[test]
    fn test_snapshot_accessors() {
        let current = OwnerAccount::new(Address::new("owner-b"), VoteLevel::Two);
        let replacement = OwnerAccount::new(Address::new("owner-f"), VoteLevel::One);

        let request = Request::new(
            RequestId::new(1),
            Address::new("owner-a"),
            VoteLevel::Two,
            RequestAction::ChangeOwner {
                current: current.clone(),
                replacement: replacement.clone(),
            },
        );

        assert_eq!(request.current_owner(), Some(&current));
        assert_eq!(request.new_owner(), Some(&replacement));
        assert_eq!(request.withdrawal_amount(), Amount::zero());

        let withdraw = withdraw_request();
        assert_eq!(withdraw.current_owner(), None);
        assert_eq!(withdraw.new_owner(), None);
        assert_eq!(withdraw.withdrawal_amount(), Amount::new(500));
    }
}
