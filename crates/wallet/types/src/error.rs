//! Error types for wallet operations
//!
//! Every failure is a rejected operation surfaced to the caller as a
//! distinct kind; nothing here is fatal and no error leaves partial state
//! behind.

use crate::{Address, Amount, RequestId, VoteLevel};

/// Errors that can occur in wallet operations
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("account is not a wallet owner: {0}")]
    NotOwner(Address),

    #[error("only the requester of request {request_id} may do this, not {caller}")]
    NotRequester {
        caller: Address,
        request_id: RequestId,
    },

    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("request already executed: {0}")]
    AlreadyExecuted(RequestId),

    #[error("request already canceled: {0}")]
    AlreadyCanceled(RequestId),

    #[error("owner {owner} already approved request {request_id}")]
    AlreadyApproved {
        owner: Address,
        request_id: RequestId,
    },

    #[error("owner {owner} has no approval to revoke on request {request_id}")]
    ApprovalNotFound {
        owner: Address,
        request_id: RequestId,
    },

    #[error("consensus not reached: {votes} of {required} required votes")]
    ConsensusNotReached { votes: u64, required: u64 },

    #[error("owner change would leave {total_votes} total votes, below the required {required}")]
    ConsensusUnreachable { total_votes: u64, required: u64 },

    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Amount,
        available: Amount,
    },

    #[error("the zero address cannot be an owner")]
    ZeroAddressOwner,

    #[error("owner address must be externally owned: {0}")]
    NotExternallyOwned(Address),

    #[error("address is already an owner: {0}")]
    OwnerAlreadyExists(Address),

    #[error("address is not a registered owner: {0}")]
    OwnerNotFound(Address),

    #[error("recorded vote level {recorded} for {address} does not match current level {current}")]
    OwnerVoteMismatch {
        address: Address,
        recorded: VoteLevel,
        current: VoteLevel,
    },

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("invalid consensus policy: {0}")]
    InvalidPolicy(String),
}

/// Result type alias for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
