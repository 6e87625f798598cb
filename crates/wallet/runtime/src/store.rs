//! Request Store: the append-only request ledger
//!
//! Requests are keyed by sequential id, allocated at creation and never
//! reused. Entries are never deleted; terminal requests stay in the
//! ledger for querying.

use serde::{Deserialize, Serialize};
use wallet_types::{
    Address, Request, RequestAction, RequestId, VoteLevel, WalletError, WalletResult,
};

/// Append-only, indexable ledger of requests
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RequestStore {
    requests: Vec<Request>,
}

impl RequestStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new pending request and return its id
    ///
    /// Ids are the append position; the requester's vote is tallied
    /// immediately.
    pub(crate) fn create(
        &mut self,
        requester: Address,
        requester_vote: VoteLevel,
        action: RequestAction,
    ) -> RequestId {
        let id = RequestId::new(self.requests.len() as u64);
        self.requests
            .push(Request::new(id, requester, requester_vote, action));
        id
    }

    /// Look up a request by id
    pub fn get(&self, id: RequestId) -> Option<&Request> {
        self.requests.get(id.0 as usize)
    }

    /// Mutable lookup for the consensus engine
    pub(crate) fn get_mut(&mut self, id: RequestId) -> WalletResult<&mut Request> {
        self.requests
            .get_mut(id.0 as usize)
            .ok_or(WalletError::RequestNotFound(id))
    }

    /// Number of requests ever created
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Id of the most recently created request, if any
    pub fn last_request_id(&self) -> Option<RequestId> {
        self.requests.last().map(|r| r.id)
    }

    /// All requests in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter()
    }
}
