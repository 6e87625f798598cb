//! Query layer: paginated read-only filters over the request ledger
//!
//! Every filter walks the ledger in ascending id order and applies an
//! `(offset, limit)` page window to the filtered result. Results are
//! stable across repeated calls absent new mutations.

use crate::store::RequestStore;
use wallet_types::{Address, Request, RequestId, RequestKind};

impl RequestStore {
    /// Ids filtered by execution outcome
    ///
    /// `executed == false` matches everything not yet executed: pending
    /// and canceled requests alike.
    pub fn ids_by_execution(&self, executed: bool, offset: usize, limit: usize) -> Vec<RequestId> {
        self.page(offset, limit, |r| r.is_executed() == executed)
    }

    /// Ids filtered by requester, then by execution outcome
    pub fn ids_by_owner(
        &self,
        owner: &Address,
        executed: bool,
        offset: usize,
        limit: usize,
    ) -> Vec<RequestId> {
        self.page(offset, limit, |r| {
            r.requester == *owner && r.is_executed() == executed
        })
    }

    /// Ids filtered by request kind, then by execution outcome
    ///
    /// Canceled requests keep the kind they were created with, so the
    /// reserved `Cancel` kind matches nothing.
    pub fn ids_by_kind(
        &self,
        kind: RequestKind,
        executed: bool,
        offset: usize,
        limit: usize,
    ) -> Vec<RequestId> {
        self.page(offset, limit, |r| {
            r.kind() == kind && r.is_executed() == executed
        })
    }

    fn page<F>(&self, offset: usize, limit: usize, predicate: F) -> Vec<RequestId>
    where
        F: Fn(&Request) -> bool,
    {
        self.iter()
            .filter(|r| predicate(r))
            .map(|r| r.id)
            .skip(offset)
            .take(limit)
            .collect()
    }
}
