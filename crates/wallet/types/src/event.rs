//! Wallet events: the journal of committed transitions
//!
//! Events are recorded after a state change commits and exist for
//! off-wallet observers (indexers, notification pipelines). No wallet
//! read path depends on them.

use crate::{Address, Amount, RequestId, RequestKind, WalletId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed wallet transition, as seen by observers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletEvent {
    /// Funds received unconditionally
    Deposited { from: Address, amount: Amount },
    /// Payment received for a named purpose
    PaymentReceived {
        payer: Address,
        target: String,
        topic: String,
        description: String,
        amount: Amount,
    },
    /// A request entered the ledger
    Requested {
        requester: Address,
        request_id: RequestId,
        kind: RequestKind,
    },
    /// An owner added their vote weight to a request
    Approved {
        owner: Address,
        request_id: RequestId,
        votes: u64,
    },
    /// An owner withdrew their vote weight from a request
    Revoked {
        owner: Address,
        request_id: RequestId,
        votes: u64,
    },
    /// The requester canceled a pending request
    Canceled {
        requester: Address,
        request_id: RequestId,
    },
    /// The requester executed a request at consensus
    Executed {
        requester: Address,
        request_id: RequestId,
        kind: RequestKind,
    },
}

impl WalletEvent {
    /// The request this event concerns, if any
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            WalletEvent::Requested { request_id, .. }
            | WalletEvent::Approved { request_id, .. }
            | WalletEvent::Revoked { request_id, .. }
            | WalletEvent::Canceled { request_id, .. }
            | WalletEvent::Executed { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }
}

/// A journaled event with its recording metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique record identifier
    pub record_id: String,
    /// The committed transition
    pub event: WalletEvent,
    /// When the record was written
    pub recorded_at: DateTime<Utc>,
}

/// Append-only journal of wallet events
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventLog {
    /// The wallet this journal belongs to
    pub wallet_id: WalletId,
    /// All records, in commit order
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Create a new empty journal
    pub fn new(wallet_id: WalletId) -> Self {
        Self {
            wallet_id,
            records: Vec::new(),
        }
    }

    /// Append an event
    pub fn record(&mut self, event: WalletEvent) {
        self.records.push(EventRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            event,
            recorded_at: Utc::now(),
        });
    }

    /// All records in commit order
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of records
    pub fn event_count(&self) -> usize {
        self.records.len()
    }

    /// Records concerning one request, in commit order
    pub fn records_for_request(&self, request_id: RequestId) -> Vec<&EventRecord> {
        self.records
            .iter()
            .filter(|r| r.event.request_id() == Some(request_id))
            .collect()
    }

    /// The most recent record, if any
    pub fn latest(&self) -> Option<&EventRecord> {
        self.records.last()
    }
}
