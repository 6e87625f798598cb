//! Custody wallet runtime
//!
//! The state machine behind a weighted-consensus custody wallet. A fixed
//! set of weighted owners proposes sensitive actions as requests;
//! approvals accumulate vote weight; the requester executes once the
//! live quorum is met. Owner-set changes travel through the same request
//! lifecycle and may move the quorum bar they are judged against.
//!
//! # Components
//!
//! - [`OwnerRegistry`]: the weighted owner set and vote totals; mutated
//!   only by the execute transition.
//! - [`RequestStore`]: the append-only request ledger, with paginated
//!   read-only filters.
//! - [`Treasury`]: the custodied balance and its inbound records.
//! - [`Wallet`]: the facade wiring the above into the request lifecycle
//!   and journaling committed transitions.
//!
//! All collaborators are explicit: the registry, store, and treasury are
//! owned by the wallet value, and the externally-owned-account check is a
//! host-supplied [`AccountInspector`]. Nothing is global, so tests run
//! against synthetic wallets wholesale.
//!
//! Every mutating operation is synchronous and serialized: it runs to
//! completion and either fully commits or fully fails. Hosts sharing a
//! wallet across threads must put mutating calls behind one lock.

#![deny(unsafe_code)]

mod engine;
mod query;
mod registry;
mod store;
mod treasury;

pub use engine::Wallet;
pub use registry::{AccountInspector, AssumeExternallyOwned, OwnerRegistry};
pub use store::RequestStore;
pub use treasury::{DepositRecord, PaymentRecord, Treasury};
