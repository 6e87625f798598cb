//! Consensus engine: the wallet facade and request lifecycle
//!
//! The wallet composes the owner registry, the request ledger, and the
//! treasury, and is the only component allowed to mutate any of them.
//! Every mutating operation runs to completion synchronously and either
//! fully commits or fully fails; hosts embedding the wallet in a
//! multi-threaded runtime must serialize mutating calls on one instance.
//!
//! Lifecycle: a request is created by an owner (implicit self-approval),
//! gathers and sheds votes while pending, and terminates exactly once by
//! execution or cancellation. Quorum is evaluated against the registry's
//! live totals at execute time, never against totals at creation.

use crate::{
    registry::{AccountInspector, OwnerRegistry},
    store::RequestStore,
    treasury::Treasury,
};
use tracing::{debug, info, warn};
use wallet_types::{
    Address, Amount, ConsensusPolicy, EventLog, OwnerAccount, Request, RequestAction,
    RequestId, RequestKind, RequestStatus, VoteLevel, WalletError, WalletEvent, WalletId,
    WalletResult,
};

/// A custody wallet governed by weighted owner consensus
pub struct Wallet {
    /// Wallet identity, carried on the event journal
    id: WalletId,
    /// The weighted owner set
    registry: OwnerRegistry,
    /// The append-only request ledger
    store: RequestStore,
    /// Custodied funds
    treasury: Treasury,
    /// Journal of committed transitions
    journal: EventLog,
    /// Host-supplied externally-owned-account check
    inspector: Box<dyn AccountInspector>,
}

impl Wallet {
    /// Create a wallet with its initial owner set
    ///
    /// Fails if the owner list is invalid under the policy; see
    /// [`OwnerRegistry::new`].
    pub fn new(
        policy: ConsensusPolicy,
        initial_owners: &[OwnerAccount],
        inspector: Box<dyn AccountInspector>,
    ) -> WalletResult<Self> {
        let registry = OwnerRegistry::new(policy, initial_owners, inspector.as_ref())?;
        let id = WalletId::generate();

        info!(
            wallet = %id,
            owners = initial_owners.len(),
            total_votes = registry.total_votes(),
            "Wallet created"
        );

        Ok(Self {
            journal: EventLog::new(id.clone()),
            id,
            registry,
            store: RequestStore::new(),
            treasury: Treasury::new(),
            inspector,
        })
    }

    /// Create with a specific id (for testing or restoration)
    pub fn with_id(mut self, id: WalletId) -> Self {
        self.journal.wallet_id = id.clone();
        self.id = id;
        self
    }

    // =========================================================================
    // VALUE INTAKE
    // =========================================================================

    /// Accept funds unconditionally, independent of the request lifecycle
    pub fn deposit(&mut self, from: Address, amount: Amount) {
        self.treasury.deposit(from.clone(), amount);
        self.journal.record(WalletEvent::Deposited { from, amount });
    }

    /// Accept a payment for a named target/topic; the amount must be
    /// nonzero
    pub fn make_payment(
        &mut self,
        payer: Address,
        target: impl Into<String>,
        topic: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> WalletResult<()> {
        let target = target.into();
        let topic = topic.into();
        let description = description.into();

        self.treasury.record_payment(
            payer.clone(),
            target.clone(),
            topic.clone(),
            description.clone(),
            amount,
        )?;

        info!(payer = %payer, target = %target, amount = %amount, "Payment received");

        self.journal.record(WalletEvent::PaymentReceived {
            payer,
            target,
            topic,
            description,
            amount,
        });
        Ok(())
    }

    // =========================================================================
    // REQUEST LIFECYCLE
    // =========================================================================

    /// Create a request; owner only
    ///
    /// The caller's own vote weight is tallied immediately, but creation
    /// never auto-executes: even a request already at quorum waits for an
    /// explicit execute call.
    pub fn request(&mut self, caller: Address, action: RequestAction) -> WalletResult<RequestId> {
        let level = self.caller_level(&caller)?;
        action.validate()?;

        let kind = action.kind();
        let id = self.store.create(caller.clone(), level, action);

        info!(request_id = %id, kind = %kind, requester = %caller, "Request created");

        self.journal.record(WalletEvent::Requested {
            requester: caller,
            request_id: id,
            kind,
        });
        Ok(id)
    }

    /// Add the caller's vote weight to a pending request; owner only,
    /// once per owner
    ///
    /// Purely additive bookkeeping; no quorum check happens here.
    pub fn approve(&mut self, caller: Address, id: RequestId) -> WalletResult<()> {
        self.pending_request(id)?;
        let level = self.caller_level(&caller)?;

        self.store
            .get_mut(id)?
            .record_approval(caller.clone(), level.weight())?;

        debug!(request_id = %id, owner = %caller, votes = level.weight(), "Approval recorded");

        self.journal.record(WalletEvent::Approved {
            owner: caller,
            request_id: id,
            votes: level.weight(),
        });
        Ok(())
    }

    /// Withdraw a previously cast vote from a pending request
    ///
    /// Dropping below quorum never cancels the request; it only blocks
    /// execution until re-approved.
    pub fn revoke(&mut self, caller: Address, id: RequestId) -> WalletResult<()> {
        self.pending_request(id)?;
        let level = self.caller_level(&caller)?;

        self.store
            .get_mut(id)?
            .record_revocation(&caller, level.weight())?;

        debug!(request_id = %id, owner = %caller, votes = level.weight(), "Approval revoked");

        self.journal.record(WalletEvent::Revoked {
            owner: caller,
            request_id: id,
            votes: level.weight(),
        });
        Ok(())
    }

    /// Cancel a pending request; requester only
    pub fn cancel(&mut self, caller: Address, id: RequestId) -> WalletResult<()> {
        let requester = self.pending_request(id)?.requester.clone();
        if requester != caller {
            return Err(WalletError::NotRequester {
                caller,
                request_id: id,
            });
        }

        self.store.get_mut(id)?.mark_canceled();

        info!(request_id = %id, requester = %caller, "Request canceled");

        self.journal.record(WalletEvent::Canceled {
            requester: caller,
            request_id: id,
        });
        Ok(())
    }

    /// Execute a pending request at consensus; requester only
    ///
    /// Quorum is evaluated against the registry's current totals. The
    /// kind-specific effect and the status flip commit together: if the
    /// effect is rejected, the request stays pending and no state
    /// changes.
    pub fn execute(&mut self, caller: Address, id: RequestId) -> WalletResult<()> {
        let request = self.pending_request(id)?;
        if request.requester != caller {
            return Err(WalletError::NotRequester {
                caller,
                request_id: id,
            });
        }
        let votes = request.votes;
        let action = request.action.clone();

        let required = self.registry.required_votes();
        if votes < required {
            warn!(request_id = %id, votes, required, "Execution attempted below consensus");
            return Err(WalletError::ConsensusNotReached { votes, required });
        }

        let kind = action.kind();
        match &action {
            RequestAction::Withdraw { amount } => self.treasury.withdraw(*amount)?,
            RequestAction::AddOwner { new_owner } => self
                .registry
                .add_owner(new_owner, self.inspector.as_ref())?,
            RequestAction::RemoveOwner { owner } => self.registry.remove_owner(owner)?,
            RequestAction::ChangeOwner {
                current,
                replacement,
            } => self
                .registry
                .change_owner(current, replacement, self.inspector.as_ref())?,
        }

        self.store.get_mut(id)?.mark_executed();

        info!(request_id = %id, kind = %kind, requester = %caller, "Request executed");

        self.journal.record(WalletEvent::Executed {
            requester: caller,
            request_id: id,
            kind,
        });
        Ok(())
    }

    // =========================================================================
    // READ SIDE
    // =========================================================================

    pub fn id(&self) -> &WalletId {
        &self.id
    }

    pub fn balance(&self) -> Amount {
        self.treasury.balance()
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    pub fn store(&self) -> &RequestStore {
        &self.store
    }

    pub fn journal(&self) -> &EventLog {
        &self.journal
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.registry.is_owner(address)
    }

    /// The owner's vote weight; zero for non-owners
    pub fn owner_vote(&self, address: &Address) -> u64 {
        self.registry.vote_weight_of(address)
    }

    pub fn total_votes(&self) -> u64 {
        self.registry.total_votes()
    }

    pub fn owner_counter(&self, level: VoteLevel) -> u64 {
        self.registry.owner_counter(level)
    }

    /// Votes currently required to execute a request
    pub fn required_votes_for_consensus(&self) -> u64 {
        self.registry.required_votes()
    }

    pub fn get_request(&self, id: RequestId) -> Option<&Request> {
        self.store.get(id)
    }

    pub fn request_count(&self) -> usize {
        self.store.len()
    }

    pub fn last_request_id(&self) -> Option<RequestId> {
        self.store.last_request_id()
    }

    /// Whether the owner has an approval on record for the request
    pub fn has_approved(&self, owner: &Address, id: RequestId) -> bool {
        self.store.get(id).is_some_and(|r| r.has_voted(owner))
    }

    pub fn request_ids_by_execution(
        &self,
        executed: bool,
        offset: usize,
        limit: usize,
    ) -> Vec<RequestId> {
        self.store.ids_by_execution(executed, offset, limit)
    }

    pub fn request_ids_by_owner(
        &self,
        owner: &Address,
        executed: bool,
        offset: usize,
        limit: usize,
    ) -> Vec<RequestId> {
        self.store.ids_by_owner(owner, executed, offset, limit)
    }

    pub fn request_ids_by_kind(
        &self,
        kind: RequestKind,
        executed: bool,
        offset: usize,
        limit: usize,
    ) -> Vec<RequestId> {
        self.store.ids_by_kind(kind, executed, offset, limit)
    }

    // --- Internal helpers ---

    /// Resolve the caller to a registered vote level
    fn caller_level(&self, caller: &Address) -> WalletResult<VoteLevel> {
        self.registry
            .vote_level_of(caller)
            .ok_or_else(|| WalletError::NotOwner(caller.clone()))
    }

    /// Fetch a request, distinguishing the two terminal states
    fn pending_request(&self, id: RequestId) -> WalletResult<&Request> {
        let request = self
            .store
            .get(id)
            .ok_or(WalletError::RequestNotFound(id))?;
        match request.status {
            RequestStatus::Pending => Ok(request),
            RequestStatus::Executed => Err(WalletError::AlreadyExecuted(id)),
            RequestStatus::Canceled => Err(WalletError::AlreadyCanceled(id)),
        }
    }
}
