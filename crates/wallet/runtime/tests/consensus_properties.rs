//! Property tests: the consensus invariants that must survive arbitrary
//! operation sequences.
//!
//! A request's tally always equals the weights of its voter set; no
//! owner-set mutation leaves quorum unreachable; terminal requests
//! absorb every later operation; query results stay ordered partitions.

use proptest::prelude::*;
use wallet_runtime::{AssumeExternallyOwned, Wallet};
use wallet_types::{
    Address, Amount, ConsensusPolicy, OwnerAccount, RequestAction, RequestId, VoteLevel,
    WalletResult,
};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Candidate address pool; the first five are the initial owners.
const POOL: [&str; 8] = [
    "owner-0", "owner-1", "owner-2", "owner-3", "owner-4", "owner-5", "owner-6", "owner-7",
];

fn addr(idx: usize) -> Address {
    Address::new(POOL[idx % POOL.len()])
}

/// Owners [(0,2),(1,2),(2,1),(3,1),(4,1)], ratio 55%, min 3
fn make_wallet() -> Wallet {
    let policy = ConsensusPolicy::new(55, 3).unwrap();
    Wallet::new(
        policy,
        &[
            OwnerAccount::new(addr(0), VoteLevel::Two),
            OwnerAccount::new(addr(1), VoteLevel::Two),
            OwnerAccount::new(addr(2), VoteLevel::One),
            OwnerAccount::new(addr(3), VoteLevel::One),
            OwnerAccount::new(addr(4), VoteLevel::One),
        ],
        Box::new(AssumeExternallyOwned),
    )
    .unwrap()
}

/// The first pool member currently registered as an owner
fn some_owner(wallet: &Wallet) -> Address {
    (0..POOL.len())
        .map(addr)
        .find(|a| wallet.is_owner(a))
        .expect("quorum feasibility keeps at least one owner registered")
}

/// Everyone else approves; errors (duplicate votes, non-owners) ignored
fn approve_by_all(wallet: &mut Wallet, id: RequestId, except: &Address) {
    for idx in 0..POOL.len() {
        let voter = addr(idx);
        if voter != *except {
            let _ = wallet.approve(voter, id);
        }
    }
}

fn arb_level() -> impl Strategy<Value = VoteLevel> {
    prop_oneof![Just(VoteLevel::One), Just(VoteLevel::Two)]
}

/// A vote action: (owner index, approve or revoke)
fn arb_vote_ops(max: usize) -> impl Strategy<Value = Vec<(usize, bool)>> {
    prop::collection::vec((0usize..POOL.len(), any::<bool>()), 1..max)
}

/// An owner-set mutation: (kind, target index, replacement level)
fn arb_mutations(max: usize) -> impl Strategy<Value = Vec<(u8, usize, VoteLevel)>> {
    prop::collection::vec((0u8..3, 0usize..POOL.len(), arb_level()), 1..max)
}

/// Build the mutation action for one step against live registry state
fn mutation_action(wallet: &Wallet, kind: u8, target: usize, level: VoteLevel) -> RequestAction {
    let target_addr = addr(target);
    let recorded = wallet
        .registry()
        .vote_level_of(&target_addr)
        .unwrap_or(VoteLevel::One);
    match kind {
        0 => RequestAction::AddOwner {
            new_owner: OwnerAccount::new(target_addr, level),
        },
        1 => RequestAction::RemoveOwner {
            owner: OwnerAccount::new(target_addr, recorded),
        },
        _ => RequestAction::ChangeOwner {
            current: OwnerAccount::new(target_addr, recorded),
            replacement: OwnerAccount::new(addr(target + 1), level),
        },
    }
}

/// Sum of live owner weights over a request's voter set
fn voter_weight_sum(wallet: &Wallet, id: RequestId) -> u64 {
    wallet
        .get_request(id)
        .unwrap()
        .voters
        .iter()
        .map(|voter| wallet.owner_vote(voter))
        .sum()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// The tally equals the summed weights of the voter set after any
    /// approve/revoke interleaving.
    #[test]
    fn tally_matches_voter_set(ops in arb_vote_ops(24)) {
        let mut wallet = make_wallet();
        let id = wallet
            .request(addr(0), RequestAction::Withdraw { amount: Amount::new(10) })
            .unwrap();

        for (owner_idx, approve) in ops {
            let caller = addr(owner_idx);
            let _ = if approve {
                wallet.approve(caller, id)
            } else {
                wallet.revoke(caller, id)
            };

            let request = wallet.get_request(id).unwrap();
            prop_assert_eq!(request.votes, voter_weight_sum(&wallet, id));
        }
    }

    /// No sequence of owner-set mutation requests, however approved,
    /// leaves the registry unable to satisfy its own quorum.
    #[test]
    fn quorum_stays_satisfiable(mutations in arb_mutations(12)) {
        let mut wallet = make_wallet();

        for (kind, target, level) in mutations {
            let requester = some_owner(&wallet);
            let action = mutation_action(&wallet, kind, target, level);

            if let Ok(id) = wallet.request(requester.clone(), action) {
                approve_by_all(&mut wallet, id, &requester);
                let _ = wallet.execute(requester, id);
            }

            prop_assert!(wallet.total_votes() >= wallet.required_votes_for_consensus());
        }
    }

    /// Once terminal, a request rejects every later operation and keeps
    /// its tally and status frozen.
    #[test]
    fn terminal_states_absorb(by_cancel in any::<bool>(), ops in arb_vote_ops(12)) {
        let mut wallet = make_wallet();
        wallet.deposit(Address::new("sponsor"), Amount::new(1_000));

        let id = wallet
            .request(addr(0), RequestAction::Withdraw { amount: Amount::new(100) })
            .unwrap();
        wallet.approve(addr(1), id).unwrap();
        if by_cancel {
            wallet.cancel(addr(0), id).unwrap();
        } else {
            wallet.execute(addr(0), id).unwrap();
        }

        let frozen_votes = wallet.get_request(id).unwrap().votes;
        let frozen_status = wallet.get_request(id).unwrap().status;

        for (owner_idx, approve) in ops {
            let caller = addr(owner_idx);
            let results: [WalletResult<()>; 3] = [
                if approve { wallet.approve(caller.clone(), id) } else { wallet.revoke(caller.clone(), id) },
                wallet.cancel(addr(0), id),
                wallet.execute(addr(0), id),
            ];
            for result in results {
                prop_assert!(result.is_err());
            }
            let request = wallet.get_request(id).unwrap();
            prop_assert_eq!(request.votes, frozen_votes);
            prop_assert_eq!(request.status, frozen_status);
        }
    }

    /// Execution-filtered queries are ascending and partition the ledger.
    #[test]
    fn queries_partition_in_order(executed_mask in prop::collection::vec(any::<bool>(), 1..16)) {
        let mut wallet = make_wallet();
        wallet.deposit(Address::new("sponsor"), Amount::new(1_000_000));

        for &execute in &executed_mask {
            let id = wallet
                .request(addr(0), RequestAction::Withdraw { amount: Amount::new(1) })
                .unwrap();
            if execute {
                wallet.approve(addr(1), id).unwrap();
                wallet.execute(addr(0), id).unwrap();
            }
        }

        let done = wallet.request_ids_by_execution(true, 0, usize::MAX);
        let open = wallet.request_ids_by_execution(false, 0, usize::MAX);

        prop_assert!(done.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(open.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(done.len() + open.len(), executed_mask.len());

        let mut merged: Vec<_> = done.into_iter().chain(open).collect();
        merged.sort();
        let all: Vec<_> = (0..executed_mask.len() as u64).map(RequestId::new).collect();
        prop_assert_eq!(merged, all);
    }
}
