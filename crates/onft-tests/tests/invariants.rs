//! Property-based invariant tests for the ONFT ledger.
//!
//! Random operation sequences are applied to a fresh deployment. After
//! every step:
//! - the sum of all balances equals the total supply
//! - each staker's total equals the sum of its per-artist delegations
//! - the pool holds at least every locked amount
//! - a rejected operation leaves token, schedule and ledger untouched

use proptest::prelude::*;

use onft_core::constants::UNIT;
use onft_core::traits::TokenLedger;
use onft_core::types::{Address, Amount};
use onft_core::Token;
use onft_issuance::IssuanceSchedule;
use onft_staking::DelegationLedger;
use onft_tests::helpers::*;

const ACTORS: u8 = 4;
const ARTISTS: u8 = 3;

fn artist(n: u8) -> Address {
    addr(0xA0 + n)
}

#[derive(Clone, Debug)]
enum Op {
    Advance(u64),
    MintPermanent { caller_admin: bool, to: u8 },
    MintTemporary { to: u8 },
    Rollover,
    Pause,
    Unpause,
    Allowlist { who: u8, enabled: bool },
    Transfer { from: u8, to: u8, amount: Amount },
    Burn { who: u8, amount: Amount },
    Approve { who: u8 },
    Upgrade { who: u8 },
    Stake { who: u8, artist: u8, amount: Amount },
    Unstake { who: u8, artist: u8, amount: Amount },
    SetCap { cap: Amount },
}

fn amount() -> impl Strategy<Value = Amount> {
    prop_oneof![
        Just(0),
        Just(UNIT),
        (1u128..2_000u128).prop_map(|n| n * UNIT),
        (1u128..3_000_000u128).prop_map(|n| n * UNIT),
    ]
}

fn admin_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..20).prop_map(Op::Advance),
        (any::<bool>(), 0..ACTORS).prop_map(|(caller_admin, to)| Op::MintPermanent { caller_admin, to }),
        (0..ACTORS).prop_map(|to| Op::MintTemporary { to }),
        Just(Op::Rollover),
        Just(Op::Pause),
        Just(Op::Unpause),
        (0..=ACTORS, any::<bool>()).prop_map(|(who, enabled)| Op::Allowlist { who, enabled }),
        (0u128..2_000u128).prop_map(|n| Op::SetCap { cap: n * UNIT }),
    ]
}

fn holder_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACTORS, 0..ACTORS, amount()).prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (0..ACTORS, amount()).prop_map(|(who, amount)| Op::Burn { who, amount }),
        (0..=ACTORS).prop_map(|who| Op::Approve { who }),
        (0..=ACTORS).prop_map(|who| Op::Upgrade { who }),
        (0..=ACTORS, 0..ARTISTS, amount()).prop_map(|(who, artist, amount)| Op::Stake { who, artist, amount }),
        (0..ACTORS, 0..ARTISTS, amount()).prop_map(|(who, artist, amount)| Op::Unstake { who, artist, amount }),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![admin_op(), holder_op()]
}

/// Actor index `ACTORS` stands for the pool.
fn actor(n: u8) -> Address {
    if n >= ACTORS { pool() } else { user(n) }
}

/// Apply `op`; `true` if it succeeded.
fn apply(h: &mut Harness, op: &Op) -> bool {
    let admin = admin();
    match *op {
        Op::Advance(secs) => {
            h.clock.advance(secs);
            true
        }
        Op::MintPermanent { caller_admin, to } => {
            let caller = if caller_admin { admin } else { user(to) };
            h.token.mint_permanent(&caller, &actor(to)).is_ok()
        }
        Op::MintTemporary { to } => h.token.mint_temporary(&admin, &actor(to)).is_ok(),
        Op::Rollover => h.token.rollover_year(&admin).is_ok(),
        Op::Pause => h.token.pause(&admin).is_ok(),
        Op::Unpause => h.token.unpause(&admin).is_ok(),
        Op::Allowlist { who, enabled } => h.token.set_allowlist(&admin, actor(who), enabled).is_ok(),
        Op::Transfer { from, to, amount } => {
            h.token.transfer(&actor(from), &actor(to), amount).is_ok()
        }
        Op::Burn { who, amount } => h.token.burn(&actor(who), amount).is_ok(),
        Op::Approve { who } => h
            .token
            .approve(&actor(who), &pool(), Amount::MAX)
            .is_ok(),
        Op::Upgrade { who } => h.staking.upgrade_account(&mut h.token, &actor(who)).is_ok(),
        Op::Stake { who, artist: a, amount } => h
            .staking
            .stake_into_artist(&mut h.token, &actor(who), &artist(a), amount)
            .is_ok(),
        Op::Unstake { who, artist: a, amount } => h
            .staking
            .unstake_from_artist(&mut h.token, &actor(who), &artist(a), amount)
            .is_ok(),
        Op::SetCap { cap } => h.staking.set_cap_per_artist(&admin, cap).is_ok(),
    }
}

fn state(h: &Harness) -> (Token, IssuanceSchedule, DelegationLedger) {
    (h.token.token().clone(), *h.token.schedule(), h.staking.clone())
}

fn delegations_consistent(h: &Harness) -> bool {
    (0..=ACTORS).all(|n| {
        let staker = actor(n);
        let sum = (0..ARTISTS)
            .map(|a| h.staking.delegation(&staker, &artist(a)))
            .sum::<Amount>();
        let listed = h
            .staking
            .delegations_of(&staker)
            .iter()
            .map(|(_, v)| *v)
            .sum::<Amount>();
        sum == h.staking.total_delegated(&staker) && listed == sum
    })
}

fn pool_covers_locked(h: &Harness) -> bool {
    let locked = (0..=ACTORS)
        .map(|n| h.staking.total_delegated(&actor(n)))
        .sum::<Amount>();
    h.token.balance_of(&pool()) >= locked
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Conservation and delegation bookkeeping hold after every step, and
    /// failed steps are side-effect free.
    #[test]
    fn random_sequences_preserve_invariants(ops in prop::collection::vec(op(), 1..60)) {
        let mut h = Harness::new();
        for op in &ops {
            let before = state(&h);
            let events_before = (h.token.events().len(), h.staking.events().len());
            let ok = apply(&mut h, op);

            if !ok {
                prop_assert_eq!(&state(&h), &before, "failed {:?} changed state", op);
                prop_assert_eq!(
                    (h.token.events().len(), h.staking.events().len()),
                    events_before
                );
            }
            prop_assert!(h.supply_is_conserved(), "supply broken after {:?}", op);
            prop_assert!(delegations_consistent(&h), "delegations broken after {:?}", op);
            prop_assert!(pool_covers_locked(&h), "pool short after {:?}", op);
        }
    }

    /// Right after any successful stake the pair is within the cap.
    #[test]
    fn stake_never_exceeds_cap(amounts in prop::collection::vec(1u128..600u128, 1..10)) {
        let mut h = Harness::new();
        h.upgrade(&user(0));
        let target = artist(0);
        for units in amounts {
            let ok = h
                .staking
                .stake_into_artist(&mut h.token, &user(0), &target, units * UNIT)
                .is_ok();
            if ok {
                prop_assert!(h.staking.delegation(&user(0), &target) <= h.staking.cap_per_artist());
            }
        }
    }

    /// Stake X then unstake X restores delegation, total and free balance.
    #[test]
    fn stake_unstake_restores(units in 0u128..=1_000u128, pre in 0u128..=500u128) {
        let mut h = Harness::new();
        h.upgrade(&user(1));
        let target = artist(1);
        h.staking.stake_into_artist(&mut h.token, &user(1), &target, pre * UNIT).unwrap();

        let before = (
            h.staking.delegation(&user(1), &target),
            h.staking.total_delegated(&user(1)),
            h.token.balance_of(&user(1)),
        );
        let x = units.min(1_000 - pre) * UNIT;
        h.staking.stake_into_artist(&mut h.token, &user(1), &target, x).unwrap();
        h.staking.unstake_from_artist(&mut h.token, &user(1), &target, x).unwrap();
        let after = (
            h.staking.delegation(&user(1), &target),
            h.staking.total_delegated(&user(1)),
            h.token.balance_of(&user(1)),
        );
        prop_assert_eq!(before, after);
    }

    /// A permanent mint is rejected strictly before the deadline and
    /// accepted at it, advancing the deadline by exactly one lock period.
    #[test]
    fn permanent_deadline_is_inclusive(early in 1u64..=MINT_LOCK) {
        let mut h = Harness::new();
        let deadline = h.token.schedule().next_mint_start_time;

        h.clock.set(deadline - early);
        prop_assert!(h.token.mint_permanent(&admin(), &user(0)).is_err());

        h.clock.set(deadline);
        prop_assert!(h.token.mint_permanent(&admin(), &user(0)).is_ok());
        prop_assert_eq!(h.token.schedule().next_mint_start_time, deadline + MINT_LOCK);
    }
}
