//! Delegation ledger.
//!
//! Invariant: for every staker `s`,
//! `total_delegated[s] == sum(delegation[s, a] for every artist a)`, and the
//! pool's token balance covers every locked amount plus collected fees. The
//! pool itself is never a staker.
//!
//! The token is passed in by `&mut` handle on every call. Token movements
//! happen after all local checks and before local bookkeeping, so a
//! rejected transfer leaves the ledger untouched.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use tracing::info;

use onft_core::access::AccessControl;
use onft_core::config::StakingConfig;
use onft_core::constants::UPGRADE_FEE;
use onft_core::error::{OnftError, StakingError};
use onft_core::events::{Event, EventLog};
use onft_core::traits::TokenLedger;
use onft_core::types::{Address, Amount};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegationLedger {
    pool: Address,
    access: AccessControl,
    upgraded: BTreeSet<Address>,
    /// (staker, artist) → locked amount. Zero entries are removed.
    delegations: BTreeMap<(Address, Address), Amount>,
    /// staker → sum of the staker's delegations.
    total_delegated: HashMap<Address, Amount>,
    cap_per_artist: Amount,
    events: EventLog,
}

/// Summary of the ledger for operators.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DelegationSnapshot {
    pub pool_account: Address,
    pub cap_per_artist: Amount,
    pub upgraded_accounts: usize,
    pub active_delegations: usize,
    pub total_locked: Amount,
}

impl DelegationLedger {
    pub fn new(config: &StakingConfig) -> Result<Self, OnftError> {
        config.validate()?;
        Ok(Self {
            pool: config.pool_account,
            access: AccessControl::new(config.admin),
            upgraded: BTreeSet::new(),
            delegations: BTreeMap::new(),
            total_delegated: HashMap::new(),
            cap_per_artist: config.cap_per_artist,
            events: EventLog::new(),
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn pool_account(&self) -> Address {
        self.pool
    }

    pub fn cap_per_artist(&self) -> Amount {
        self.cap_per_artist
    }

    pub fn is_upgraded(&self, account: &Address) -> bool {
        self.upgraded.contains(account)
    }

    pub fn delegation(&self, staker: &Address, artist: &Address) -> Amount {
        self.delegations
            .get(&(*staker, *artist))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_delegated(&self, staker: &Address) -> Amount {
        self.total_delegated.get(staker).copied().unwrap_or(0)
    }

    /// Non-zero delegations of `staker`, in ascending artist order.
    pub fn delegations_of(&self, staker: &Address) -> Vec<(Address, Amount)> {
        let lo = (*staker, Address::ZERO);
        let hi = (*staker, Address([0xFF; 20]));
        self.delegations
            .range(lo..=hi)
            .map(|((_, artist), amount)| (*artist, *amount))
            .collect()
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        self.access.is_admin(account)
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn snapshot(&self) -> DelegationSnapshot {
        DelegationSnapshot {
            pool_account: self.pool,
            cap_per_artist: self.cap_per_artist,
            upgraded_accounts: self.upgraded.len(),
            active_delegations: self.delegations.len(),
            total_locked: self
                .total_delegated
                .values()
                .fold(0, |acc: Amount, v| acc.saturating_add(*v)),
        }
    }

    // ------------------------------------------------------------------
    // Holder operations
    // ------------------------------------------------------------------

    /// Opt `caller` in to delegation by pulling the upgrade fee into the
    /// pool. The caller must have approved the pool for at least the fee.
    pub fn upgrade_account(
        &mut self,
        token: &mut impl TokenLedger,
        caller: &Address,
    ) -> Result<(), OnftError> {
        self.ensure_not_pool(caller)?;
        if self.is_upgraded(caller) {
            return Err(StakingError::AlreadyUpgraded(*caller).into());
        }
        token.transfer_from(&self.pool, caller, &self.pool, UPGRADE_FEE)?;

        self.upgraded.insert(*caller);
        self.events.push(Event::AccountUpgraded { staker: *caller });
        info!(staker = %caller, fee = UPGRADE_FEE, "account upgraded");
        Ok(())
    }

    /// Lock `amount` of `caller`'s units against `artist`.
    pub fn stake_into_artist(
        &mut self,
        token: &mut impl TokenLedger,
        caller: &Address,
        artist: &Address,
        amount: Amount,
    ) -> Result<(), OnftError> {
        self.ensure_not_pool(caller)?;
        if !self.is_upgraded(caller) {
            return Err(StakingError::NotUpgraded(*caller).into());
        }
        let delegated = self
            .delegation(caller, artist)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        if delegated > self.cap_per_artist {
            return Err(StakingError::CapExceeded {
                requested: delegated,
                cap: self.cap_per_artist,
            }
            .into());
        }
        let total = self
            .total_delegated(caller)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;

        token.transfer_from(&self.pool, caller, &self.pool, amount)?;

        self.delegations.insert((*caller, *artist), delegated);
        self.total_delegated.insert(*caller, total);
        self.events.push(Event::Staked {
            artist: *artist,
            staker: *caller,
            amount,
        });
        info!(staker = %caller, %artist, amount, delegated, "staked into artist");
        Ok(())
    }

    /// Release `amount` of `caller`'s delegation to `artist` back to the
    /// caller.
    ///
    /// The payout is a pool transfer and therefore subject to the pause
    /// gate; allowlist the pool to keep withdrawals open during a pause.
    pub fn unstake_from_artist(
        &mut self,
        token: &mut impl TokenLedger,
        caller: &Address,
        artist: &Address,
        amount: Amount,
    ) -> Result<(), OnftError> {
        let have = self.delegation(caller, artist);
        let delegated = have
            .checked_sub(amount)
            .ok_or(StakingError::InsufficientDelegation { have, need: amount })?;
        // total >= any single delegation of the same staker.
        let total = self
            .total_delegated(caller)
            .checked_sub(amount)
            .ok_or(StakingError::Overflow)?;

        token.transfer(&self.pool, caller, amount)?;

        if delegated == 0 {
            self.delegations.remove(&(*caller, *artist));
        } else {
            self.delegations.insert((*caller, *artist), delegated);
        }
        if total == 0 {
            self.total_delegated.remove(caller);
        } else {
            self.total_delegated.insert(*caller, total);
        }
        self.events.push(Event::Unstaked {
            artist: *artist,
            staker: *caller,
            amount,
        });
        info!(staker = %caller, %artist, amount, delegated, "unstaked from artist");
        Ok(())
    }

    /// A pool-to-pool pull moves nothing, so the pool cannot back its own
    /// delegation.
    fn ensure_not_pool(&self, caller: &Address) -> Result<(), StakingError> {
        if *caller == self.pool {
            return Err(StakingError::PoolAccount(*caller));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// Replace the per-pair cap. Existing delegations above the new cap are
    /// kept; only later stakes are checked against it.
    pub fn set_cap_per_artist(&mut self, caller: &Address, cap: Amount) -> Result<(), OnftError> {
        self.access.ensure_admin(caller)?;
        self.cap_per_artist = cap;
        self.events.push(Event::CapPerArtistChanged { cap });
        info!(by = %caller, cap, "cap per artist changed");
        Ok(())
    }

    pub fn grant_admin(&mut self, caller: &Address, account: Address) -> Result<bool, OnftError> {
        let granted = self.access.grant(caller, account)?;
        if granted {
            self.events.push(Event::AdminGranted { account, by: *caller });
            info!(%account, by = %caller, "staking admin granted");
        }
        Ok(granted)
    }

    pub fn revoke_admin(&mut self, caller: &Address, account: &Address) -> Result<bool, OnftError> {
        let revoked = self.access.revoke(caller, account)?;
        if revoked {
            self.events.push(Event::AdminRevoked {
                account: *account,
                by: *caller,
            });
            info!(%account, by = %caller, "staking admin revoked");
        }
        Ok(revoked)
    }
}
