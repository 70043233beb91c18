//! Balance ledger for the issuance unit.
//!
//! Tracks per-account balances, spending allowances and the total supply.
//! Invariant: the sum of all balances equals [`BalanceLedger::total_supply`].
//! Total supply changes only through [`mint`](BalanceLedger::mint) and
//! [`burn`](BalanceLedger::burn). The zero address never holds a balance:
//! it is the mint and burn side of every transfer record.
//!
//! The ledger knows nothing about pausing or administrators; callers apply
//! the [`TransferGate`](crate::gate::TransferGate) and access checks first.
//! Every method validates completely before mutating.

use std::collections::HashMap;

use crate::error::TransferError;
use crate::types::{Address, Amount};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceLedger {
    /// Account → balance. Accounts never credited are absent (balance 0).
    balances: HashMap<Address, Amount>,
    /// (owner, spender) → remaining allowance.
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate over all accounts that have ever held a balance.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Create `amount` new units in `to`.
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError> {
        if to.is_zero() {
            return Err(TransferError::ZeroAddress);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    /// Destroy `amount` units held by `from`.
    pub fn burn(&mut self, from: &Address, amount: Amount) -> Result<(), TransferError> {
        let have = self.balance_of(from);
        let balance = have
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientBalance { have, need: amount })?;
        // Supply >= any single balance, so this cannot underflow.
        let supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(TransferError::Overflow)?;
        self.balances.insert(*from, balance);
        self.total_supply = supply;
        Ok(())
    }

    /// Move `amount` from `from` to `to`. Self-transfers only check the balance.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if to.is_zero() {
            return Err(TransferError::ZeroAddress);
        }
        let have = self.balance_of(from);
        let from_balance = have
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientBalance { have, need: amount })?;
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        self.balances.insert(*from, from_balance);
        self.balances.insert(*to, to_balance);
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s balance, replacing any
    /// previous value.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances.insert((*owner, *spender), amount);
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// allowance. Both allowance and balance are checked before either is
    /// touched.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let allowed = self.allowance(from, spender);
        let remaining = allowed
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientAllowance { have: allowed, need: amount })?;
        self.transfer(from, to, amount)?;
        self.allowances.insert((*from, *spender), remaining);
        Ok(())
    }

    /// Sum of every balance, computed from scratch.
    ///
    /// Used by tests and audits to check the supply invariant.
    pub fn sum_of_balances(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
    }
}
