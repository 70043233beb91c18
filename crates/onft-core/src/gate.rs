//! Transfer gate: a pause switch plus an allowlist.
//!
//! While paused, a transfer is rejected unless its sender is allowlisted.
//! Mints originate from [`Address::ZERO`], which can never be allowlisted,
//! so a paused gate blocks all issuance.

use std::collections::BTreeSet;

use crate::error::{GateError, TransferError};
use crate::types::Address;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferGate {
    paused: bool,
    allowlist: BTreeSet<Address>,
}

impl TransferGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_allowlisted(&self, account: &Address) -> bool {
        self.allowlist.contains(account)
    }

    pub fn pause(&mut self) -> Result<(), GateError> {
        if self.paused {
            return Err(GateError::AlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self) -> Result<(), GateError> {
        if !self.paused {
            return Err(GateError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }

    /// Add or remove `account`. Returns whether membership changed.
    ///
    /// The zero address is silently never added.
    pub fn set_allowlisted(&mut self, account: Address, enabled: bool) -> bool {
        if enabled {
            !account.is_zero() && self.allowlist.insert(account)
        } else {
            self.allowlist.remove(&account)
        }
    }

    pub fn check_transfer(&self, sender: &Address) -> Result<(), TransferError> {
        if self.paused && !self.is_allowlisted(sender) {
            return Err(TransferError::Paused { sender: *sender });
        }
        Ok(())
    }

    pub fn check_mint(&self) -> Result<(), TransferError> {
        self.check_transfer(&Address::ZERO)
    }
}
