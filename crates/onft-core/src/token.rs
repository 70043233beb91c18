//! The issuance unit: balance ledger, transfer gate and administrator set
//! behind a single event log.
//!
//! Holder operations (`transfer`, `approve`, `transfer_from`, `burn`) and
//! administrator operations (`pause`, `set_allowlist`, `grant_admin`, ...)
//! are exposed directly. [`Token::mint`] carries no caller check: only the
//! component that owns the token (the issuance scheduler) can reach it.

use tracing::{debug, info};

use crate::access::AccessControl;
use crate::balances::BalanceLedger;
use crate::error::{AccessError, OnftError, TransferError};
use crate::events::{Event, EventLog};
use crate::gate::TransferGate;
use crate::traits::TokenLedger;
use crate::types::{Address, Amount};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    access: AccessControl,
    balances: BalanceLedger,
    gate: TransferGate,
    events: EventLog,
}

impl Token {
    /// An empty, unpaused token administered by `admin`.
    pub fn new(admin: Address) -> Self {
        Self {
            access: AccessControl::new(admin),
            balances: BalanceLedger::new(),
            gate: TransferGate::new(),
            events: EventLog::new(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.balances.allowance(owner, spender)
    }

    pub fn total_supply(&self) -> Amount {
        self.balances.total_supply()
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        self.access.is_admin(account)
    }

    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    pub fn is_allowlisted(&self, account: &Address) -> bool {
        self.gate.is_allowlisted(account)
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn balances(&self) -> &BalanceLedger {
        &self.balances
    }

    pub fn gate(&self) -> &TransferGate {
        &self.gate
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn ensure_admin(&self, caller: &Address) -> Result<(), AccessError> {
        self.access.ensure_admin(caller)
    }

    /// Append an event on behalf of a component composing this token.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    // ------------------------------------------------------------------
    // Issuance
    // ------------------------------------------------------------------

    /// Create `amount` units in `to`. Rejected while the gate is paused.
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError> {
        self.gate.check_mint()?;
        self.balances.mint(to, amount)?;
        self.events.push(Event::Transfer {
            from: Address::ZERO,
            to: *to,
            amount,
        });
        Ok(())
    }

    /// Destroy `amount` of the holder's own units.
    ///
    /// Burning is not a transfer and is not subject to the pause gate.
    pub fn burn(&mut self, holder: &Address, amount: Amount) -> Result<(), TransferError> {
        self.balances.burn(holder, amount)?;
        self.events.push(Event::Transfer {
            from: *holder,
            to: Address::ZERO,
            amount,
        });
        debug!(%holder, amount, "burned");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    pub fn pause(&mut self, caller: &Address) -> Result<(), OnftError> {
        self.access.ensure_admin(caller)?;
        self.gate.pause()?;
        self.events.push(Event::Paused { by: *caller });
        info!(by = %caller, "transfers paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<(), OnftError> {
        self.access.ensure_admin(caller)?;
        self.gate.unpause()?;
        self.events.push(Event::Unpaused { by: *caller });
        info!(by = %caller, "transfers unpaused");
        Ok(())
    }

    /// Returns `false` (and emits nothing) if membership did not change,
    /// including any attempt to allowlist the zero address.
    pub fn set_allowlist(
        &mut self,
        caller: &Address,
        account: Address,
        enabled: bool,
    ) -> Result<bool, OnftError> {
        self.access.ensure_admin(caller)?;
        let changed = self.gate.set_allowlisted(account, enabled);
        if changed {
            self.events.push(Event::AllowlistChanged { account, enabled });
            info!(%account, enabled, "allowlist updated");
        }
        Ok(changed)
    }

    /// Returns `false` (and emits nothing) if `account` was already an admin.
    pub fn grant_admin(&mut self, caller: &Address, account: Address) -> Result<bool, OnftError> {
        let granted = self.access.grant(caller, account)?;
        if granted {
            self.events.push(Event::AdminGranted { account, by: *caller });
            info!(%account, by = %caller, "admin granted");
        }
        Ok(granted)
    }

    /// Returns `false` (and emits nothing) if `account` was not an admin.
    pub fn revoke_admin(&mut self, caller: &Address, account: &Address) -> Result<bool, OnftError> {
        let revoked = self.access.revoke(caller, account)?;
        if revoked {
            self.events.push(Event::AdminRevoked {
                account: *account,
                by: *caller,
            });
            info!(%account, by = %caller, "admin revoked");
        }
        Ok(revoked)
    }
}

impl TokenLedger for Token {
    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.balance_of(account)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.balances.allowance(owner, spender)
    }

    fn transfer(
        &mut self,
        sender: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.gate.check_transfer(sender)?;
        self.balances.transfer(sender, to, amount)?;
        self.events.push(Event::Transfer {
            from: *sender,
            to: *to,
            amount,
        });
        debug!(from = %sender, %to, amount, "transfer");
        Ok(())
    }

    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.balances.approve(owner, spender, amount);
        self.events.push(Event::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    /// The gate applies to the owner `from`, not to the spender.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.gate.check_transfer(from)?;
        self.balances.transfer_from(spender, from, to, amount)?;
        self.events.push(Event::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        debug!(%spender, %from, %to, amount, "transfer on behalf");
        Ok(())
    }
}
