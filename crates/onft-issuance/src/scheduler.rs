//! Issuance scheduler: owns the [`Token`] and drives both mint tracks.
//!
//! Every issuing operation follows the same order: administrator check,
//! schedule transition on a copy, mint (which applies the transfer gate),
//! commit, event. A premature call therefore reports `NotReady` even while
//! paused. A rejection at any step leaves the token, the schedule and the
//! event log exactly as they were.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use onft_core::config::TokenConfig;
use onft_core::error::{OnftError, TransferError};
use onft_core::events::{Event, EventLog, MintTrack};
use onft_core::token::Token;
use onft_core::traits::{Clock, TokenLedger};
use onft_core::types::{Address, Amount, Timestamp};

use crate::schedule::IssuanceSchedule;

pub struct IssuanceScheduler {
    token: Token,
    schedule: IssuanceSchedule,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for IssuanceScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuanceScheduler")
            .field("token", &self.token)
            .field("schedule", &self.schedule)
            .field("now", &self.clock.now())
            .finish()
    }
}

impl IssuanceScheduler {
    /// Deploy a token from `config`.
    ///
    /// Mints the initial allocations (the sum becomes the first year's base)
    /// and opens both mint tracks one lock period from now.
    pub fn new(config: &TokenConfig, clock: Arc<dyn Clock>) -> Result<Self, OnftError> {
        config.validate()?;
        let total_supply_this_year = config.initial_supply()?;
        let schedule = IssuanceSchedule::new(config, clock.now(), total_supply_this_year)?;

        let mut token = Token::new(config.admin);
        for (account, amount) in config.allocations() {
            token.mint(account, *amount)?;
        }

        info!(
            admin = %config.admin,
            total_supply_this_year,
            weekly_inflation_amt = schedule.weekly_inflation_amt,
            next_mint_start_time = schedule.next_mint_start_time,
            "issuance scheduler deployed"
        );

        Ok(Self {
            token,
            schedule,
            clock,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Read-only snapshot of the schedule.
    pub fn schedule(&self) -> &IssuanceSchedule {
        &self.schedule
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn events(&self) -> &EventLog {
        self.token.events()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn total_supply(&self) -> Amount {
        self.token.total_supply()
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        self.token.is_admin(account)
    }

    pub fn is_paused(&self) -> bool {
        self.token.is_paused()
    }

    pub fn is_allowlisted(&self, account: &Address) -> bool {
        self.token.is_allowlisted(account)
    }

    // ------------------------------------------------------------------
    // Issuance
    // ------------------------------------------------------------------

    /// Mint this period's permanent inflation to `to`.
    pub fn mint_permanent(&mut self, caller: &Address, to: &Address) -> Result<Amount, OnftError> {
        self.token.ensure_admin(caller)?;

        let mut next = self.schedule;
        let amount = next.take_permanent(self.clock.now())?;
        self.token.mint(to, amount)?;
        self.schedule = next;

        self.token.emit(Event::Minted {
            track: MintTrack::Permanent,
            to: *to,
            amount,
        });
        info!(
            %to,
            amount,
            next_mint_start_time = next.next_mint_start_time,
            "minted permanent inflation"
        );
        Ok(amount)
    }

    /// Mint this period's temporary inflation to `to`.
    pub fn mint_temporary(&mut self, caller: &Address, to: &Address) -> Result<Amount, OnftError> {
        self.token.ensure_admin(caller)?;

        let mut next = self.schedule;
        let amount = next.take_temporary(self.clock.now())?;
        self.token.mint(to, amount)?;
        self.schedule = next;

        self.token.emit(Event::Minted {
            track: MintTrack::Temporary,
            to: *to,
            amount,
        });
        info!(
            %to,
            amount,
            mint_count = next.temp_inflation_mint_count,
            remaining = next.temporary_remaining(),
            "minted temporary inflation"
        );
        Ok(amount)
    }

    /// Close the current year and re-derive the weekly amount.
    ///
    /// Moves no balances, so it is allowed while paused.
    pub fn rollover_year(&mut self, caller: &Address) -> Result<(), OnftError> {
        self.token.ensure_admin(caller)?;

        let mut next = self.schedule;
        next.roll_year(self.clock.now())?;
        self.schedule = next;

        self.token.emit(Event::YearRolledOver {
            next_year_start_time: next.next_year_start_time,
            total_supply_this_year: next.total_supply_this_year,
            weekly_inflation_amt: next.weekly_inflation_amt,
        });
        info!(
            next_year_start_time = next.next_year_start_time,
            total_supply_this_year = next.total_supply_this_year,
            weekly_inflation_amt = next.weekly_inflation_amt,
            "year rolled over"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    pub fn pause(&mut self, caller: &Address) -> Result<(), OnftError> {
        self.token.pause(caller)
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<(), OnftError> {
        self.token.unpause(caller)
    }

    pub fn set_allowlist(
        &mut self,
        caller: &Address,
        account: Address,
        enabled: bool,
    ) -> Result<bool, OnftError> {
        self.token.set_allowlist(caller, account, enabled)
    }

    pub fn grant_admin(&mut self, caller: &Address, account: Address) -> Result<bool, OnftError> {
        self.token.grant_admin(caller, account)
    }

    pub fn revoke_admin(&mut self, caller: &Address, account: &Address) -> Result<bool, OnftError> {
        self.token.revoke_admin(caller, account)
    }

    pub fn burn(&mut self, holder: &Address, amount: Amount) -> Result<(), TransferError> {
        self.token.burn(holder, amount)
    }
}

impl TokenLedger for IssuanceScheduler {
    fn balance_of(&self, account: &Address) -> Amount {
        self.token.balance_of(account)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.token.allowance(owner, spender)
    }

    fn transfer(
        &mut self,
        sender: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.token.transfer(sender, to, amount)
    }

    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.token.approve(owner, spender, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.token.transfer_from(spender, from, to, amount)
    }
}
