//! Trait interfaces for the ONFT ledger.
//!
//! These traits define the seams between crates:
//! - [`Clock`] — source of the current time for every deadline check
//! - [`TokenLedger`] — the balance/transfer/approval surface consumed by the
//!   delegation ledger (onft-staking) and external collaborators

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TransferError;
use crate::types::{Address, Amount, Timestamp};

/// Opaque "current time" accessor.
///
/// Deadlines are compared as `now() >= deadline`, so a clock only needs to
/// be monotonic, not exact.
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Manually advanced clock for tests and projections.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// give another to the ledger.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn set(&self, time: Timestamp) {
        self.now.store(time, Ordering::SeqCst);
    }

    /// Move time forward by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: u64) {
        let next = self.now().saturating_add(secs);
        self.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Balance, transfer and approval operations of the issuance unit.
///
/// Implemented by [`Token`](crate::token::Token) and by the issuance
/// scheduler that owns it. All mutating methods apply the transfer gate.
pub trait TokenLedger {
    fn balance_of(&self, account: &Address) -> Amount;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Move `amount` from `sender` to `to`.
    fn transfer(&mut self, sender: &Address, to: &Address, amount: Amount)
        -> Result<(), TransferError>;

    /// Set `spender`'s allowance over `owner`'s balance.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount)
        -> Result<(), TransferError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError>;
}
