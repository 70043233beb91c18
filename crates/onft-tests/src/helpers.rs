//! Shared fixtures for scenario and property tests.

use std::sync::Arc;

use onft_core::config::{DeploymentConfig, StakingConfig, TokenConfig};
use onft_core::constants::UNIT;
use onft_core::traits::{ManualClock, TokenLedger};
use onft_core::types::{Address, Amount, Timestamp};
use onft_issuance::IssuanceScheduler;
use onft_staking::DelegationLedger;

/// Deployment time of every fixture.
pub const T0: Timestamp = 1_700_000_000;
pub const MINT_LOCK: u64 = 7;
pub const YEAR_LOCK: u64 = 10;
pub const TEMP_MINT_AMT: Amount = 3_205 * UNIT;
pub const TEMP_MAX_MINT: u64 = 3;
pub const CAP: Amount = 1_000 * UNIT;

/// Account from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address([seed; 20])
}

pub fn admin() -> Address {
    addr(0xAD)
}

pub fn pool() -> Address {
    addr(0xEE)
}

pub fn user(n: u8) -> Address {
    addr(n + 1)
}

/// Two holders (2 000 000 and 500 000 units), 300 bp, 7 s mint lock,
/// 10 s year lock, three temporary mints of 3 205 units, 1 000 unit cap.
pub fn deployment() -> DeploymentConfig {
    DeploymentConfig {
        token: TokenConfig {
            inflation_basis_point: 300,
            mint_lock_period_secs: MINT_LOCK,
            inflation_lock_period_secs: YEAR_LOCK,
            temp_inflation_weekly_mint_amt: TEMP_MINT_AMT,
            temp_inflation_max_mint: TEMP_MAX_MINT,
            ..TokenConfig::new(admin())
        }
        .with_allocation(user(0), 2_000_000 * UNIT)
        .with_allocation(user(1), 500_000 * UNIT),
        staking: StakingConfig {
            cap_per_artist: CAP,
            ..StakingConfig::new(admin(), pool())
        },
    }
}

/// A deployed token and delegation ledger sharing one manual clock.
pub struct Harness {
    pub clock: ManualClock,
    pub token: IssuanceScheduler,
    pub staking: DelegationLedger,
}

impl Harness {
    pub fn new() -> Self {
        Self::from_config(&deployment())
    }

    pub fn from_config(config: &DeploymentConfig) -> Self {
        let clock = ManualClock::new(T0);
        let token = IssuanceScheduler::new(&config.token, Arc::new(clock.clone()))
            .expect("fixture token deploys");
        let staking = DelegationLedger::new(&config.staking).expect("fixture ledger deploys");
        Self {
            clock,
            token,
            staking,
        }
    }

    /// Approve the pool for everything and upgrade `account`.
    pub fn upgrade(&mut self, account: &Address) {
        self.token
            .approve(account, &self.staking.pool_account(), Amount::MAX)
            .expect("approve");
        self.staking
            .upgrade_account(&mut self.token, account)
            .expect("upgrade");
    }

    /// Sum of every balance equals the total supply.
    pub fn supply_is_conserved(&self) -> bool {
        let balances = self.token.token().balances();
        balances.sum_of_balances() == Some(balances.total_supply())
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
