//! Deployment configuration.
//!
//! A [`DeploymentConfig`] is read once, validated, and handed to the
//! issuance scheduler ([`TokenConfig`]) and the delegation ledger
//! ([`StakingConfig`]). Schedule fields omitted from the JSON fall back to
//! the defaults in [`constants`](crate::constants).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CAP_PER_ARTIST, DEFAULT_INFLATION_BASIS_POINT, DEFAULT_INFLATION_LOCK_PERIOD_SECS,
    DEFAULT_MINT_LOCK_PERIOD_SECS, DEFAULT_TEMP_INFLATION_MAX_MINT,
    DEFAULT_TEMP_INFLATION_WEEKLY_MINT_AMT,
};
use crate::error::ConfigError;
use crate::types::{Address, Amount};

/// Construction parameters of the issuance unit and its schedule.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenConfig {
    /// Initial (and only) administrator.
    pub admin: Address,
    /// Recipients of the initial supply, paired index-wise with
    /// `allocation_amounts`.
    #[serde(default)]
    pub allocation_accounts: Vec<Address>,
    #[serde(default)]
    pub allocation_amounts: Vec<Amount>,
    #[serde(default = "default_inflation_basis_point")]
    pub inflation_basis_point: u32,
    #[serde(default = "default_mint_lock_period_secs")]
    pub mint_lock_period_secs: u64,
    #[serde(default = "default_inflation_lock_period_secs")]
    pub inflation_lock_period_secs: u64,
    #[serde(default = "default_temp_inflation_weekly_mint_amt")]
    pub temp_inflation_weekly_mint_amt: Amount,
    #[serde(default = "default_temp_inflation_max_mint")]
    pub temp_inflation_max_mint: u64,
}

fn default_inflation_basis_point() -> u32 {
    DEFAULT_INFLATION_BASIS_POINT
}

fn default_mint_lock_period_secs() -> u64 {
    DEFAULT_MINT_LOCK_PERIOD_SECS
}

fn default_inflation_lock_period_secs() -> u64 {
    DEFAULT_INFLATION_LOCK_PERIOD_SECS
}

fn default_temp_inflation_weekly_mint_amt() -> Amount {
    DEFAULT_TEMP_INFLATION_WEEKLY_MINT_AMT
}

fn default_temp_inflation_max_mint() -> u64 {
    DEFAULT_TEMP_INFLATION_MAX_MINT
}

fn default_cap_per_artist() -> Amount {
    DEFAULT_CAP_PER_ARTIST
}

impl TokenConfig {
    /// A config with no initial allocations and default schedule parameters.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            allocation_accounts: Vec::new(),
            allocation_amounts: Vec::new(),
            inflation_basis_point: DEFAULT_INFLATION_BASIS_POINT,
            mint_lock_period_secs: DEFAULT_MINT_LOCK_PERIOD_SECS,
            inflation_lock_period_secs: DEFAULT_INFLATION_LOCK_PERIOD_SECS,
            temp_inflation_weekly_mint_amt: DEFAULT_TEMP_INFLATION_WEEKLY_MINT_AMT,
            temp_inflation_max_mint: DEFAULT_TEMP_INFLATION_MAX_MINT,
        }
    }

    /// Append one initial allocation.
    pub fn with_allocation(mut self, account: Address, amount: Amount) -> Self {
        self.allocation_accounts.push(account);
        self.allocation_amounts.push(amount);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allocation_accounts.len() != self.allocation_amounts.len() {
            return Err(ConfigError::MalformedInput(format!(
                "{} allocation accounts but {} allocation amounts",
                self.allocation_accounts.len(),
                self.allocation_amounts.len()
            )));
        }
        if self.allocation_accounts.iter().any(Address::is_zero) {
            return Err(ConfigError::MalformedInput(
                "allocation account must not be the zero address".into(),
            ));
        }
        self.initial_supply()?;
        Ok(())
    }

    /// Initial allocations as (account, amount) pairs.
    pub fn allocations(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.allocation_accounts
            .iter()
            .zip(self.allocation_amounts.iter())
    }

    /// Sum of the initial allocations.
    pub fn initial_supply(&self) -> Result<Amount, ConfigError> {
        self.allocation_amounts
            .iter()
            .try_fold(0u128, |acc, a| acc.checked_add(*a))
            .ok_or_else(|| ConfigError::MalformedInput("initial supply overflows".into()))
    }
}

/// Construction parameters of the delegation ledger.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StakingConfig {
    pub admin: Address,
    /// The ledger's own account; locked amounts and upgrade fees land here.
    pub pool_account: Address,
    #[serde(default = "default_cap_per_artist")]
    pub cap_per_artist: Amount,
}

impl StakingConfig {
    pub fn new(admin: Address, pool_account: Address) -> Self {
        Self {
            admin,
            pool_account,
            cap_per_artist: DEFAULT_CAP_PER_ARTIST,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_account.is_zero() {
            return Err(ConfigError::MalformedInput(
                "pool account must not be the zero address".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub token: TokenConfig,
    pub staking: StakingConfig,
}

impl DeploymentConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.validate()?;
        self.staking.validate()
    }
}
