//! Error types for the ONFT ledger.
//!
//! Every error is a rejected operation: state is left exactly as it was
//! before the call.
use thiserror::Error;

use crate::types::{Address, Amount, Timestamp};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("invalid length: {0} bytes, expected 20")] InvalidLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("unauthorized: {account} is not an administrator")] Unauthorized { account: Address },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("transfer while paused: {sender} is not allowlisted")] Paused { sender: Address },
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("insufficient allowance: have {have}, need {need}")] InsufficientAllowance { have: Amount, need: Amount },
    #[error("zero address is not a valid recipient")] ZeroAddress,
    #[error("amount overflow")] Overflow,
}

/// Pause/unpause requested while the gate is already in the target state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("invalid state: already paused")] AlreadyPaused,
    #[error("invalid state: not paused")] NotPaused,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("not ready: now {now}, ready at {ready_at}")] NotReady { now: Timestamp, ready_at: Timestamp },
    #[error("temporary inflation exhausted after {max} mints")] Exhausted { max: u64 },
    #[error("schedule arithmetic overflow")] Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("account {0} is not upgraded")] NotUpgraded(Address),
    #[error("account {0} is already upgraded")] AlreadyUpgraded(Address),
    #[error("pool account {0} cannot stake")] PoolAccount(Address),
    #[error("cap exceeded: {requested} > cap {cap}")] CapExceeded { requested: Amount, cap: Amount },
    #[error("insufficient delegation: have {have}, need {need}")] InsufficientDelegation { have: Amount, need: Amount },
    #[error("delegation overflow")] Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("malformed input: {0}")] MalformedInput(String),
    #[error("io: {0}")] Io(String),
    #[error("parse: {0}")] Parse(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OnftError {
    #[error(transparent)] Access(#[from] AccessError),
    #[error(transparent)] Transfer(#[from] TransferError),
    #[error(transparent)] Gate(#[from] GateError),
    #[error(transparent)] Schedule(#[from] ScheduleError),
    #[error(transparent)] Staking(#[from] StakingError),
    #[error(transparent)] Config(#[from] ConfigError),
}
