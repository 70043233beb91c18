//! # onft-core
//! Foundation types and primitives for the ONFT ledger.
//!
//! The leaf components live here and are shared by the issuance scheduler
//! (onft-issuance) and the delegation ledger (onft-staking):
//! - [`AccessControl`] — administrator set
//! - [`BalanceLedger`] — balances, allowances and total supply
//! - [`TransferGate`] — pause switch plus allowlist
//! - [`Token`] — the three above composed behind one event log

pub mod access;
pub mod balances;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod gate;
pub mod token;
pub mod traits;
pub mod types;

pub use access::AccessControl;
pub use balances::BalanceLedger;
pub use config::{DeploymentConfig, StakingConfig, TokenConfig};
pub use error::OnftError;
pub use events::{Event, EventLog, MintTrack};
pub use gate::TransferGate;
pub use token::Token;
pub use traits::{Clock, ManualClock, SystemClock, TokenLedger};
pub use types::{Address, Amount, Timestamp};
