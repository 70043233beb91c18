//! # onft-staking — Artist delegation ledger.
//!
//! Holders opt in once by paying [`UPGRADE_FEE`](onft_core::constants::UPGRADE_FEE),
//! then lock units against artists. Locked units sit in the ledger's pool
//! account on the token; each (staker, artist) pair is bounded by an
//! administrator-set cap.

pub mod ledger;

pub use ledger::{DelegationLedger, DelegationSnapshot};
