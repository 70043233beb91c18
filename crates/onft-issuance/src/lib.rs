//! # onft-issuance — Controlled issuance of the ONFT supply.
//!
//! All calculations use checked integer arithmetic.
//!
//! Two mint tracks share one administrator set and one transfer gate:
//! - **Permanent inflation**: `total_supply_this_year * bp / 10000 / 52`
//!   minted once per mint lock period, with the base re-derived at each
//!   year rollover.
//! - **Temporary inflation**: a fixed amount per mint lock period, limited
//!   to a lifetime number of mints. Its cumulative output is excluded from
//!   the next year's base.

pub mod schedule;
pub mod scheduler;

pub use schedule::{IssuanceSchedule, weekly_inflation_amount};
pub use scheduler::IssuanceScheduler;
