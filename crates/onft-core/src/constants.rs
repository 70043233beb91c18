//! Ledger constants. All amounts are in base units (1 ONFT = 10^18 base units).

use crate::types::Amount;

/// Base units per whole ONFT.
pub const UNIT: Amount = 1_000_000_000_000_000_000;

/// Basis-point denominator (10 000 bp = 100%).
pub const BPS_PRECISION: Amount = 10_000;

/// Permanent inflation is paid out in this many weekly instalments per year.
pub const WEEKS_PER_YEAR: Amount = 52;

pub const SECONDS_PER_WEEK: u64 = 7 * 86_400;

/// One-time fee pulled into the delegation pool by `upgrade_account`.
pub const UPGRADE_FEE: Amount = UNIT;

// ---------------------------------------------------------------------------
// Deployment defaults
// ---------------------------------------------------------------------------

/// Annual permanent inflation: 3%.
pub const DEFAULT_INFLATION_BASIS_POINT: u32 = 300;

pub const DEFAULT_MINT_LOCK_PERIOD_SECS: u64 = SECONDS_PER_WEEK;

/// A schedule year is exactly 52 mint periods.
pub const DEFAULT_INFLATION_LOCK_PERIOD_SECS: u64 = 52 * SECONDS_PER_WEEK;

pub const DEFAULT_TEMP_INFLATION_WEEKLY_MINT_AMT: Amount = 3_205 * UNIT;

pub const DEFAULT_TEMP_INFLATION_MAX_MINT: u64 = 3;

pub const DEFAULT_CAP_PER_ARTIST: Amount = 1_000 * UNIT;
