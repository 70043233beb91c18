//! Issuance schedule: the time-gated state machine behind both mint tracks.
//!
//! [`IssuanceSchedule`] is a plain `Copy` value. Each transition
//! (`take_permanent`, `take_temporary`, `roll_year`) validates and then
//! mutates `self`, returning the amount to mint where applicable. Callers
//! run transitions on a copy and commit it only once the mint has gone
//! through, so a rejected mint never moves a deadline.
//!
//! All deadline comparisons are `now >= deadline`.

use serde::{Deserialize, Serialize};

use onft_core::config::TokenConfig;
use onft_core::constants::{BPS_PRECISION, WEEKS_PER_YEAR};
use onft_core::error::ScheduleError;
use onft_core::types::{Amount, Timestamp};

/// Weekly permanent inflation for a yearly base.
///
/// `total_supply_this_year * basis_point / 10000 / 52`, truncating, evaluated
/// left to right.
pub fn weekly_inflation_amount(
    total_supply_this_year: Amount,
    inflation_basis_point: u32,
) -> Result<Amount, ScheduleError> {
    let scaled = total_supply_this_year
        .checked_mul(Amount::from(inflation_basis_point))
        .ok_or(ScheduleError::Overflow)?;
    Ok(scaled / BPS_PRECISION / WEEKS_PER_YEAR)
}

fn advance(deadline: Timestamp, period: u64) -> Result<Timestamp, ScheduleError> {
    deadline.checked_add(period).ok_or(ScheduleError::Overflow)
}

fn ensure_ready(now: Timestamp, ready_at: Timestamp) -> Result<(), ScheduleError> {
    if now >= ready_at {
        Ok(())
    } else {
        Err(ScheduleError::NotReady { now, ready_at })
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssuanceSchedule {
    // Permanent track
    pub next_mint_start_time: Timestamp,
    pub mint_lock_period_secs: u64,
    pub weekly_inflation_amt: Amount,

    // Year
    pub next_year_start_time: Timestamp,
    pub inflation_lock_period_secs: u64,
    pub total_supply_this_year: Amount,
    pub inflation_basis_point: u32,

    // Temporary track
    pub temp_next_mint_start_time: Timestamp,
    pub temp_inflation_weekly_mint_amt: Amount,
    pub temp_inflation_max_mint: u64,
    pub temp_inflation_mint_count: u64,
    pub temp_inflation_supply_minted: Amount,
}

impl IssuanceSchedule {
    /// Initial schedule at construction time `now`.
    ///
    /// Both mint tracks open one mint lock period after `now`; the first
    /// rollover is due one inflation lock period after `now`.
    pub fn new(
        config: &TokenConfig,
        now: Timestamp,
        total_supply_this_year: Amount,
    ) -> Result<Self, ScheduleError> {
        let mint_start = advance(now, config.mint_lock_period_secs)?;
        Ok(Self {
            next_mint_start_time: mint_start,
            mint_lock_period_secs: config.mint_lock_period_secs,
            weekly_inflation_amt: weekly_inflation_amount(
                total_supply_this_year,
                config.inflation_basis_point,
            )?,
            next_year_start_time: advance(now, config.inflation_lock_period_secs)?,
            inflation_lock_period_secs: config.inflation_lock_period_secs,
            total_supply_this_year,
            inflation_basis_point: config.inflation_basis_point,
            temp_next_mint_start_time: mint_start,
            temp_inflation_weekly_mint_amt: config.temp_inflation_weekly_mint_amt,
            temp_inflation_max_mint: config.temp_inflation_max_mint,
            temp_inflation_mint_count: 0,
            temp_inflation_supply_minted: 0,
        })
    }

    pub fn permanent_ready(&self, now: Timestamp) -> bool {
        now >= self.next_mint_start_time
    }

    pub fn temporary_exhausted(&self) -> bool {
        self.temp_inflation_mint_count >= self.temp_inflation_max_mint
    }

    pub fn temporary_ready(&self, now: Timestamp) -> bool {
        !self.temporary_exhausted() && now >= self.temp_next_mint_start_time
    }

    pub fn year_ready(&self, now: Timestamp) -> bool {
        now >= self.next_year_start_time
    }

    /// Number of temporary mints still available.
    pub fn temporary_remaining(&self) -> u64 {
        self.temp_inflation_max_mint
            .saturating_sub(self.temp_inflation_mint_count)
    }

    /// Claim this period's permanent inflation. Returns the amount to mint.
    pub fn take_permanent(&mut self, now: Timestamp) -> Result<Amount, ScheduleError> {
        ensure_ready(now, self.next_mint_start_time)?;
        self.next_mint_start_time = advance(self.next_mint_start_time, self.mint_lock_period_secs)?;
        Ok(self.weekly_inflation_amt)
    }

    /// Claim this period's temporary inflation. Returns the amount to mint.
    ///
    /// An exhausted track fails with `Exhausted` whatever the time.
    pub fn take_temporary(&mut self, now: Timestamp) -> Result<Amount, ScheduleError> {
        if self.temporary_exhausted() {
            return Err(ScheduleError::Exhausted {
                max: self.temp_inflation_max_mint,
            });
        }
        ensure_ready(now, self.temp_next_mint_start_time)?;

        let amount = self.temp_inflation_weekly_mint_amt;
        let next = advance(self.temp_next_mint_start_time, self.mint_lock_period_secs)?;
        let count = self
            .temp_inflation_mint_count
            .checked_add(1)
            .ok_or(ScheduleError::Overflow)?;
        let minted = self
            .temp_inflation_supply_minted
            .checked_add(amount)
            .ok_or(ScheduleError::Overflow)?;

        self.temp_next_mint_start_time = next;
        self.temp_inflation_mint_count = count;
        self.temp_inflation_supply_minted = minted;
        Ok(amount)
    }

    /// Close the current year.
    ///
    /// The temporary track's cumulative output is removed from the base and
    /// the weekly amount is re-derived. Temporary counters are kept.
    pub fn roll_year(&mut self, now: Timestamp) -> Result<(), ScheduleError> {
        ensure_ready(now, self.next_year_start_time)?;

        let next_year = advance(self.next_year_start_time, self.inflation_lock_period_secs)?;
        let base = self
            .total_supply_this_year
            .saturating_sub(self.temp_inflation_supply_minted);
        let weekly = weekly_inflation_amount(base, self.inflation_basis_point)?;

        self.next_year_start_time = next_year;
        self.total_supply_this_year = base;
        self.weekly_inflation_amt = weekly;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onft_core::constants::UNIT;
    use onft_core::types::Address;

    const T0: Timestamp = 1_000;
    const MINT_LOCK: u64 = 7;
    const YEAR_LOCK: u64 = 10;

    fn config() -> TokenConfig {
        TokenConfig {
            mint_lock_period_secs: MINT_LOCK,
            inflation_lock_period_secs: YEAR_LOCK,
            temp_inflation_weekly_mint_amt: 3_205 * UNIT,
            temp_inflation_max_mint: 3,
            ..TokenConfig::new(Address([1; 20]))
        }
    }

    fn schedule() -> IssuanceSchedule {
        IssuanceSchedule::new(&config(), T0, 2_500_000 * UNIT).unwrap()
    }

    // ------------------------------------------------------------------
    // weekly_inflation_amount
    // ------------------------------------------------------------------

    #[test]
    fn weekly_amount_reference_value() {
        assert_eq!(weekly_inflation_amount(2_500_000, 300), Ok(1442));
    }

    #[test]
    fn weekly_amount_truncates_left_to_right() {
        // 100 * 300 / 10000 = 3, 3 / 52 = 0.
        assert_eq!(weekly_inflation_amount(100, 300), Ok(0));
        assert_eq!(
            weekly_inflation_amount(2_500_000 * UNIT, 300),
            Ok(2_500_000 * UNIT * 300 / 10_000 / 52)
        );
    }

    #[test]
    fn weekly_amount_zero_base() {
        assert_eq!(weekly_inflation_amount(0, 300), Ok(0));
    }

    #[test]
    fn weekly_amount_overflow() {
        assert_eq!(
            weekly_inflation_amount(Amount::MAX, 300),
            Err(ScheduleError::Overflow)
        );
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    #[test]
    fn initial_deadlines() {
        let s = schedule();
        assert_eq!(s.next_mint_start_time, T0 + MINT_LOCK);
        assert_eq!(s.temp_next_mint_start_time, T0 + MINT_LOCK);
        assert_eq!(s.next_year_start_time, T0 + YEAR_LOCK);
        assert_eq!(s.temp_inflation_mint_count, 0);
        assert_eq!(s.temp_inflation_supply_minted, 0);
        assert_eq!(s.temporary_remaining(), 3);
    }

    #[test]
    fn initial_weekly_amount_from_base() {
        let s = schedule();
        assert_eq!(s.total_supply_this_year, 2_500_000 * UNIT);
        assert_eq!(
            s.weekly_inflation_amt,
            weekly_inflation_amount(2_500_000 * UNIT, 300).unwrap()
        );
    }

    #[test]
    fn construction_deadline_overflow() {
        assert_eq!(
            IssuanceSchedule::new(&config(), u64::MAX, 0),
            Err(ScheduleError::Overflow)
        );
    }

    // ------------------------------------------------------------------
    // Permanent track
    // ------------------------------------------------------------------

    #[test]
    fn permanent_before_deadline_is_not_ready() {
        let mut s = schedule();
        let before = s;
        assert_eq!(
            s.take_permanent(T0 + MINT_LOCK - 1),
            Err(ScheduleError::NotReady { now: T0 + MINT_LOCK - 1, ready_at: T0 + MINT_LOCK })
        );
        assert_eq!(s, before);
    }

    #[test]
    fn permanent_exactly_at_deadline() {
        let mut s = schedule();
        let amount = s.take_permanent(T0 + MINT_LOCK).unwrap();
        assert_eq!(amount, s.weekly_inflation_amt);
        assert_eq!(s.next_mint_start_time, T0 + 2 * MINT_LOCK);
    }

    #[test]
    fn permanent_late_call_advances_from_deadline() {
        // Catch-up: the deadline moves by one period, not to now + period.
        let mut s = schedule();
        s.take_permanent(T0 + 100).unwrap();
        assert_eq!(s.next_mint_start_time, T0 + 2 * MINT_LOCK);
        assert!(s.permanent_ready(T0 + 100));
    }

    #[test]
    fn permanent_twice_in_one_period_fails() {
        let mut s = schedule();
        s.take_permanent(T0 + MINT_LOCK).unwrap();
        assert!(matches!(
            s.take_permanent(T0 + MINT_LOCK),
            Err(ScheduleError::NotReady { .. })
        ));
    }

    // ------------------------------------------------------------------
    // Temporary track
    // ------------------------------------------------------------------

    #[test]
    fn temporary_updates_counters() {
        let mut s = schedule();
        let amount = s.take_temporary(T0 + MINT_LOCK).unwrap();
        assert_eq!(amount, 3_205 * UNIT);
        assert_eq!(s.temp_next_mint_start_time, T0 + 2 * MINT_LOCK);
        assert_eq!(s.temp_inflation_mint_count, 1);
        assert_eq!(s.temp_inflation_supply_minted, 3_205 * UNIT);
    }

    #[test]
    fn temporary_independent_of_permanent() {
        let mut s = schedule();
        s.take_temporary(T0 + MINT_LOCK).unwrap();
        assert!(s.permanent_ready(T0 + MINT_LOCK));
        s.take_permanent(T0 + MINT_LOCK).unwrap();
    }

    #[test]
    fn temporary_exhausted_regardless_of_time() {
        let mut s = schedule();
        let mut now = T0;
        for _ in 0..3 {
            now += MINT_LOCK;
            s.take_temporary(now).unwrap();
        }
        assert!(s.temporary_exhausted());
        assert_eq!(s.take_temporary(u64::MAX), Err(ScheduleError::Exhausted { max: 3 }));
        // Even before the next deadline, exhaustion wins.
        assert_eq!(s.take_temporary(0), Err(ScheduleError::Exhausted { max: 3 }));
    }

    #[test]
    fn temporary_zero_max_is_exhausted_from_start() {
        let cfg = TokenConfig { temp_inflation_max_mint: 0, ..config() };
        let mut s = IssuanceSchedule::new(&cfg, T0, 0).unwrap();
        assert!(!s.temporary_ready(u64::MAX));
        assert_eq!(s.take_temporary(T0 + MINT_LOCK), Err(ScheduleError::Exhausted { max: 0 }));
    }

    #[test]
    fn temporary_not_ready_leaves_counters() {
        let mut s = schedule();
        let before = s;
        assert!(s.take_temporary(T0).is_err());
        assert_eq!(s, before);
    }

    // ------------------------------------------------------------------
    // Year rollover
    // ------------------------------------------------------------------

    #[test]
    fn rollover_before_deadline_fails() {
        let mut s = schedule();
        assert!(matches!(
            s.roll_year(T0 + YEAR_LOCK - 1),
            Err(ScheduleError::NotReady { .. })
        ));
    }

    #[test]
    fn rollover_without_temp_keeps_base() {
        let mut s = schedule();
        let weekly = s.weekly_inflation_amt;
        s.roll_year(T0 + YEAR_LOCK).unwrap();
        assert_eq!(s.next_year_start_time, T0 + 2 * YEAR_LOCK);
        assert_eq!(s.total_supply_this_year, 2_500_000 * UNIT);
        assert_eq!(s.weekly_inflation_amt, weekly);
    }

    #[test]
    fn rollover_subtracts_temp_minted_and_keeps_counters() {
        let mut s = schedule();
        s.take_temporary(T0 + MINT_LOCK).unwrap();
        s.roll_year(T0 + YEAR_LOCK).unwrap();

        let base = 2_500_000 * UNIT - 3_205 * UNIT;
        assert_eq!(s.total_supply_this_year, base);
        assert_eq!(s.weekly_inflation_amt, weekly_inflation_amount(base, 300).unwrap());
        assert_eq!(s.temp_inflation_mint_count, 1);
        assert_eq!(s.temp_inflation_supply_minted, 3_205 * UNIT);
    }

    #[test]
    fn rollover_saturates_at_zero() {
        let mut s = IssuanceSchedule::new(&config(), T0, UNIT).unwrap();
        s.take_temporary(T0 + MINT_LOCK).unwrap();
        s.roll_year(T0 + YEAR_LOCK).unwrap();
        assert_eq!(s.total_supply_this_year, 0);
        assert_eq!(s.weekly_inflation_amt, 0);
    }

    #[test]
    fn snapshot_serializes() {
        let json = serde_json::to_string(&schedule()).unwrap();
        assert!(json.contains("\"temp_inflation_max_mint\":3"));
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn weekly_amount_is_monotonic_in_base(a in 0u128..1u128 << 100, b in 0u128..1u128 << 100, bp in 0u32..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                weekly_inflation_amount(lo, bp).unwrap() <= weekly_inflation_amount(hi, bp).unwrap()
            );
        }

        #[test]
        fn permanent_deadline_advances_by_one_period(late in 0u64..1_000) {
            let mut s = schedule();
            let deadline = s.next_mint_start_time;
            s.take_permanent(deadline + late).unwrap();
            prop_assert_eq!(s.next_mint_start_time, deadline + MINT_LOCK);
        }
    }
}
