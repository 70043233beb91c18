//! Typed event records for off-chain observers and indexers.
//!
//! Each component owns an [`EventLog`]. Records are appended only after
//! every state change of the operation has been applied, so a reader never
//! observes an event for a mutation that did not happen.

use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, Timestamp};

/// Which issuance track produced a mint.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MintTrack {
    /// Weekly inflation derived from the yearly base and basis-point rate.
    Permanent,
    /// Fixed-amount, count-limited bonus track.
    Temporary,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Balance movement. Mints come from [`Address::ZERO`], burns go to it.
    Transfer { from: Address, to: Address, amount: Amount },
    Approval { owner: Address, spender: Address, amount: Amount },
    Minted { track: MintTrack, to: Address, amount: Amount },
    YearRolledOver {
        next_year_start_time: Timestamp,
        total_supply_this_year: Amount,
        weekly_inflation_amt: Amount,
    },
    Paused { by: Address },
    Unpaused { by: Address },
    AllowlistChanged { account: Address, enabled: bool },
    AdminGranted { account: Address, by: Address },
    AdminRevoked { account: Address, by: Address },
    AccountUpgraded { staker: Address },
    Staked { artist: Address, staker: Address, amount: Amount },
    Unstaked { artist: Address, staker: Address, amount: Amount },
    CapPerArtistChanged { cap: Amount },
}

/// Append-only event log.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    records: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.records.push(event);
    }

    pub fn records(&self) -> &[Event] {
        &self.records
    }

    /// Records appended at or after `cursor` (a previous [`len`](Self::len)).
    ///
    /// A cursor past the end yields an empty slice.
    pub fn since(&self, cursor: usize) -> &[Event] {
        self.records.get(cursor..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&Event> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.records.iter()
    }
}
