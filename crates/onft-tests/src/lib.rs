//! Integration test suite for the ONFT ledger.
//!
//! Scenario tests drive the issuance scheduler and the delegation ledger
//! together through a shared token; property tests check the supply and
//! delegation invariants under random operation sequences.

pub mod helpers;
