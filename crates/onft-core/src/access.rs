//! Administrator set.
//!
//! Every privileged operation calls [`AccessControl::ensure_admin`] before
//! touching any other state. The set is expected never to become empty, but
//! this is not enforced: revoking the last administrator is allowed and
//! leaves every gated operation permanently unreachable.

use std::collections::BTreeSet;

use tracing::warn;

use crate::error::AccessError;
use crate::types::Address;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessControl {
    admins: BTreeSet<Address>,
}

impl AccessControl {
    /// Create an administrator set containing only `initial_admin`.
    pub fn new(initial_admin: Address) -> Self {
        Self {
            admins: BTreeSet::from([initial_admin]),
        }
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        self.admins.contains(account)
    }

    pub fn ensure_admin(&self, caller: &Address) -> Result<(), AccessError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(AccessError::Unauthorized { account: *caller })
        }
    }

    /// Add `account` to the set. Returns `false` if it was already a member.
    pub fn grant(&mut self, caller: &Address, account: Address) -> Result<bool, AccessError> {
        self.ensure_admin(caller)?;
        Ok(self.admins.insert(account))
    }

    /// Remove `account` from the set. Returns `false` if it was not a member.
    pub fn revoke(&mut self, caller: &Address, account: &Address) -> Result<bool, AccessError> {
        self.ensure_admin(caller)?;
        let removed = self.admins.remove(account);
        if removed && self.admins.is_empty() {
            warn!(%account, "last administrator revoked");
        }
        Ok(removed)
    }

    /// Administrators in ascending address order.
    pub fn admins(&self) -> impl Iterator<Item = &Address> {
        self.admins.iter()
    }

    pub fn len(&self) -> usize {
        self.admins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.admins.is_empty()
    }
}
