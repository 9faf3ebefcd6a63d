//! Role-based access control.
//!
//! Each protocol contract embeds its own [`Roles`] table, so a maintainer
//! of the reserve is not automatically a maintainer of a pool.
//!
//! Roles:
//! - MAINTAINER: parameter and registry administration
//! - RATIO_SETTER: may step the global collateral ratio (the controller)
//! - POOL: may request collateral out of the reserve
//! - PAUSER: may toggle user-facing operations

use odra::prelude::*;

use crate::errors::SynthError;

/// Role constants (u8 for efficient storage)
pub const ROLE_MAINTAINER: u8 = 0;
pub const ROLE_RATIO_SETTER: u8 = 1;
pub const ROLE_POOL: u8 = 2;
pub const ROLE_PAUSER: u8 = 3;

/// Embeddable role table
#[odra::module]
pub struct Roles {
    /// Role assignments: (role, account) -> bool
    roles: Mapping<(u8, Address), bool>,
    /// Number of accounts holding each role
    role_count: Mapping<u8, u32>,
}

impl Roles {
    /// Check if account has a specific role
    pub fn has_role(&self, role_id: u8, account: Address) -> bool {
        self.roles.get(&(role_id, account)).unwrap_or(false)
    }

    /// Get the number of accounts with a role
    pub fn role_member_count(&self, role_id: u8) -> u32 {
        self.role_count.get(&role_id).unwrap_or(0)
    }

    /// Grant a role to an account
    pub fn grant(&mut self, role_id: u8, account: Address) {
        if self.has_role(role_id, account) {
            return;
        }
        self.set_role_internal(role_id, account, true);
    }

    /// Revoke a role from an account
    pub fn revoke(&mut self, role_id: u8, account: Address) {
        if !self.has_role(role_id, account) {
            return;
        }
        self.set_role_internal(role_id, account, false);
    }

    /// Revert if the caller doesn't hold the role
    pub fn require(&self, role_id: u8) {
        let caller = self.env().caller();
        if !self.has_role(role_id, caller) {
            self.env().revert(Self::missing_role_error(role_id));
        }
    }

    const fn missing_role_error(role_id: u8) -> SynthError {
        match role_id {
            ROLE_MAINTAINER => SynthError::NotMaintainer,
            ROLE_RATIO_SETTER => SynthError::NotRatioSetter,
            ROLE_POOL => SynthError::NotPool,
            ROLE_PAUSER => SynthError::NotPauser,
            _ => SynthError::NotMaintainer,
        }
    }

    fn set_role_internal(&mut self, role_id: u8, account: Address, value: bool) {
        let had_role = self.roles.get(&(role_id, account)).unwrap_or(false);

        self.roles.set(&(role_id, account), value);

        let current_count = self.role_count.get(&role_id).unwrap_or(0);
        if value && !had_role {
            self.role_count.set(&role_id, current_count + 1);
        } else if !value && had_role && current_count > 0 {
            self.role_count.set(&role_id, current_count - 1);
        }
    }
}
