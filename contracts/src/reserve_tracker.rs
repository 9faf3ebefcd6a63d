//! Reserve Tracker
//!
//! Aggregates share-token liquidity across registered AMM pairs. The
//! controllers read the summed share reserves as the numerator of the
//! growth ratio.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::access_control::{Roles, ROLE_MAINTAINER};
use crate::interfaces::PairClient;
use crate::registry::AddressRegistry;

#[odra::event]
pub struct SharePairAdded {
    pub pair: Address,
}

#[odra::event]
pub struct SharePairRemoved {
    pub pair: Address,
}

/// Share liquidity tracker
#[odra::module(events = [SharePairAdded, SharePairRemoved])]
pub struct ReserveTracker {
    /// Share token whose pair-side reserves are summed
    share_token: Var<Address>,
    /// Registered pairs; removed slots stay `None`
    pairs: SubModule<AddressRegistry>,
    access: SubModule<Roles>,
}

#[odra::module]
impl ReserveTracker {
    pub fn init(&mut self, share_token: Address) {
        let caller = self.env().caller();
        self.share_token.set(share_token);
        self.access.grant(ROLE_MAINTAINER, caller);
    }

    pub fn share_token(&self) -> Address {
        self.share_token.get().unwrap_or_revert(&self.env())
    }

    pub fn is_share_pair(&self, pair: Address) -> bool {
        self.pairs.contains(pair)
    }

    /// Registered pair slot by index; `None` for removed entries
    pub fn share_pair_at(&self, index: u32) -> Option<Address> {
        self.pairs.at(index)
    }

    /// Register a pair (maintainer only)
    pub fn add_share_pair(&mut self, pair: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.pairs.add(pair);
        self.env().emit_event(SharePairAdded { pair });
    }

    /// Deregister a pair; its slot is cleared, later indices keep their
    /// positions (maintainer only)
    pub fn remove_share_pair(&mut self, pair: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.pairs.remove(pair);
        self.env().emit_event(SharePairRemoved { pair });
    }

    /// Sum of the share-token side of every registered pair
    pub fn get_share_reserves(&self) -> U256 {
        let share = self.share_token();

        let mut total = U256::zero();
        for pair in self.pairs.entries() {
            let (reserve0, reserve1) = PairClient::get_reserves(&self.env(), pair);
            if PairClient::token0(&self.env(), pair) == share {
                total += reserve0;
            } else if PairClient::token1(&self.env(), pair) == share {
                total += reserve1;
            }
        }
        total
    }

    pub fn has_role(&self, role_id: u8, account: Address) -> bool {
        self.access.has_role(role_id, account)
    }

    pub fn grant_role(&mut self, role_id: u8, account: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.access.grant(role_id, account);
    }

    pub fn revoke_role(&mut self, role_id: u8, account: Address) {
        self.access.require(ROLE_MAINTAINER);
        self.access.revoke(role_id, account);
    }
}
