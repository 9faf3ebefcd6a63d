//! Address registries.
//!
//! Insertion-ordered address sets used for the protocol's collateral,
//! synth, pool, vault, and pair lists. Removal clears the slot to `None`
//! so later indices keep their positions.

use odra::prelude::*;

use crate::errors::SynthError;

/// Embeddable registry: insertion-ordered slots plus membership flags
#[odra::module]
pub struct AddressRegistry {
    slots: Var<Vec<Option<Address>>>,
    members: Mapping<Address, bool>,
}

impl AddressRegistry {
    pub fn contains(&self, entry: Address) -> bool {
        self.members.get(&entry).unwrap_or(false)
    }

    /// Slot by index; `None` for removed entries
    pub fn at(&self, index: u32) -> Option<Address> {
        let slots = self.slots.get().unwrap_or_default();
        slots.get(index as usize).copied().flatten()
    }

    /// Registered entries in insertion order, skipping cleared slots
    pub fn entries(&self) -> Vec<Address> {
        self.slots
            .get()
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Append an entry; reverts on duplicates
    pub fn add(&mut self, entry: Address) {
        if self.contains(entry) {
            self.env().revert(SynthError::DuplicateEntry);
        }
        let mut slots = self.slots.get().unwrap_or_default();
        slots.push(Some(entry));
        self.slots.set(slots);
        self.members.set(&entry, true);
    }

    /// Clear an entry's slot; reverts on unknown entries
    pub fn remove(&mut self, entry: Address) {
        if !self.contains(entry) {
            self.env().revert(SynthError::UnknownEntry);
        }
        let mut slots = self.slots.get().unwrap_or_default();
        for slot in slots.iter_mut() {
            if *slot == Some(entry) {
                *slot = None;
                break;
            }
        }
        self.slots.set(slots);
        self.members.set(&entry, false);
    }
}
