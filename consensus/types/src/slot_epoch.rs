//! The `Slot` and `Epoch` types are defined as new types over u64 to enforce type-safety between
//! the two types.
//!
//! `Slot` and `Epoch` have implementations which permit conversion, comparison and math operations
//! between each and `u64`, however specifically not between each other.
//!
//! All math operations on `Slot` and `Epoch` are saturating, they never wrap.

use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use std::cmp::{Ord, Ordering};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use tree_hash::{PackedEncoding, TreeHash};

#[derive(Eq, Clone, Copy, Default, Hash, Ord, Serialize, Deserialize, Encode, Decode)]
#[serde(transparent)]
#[ssz(struct_behaviour = "transparent")]
pub struct Slot(#[serde(with = "serde_utils::quoted_u64")] u64);

#[derive(Eq, Clone, Copy, Default, Hash, Ord, Serialize, Deserialize, Encode, Decode)]
#[serde(transparent)]
#[ssz(struct_behaviour = "transparent")]
pub struct Epoch(#[serde(with = "serde_utils::quoted_u64")] u64);

impl_common!(Slot);
impl_common!(Epoch);

impl Slot {
    pub const fn new(slot: u64) -> Slot {
        Slot(slot)
    }

    /// The epoch that contains `self`.
    ///
    /// A `slots_per_epoch` of zero is treated as one rather than panicking.
    pub fn epoch(self, slots_per_epoch: u64) -> Epoch {
        Epoch::new(self.0 / slots_per_epoch.max(1))
    }
}

impl Epoch {
    pub const fn new(epoch: u64) -> Epoch {
        Epoch(epoch)
    }

    /// The first slot in the epoch.
    pub fn start_slot(self, slots_per_epoch: u64) -> Slot {
        Slot::from(self.0.saturating_mul(slots_per_epoch))
    }

    /// The last slot in the epoch.
    pub fn end_slot(self, slots_per_epoch: u64) -> Slot {
        Slot::from(
            self.0
                .saturating_mul(slots_per_epoch)
                .saturating_add(slots_per_epoch.saturating_sub(1)),
        )
    }
}
