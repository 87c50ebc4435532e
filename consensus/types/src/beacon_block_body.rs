use crate::*;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// The body of a `BeaconBlock`.
///
/// Header processing only ever looks at its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BeaconBlockBody {
    pub randao_reveal: Signature,
    pub eth1_data: Eth1Data,
    pub graffiti: Hash256,
}

impl Default for BeaconBlockBody {
    fn default() -> Self {
        Self {
            randao_reveal: Signature::empty(),
            eth1_data: Eth1Data::default(),
            graffiti: Hash256::zero(),
        }
    }
}
