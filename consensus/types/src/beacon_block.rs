use crate::*;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

/// A block of the `BeaconChain`.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BeaconBlock {
    pub slot: Slot,
    #[serde(with = "serde_utils::quoted_u64")]
    pub proposer_index: u64,
    pub parent_root: Hash256,
    pub state_root: Hash256,
    pub body: BeaconBlockBody,
}

impl SignedRoot for BeaconBlock {}

impl BeaconBlock {
    /// Returns an empty block to be used during genesis.
    pub fn empty(spec: &ChainSpec) -> Self {
        BeaconBlock {
            slot: Slot::new(0),
            proposer_index: 0,
            parent_root: spec.zero_hash,
            state_root: spec.zero_hash,
            body: BeaconBlockBody::default(),
        }
    }

    /// Returns the epoch corresponding to `self.slot`.
    pub fn epoch(&self, slots_per_epoch: u64) -> Epoch {
        self.slot.epoch(slots_per_epoch)
    }

    /// Returns the `tree_hash_root` of the block.
    pub fn canonical_root(&self) -> Hash256 {
        self.tree_hash_root()
    }

    /// Returns a full `BeaconBlockHeader` of this block.
    ///
    /// Note: This method is used instead of an `Into` impl to avoid a `Clone` of an entire block
    /// when you want to have the block _and_ the header.
    ///
    /// Note: performs a full tree-hash of `self.body`.
    pub fn block_header(&self) -> BeaconBlockHeader {
        BeaconBlockHeader {
            slot: self.slot,
            proposer_index: self.proposer_index,
            parent_root: self.parent_root,
            state_root: self.state_root,
            body_root: self.body.tree_hash_root(),
        }
    }

    /// Returns a "temporary" header, where the `state_root` is `spec.zero_hash`.
    ///
    /// This is the header committed to the state when the block is processed.
    pub fn temporary_block_header(&self, spec: &ChainSpec) -> BeaconBlockHeader {
        BeaconBlockHeader {
            state_root: spec.zero_hash,
            ..self.block_header()
        }
    }

    /// Signs `self`, producing a `SignedBeaconBlock`.
    pub fn sign(
        self,
        secret_key: &SecretKey,
        fork: &Fork,
        genesis_validators_root: Hash256,
        spec: &ChainSpec,
    ) -> SignedBeaconBlock {
        let epoch = self.epoch(spec.slots_per_epoch);
        let domain = spec.get_domain(epoch, Domain::BeaconProposer, fork, genesis_validators_root);
        let message = self.signing_root(domain);
        let signature = secret_key.sign(message);
        SignedBeaconBlock {
            message: self,
            signature,
        }
    }
}
