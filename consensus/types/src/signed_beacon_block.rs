use crate::*;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

/// A `BeaconBlock` and a signature from its proposer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct SignedBeaconBlock {
    pub message: BeaconBlock,
    pub signature: Signature,
}

impl SignedBeaconBlock {
    /// Convenience accessor for the block's slot.
    pub fn slot(&self) -> Slot {
        self.message.slot
    }

    /// Returns the `tree_hash_root` of the inner block.
    pub fn canonical_root(&self) -> Hash256 {
        self.message.canonical_root()
    }

    /// Produce a signed beacon block header corresponding to this block.
    pub fn signed_block_header(&self) -> SignedBeaconBlockHeader {
        SignedBeaconBlockHeader {
            message: self.message.block_header(),
            signature: self.signature.clone(),
        }
    }

    /// Verify `self.signature` against `pubkey`.
    ///
    /// If the root of `self.message` is already known it can be passed in as `block_root` to
    /// save recomputing it.
    pub fn verify_signature(
        &self,
        block_root: Option<Hash256>,
        pubkey: &PublicKey,
        fork: &Fork,
        genesis_validators_root: Hash256,
        spec: &ChainSpec,
    ) -> bool {
        let epoch = self.message.epoch(spec.slots_per_epoch);
        let domain = spec.get_domain(epoch, Domain::BeaconProposer, fork, genesis_validators_root);

        let message = if let Some(object_root) = block_root {
            SigningData {
                object_root,
                domain,
            }
            .tree_hash_root()
        } else {
            self.message.signing_root(domain)
        };

        self.signature.verify(pubkey, message)
    }
}
