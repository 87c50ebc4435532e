use super::signature_sets::Error as SignatureSetError;
use types::{BeaconStateError, Hash256, Slot};

/// The error returned by a single block operation.
///
/// `Invalid` means the block is provably bad. Every other variant is a local fault: the validity
/// of the block was not determined and it should not be penalised.
#[derive(Debug, PartialEq, Clone)]
pub enum BlockOperationError<T> {
    Invalid(T),
    /// There was an error reading from the state.
    BeaconStateError(BeaconStateError),
    /// The expected proposer for the block's slot could not be determined.
    ProposerIndexUnavailable(BeaconStateError),
    /// Every check passed but the state refused the new latest block header.
    StateMutationFailed(BeaconStateError),
    /// The public key needed to check the proposal signature could not be loaded.
    SignatureSetError(SignatureSetError),
}

impl<T> BlockOperationError<T> {
    pub fn invalid(reason: T) -> BlockOperationError<T> {
        BlockOperationError::Invalid(reason)
    }

    /// Returns `true` if the error stems from local state rather than from the block itself.
    pub fn is_internal(&self) -> bool {
        !matches!(self, BlockOperationError::Invalid(_))
    }
}

impl<T> From<BeaconStateError> for BlockOperationError<T> {
    fn from(e: BeaconStateError) -> Self {
        BlockOperationError::BeaconStateError(e)
    }
}

impl<T> From<SignatureSetError> for BlockOperationError<T> {
    fn from(e: SignatureSetError) -> Self {
        BlockOperationError::SignatureSetError(e)
    }
}

pub type HeaderError = BlockOperationError<HeaderInvalid>;

#[derive(Debug, PartialEq, Clone)]
pub enum HeaderInvalid {
    StateSlotMismatch {
        state_slot: Slot,
        block_slot: Slot,
    },
    ProposerIndexMismatch {
        block_proposer_index: u64,
        state_proposer_index: u64,
    },
    OlderThanLatestBlockHeader {
        block_slot: Slot,
        latest_block_header_slot: Slot,
    },
    ParentBlockRootMismatch {
        state: Hash256,
        block: Hash256,
    },
    ProposerSlashed(u64),
    ProposalSignatureInvalid,
}
