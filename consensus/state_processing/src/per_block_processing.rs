use crate::{ChainStateAccessor, ProposerOracle};
use errors::{BlockOperationError, HeaderError, HeaderInvalid};
use signature_sets::{block_proposal_signature_set, get_pubkey_from_state};
use tree_hash::TreeHash;
use types::{BeaconBlock, BeaconBlockHeader, ChainSpec, Hash256, SignedBeaconBlock};

pub use block_signature_verifier::{ParallelSignatureSets, ProposalSignatureVerifier};

pub mod block_signature_verifier;
pub mod errors;
pub mod signature_sets;
#[cfg(test)]
mod tests;

/// The strategy to be used when validating the block's signature.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum VerifySignatures {
    /// Validate all signatures encountered.
    True,
    /// Do not validate any signature. Use with caution.
    False,
}

impl VerifySignatures {
    pub fn is_true(self) -> bool {
        self == VerifySignatures::True
    }
}

/// Admits the header of `signed_block` into `state`, optionally checking the proposer's
/// signature first.
///
/// Returns the proposer index on success. When `verify_signatures` is `True` this is
/// `process_signed_block_header`, otherwise `process_block_header`.
pub fn per_block_header_processing<S, O>(
    state: &mut S,
    oracle: &O,
    signed_block: &SignedBeaconBlock,
    block_root: Option<Hash256>,
    verify_signatures: VerifySignatures,
    spec: &ChainSpec,
) -> Result<u64, HeaderError>
where
    S: ChainStateAccessor,
    O: ProposerOracle<S>,
{
    if verify_signatures.is_true() {
        process_signed_block_header(state, oracle, signed_block, block_root, spec)
    } else {
        process_block_header(state, oracle, &signed_block.message, spec)
    }
}

/// Checks `block` against `state` without modifying it.
///
/// On success, returns the header that admitting the block would store as the latest block
/// header: the block's header with `state_root` set to `spec.zero_hash`.
///
/// Checks run in a fixed order and the first failure is returned:
///
/// 1. The block is for the state's slot.
/// 2. The block was produced by the proposer the `oracle` expects.
/// 3. The block is newer than the latest block header.
/// 4. The block's parent is the latest block header.
/// 5. The proposer is not slashed.
pub fn verify_block_header<S, O>(
    state: &S,
    oracle: &O,
    block: &BeaconBlock,
    spec: &ChainSpec,
) -> Result<BeaconBlockHeader, HeaderError>
where
    S: ChainStateAccessor,
    O: ProposerOracle<S>,
{
    verify!(
        block.slot == state.slot(),
        HeaderInvalid::StateSlotMismatch {
            state_slot: state.slot(),
            block_slot: block.slot,
        }
    );

    let state_proposer_index = oracle
        .proposer_index(state, block.slot, spec)
        .map_err(BlockOperationError::ProposerIndexUnavailable)?;
    verify!(
        block.proposer_index == state_proposer_index,
        HeaderInvalid::ProposerIndexMismatch {
            block_proposer_index: block.proposer_index,
            state_proposer_index,
        }
    );

    let latest_block_header_slot = state.latest_block_header().slot;
    verify!(
        block.slot > latest_block_header_slot,
        HeaderInvalid::OlderThanLatestBlockHeader {
            block_slot: block.slot,
            latest_block_header_slot,
        }
    );

    let expected_previous_block_root = state.latest_block_header().tree_hash_root();
    verify!(
        block.parent_root == expected_previous_block_root,
        HeaderInvalid::ParentBlockRootMismatch {
            state: expected_previous_block_root,
            block: block.parent_root,
        }
    );

    let proposer_index = block.proposer_index;
    verify!(
        !state.validator_slashed(proposer_index)?,
        HeaderInvalid::ProposerSlashed(proposer_index)
    );

    Ok(block.temporary_block_header(spec))
}

/// Processes the block header, returning the proposer index.
///
/// The proposal signature is not checked. The state is only modified if every check in
/// `verify_block_header` passes.
pub fn process_block_header<S, O>(
    state: &mut S,
    oracle: &O,
    block: &BeaconBlock,
    spec: &ChainSpec,
) -> Result<u64, HeaderError>
where
    S: ChainStateAccessor,
    O: ProposerOracle<S>,
{
    let header = verify_block_header(state, oracle, block, spec)?;
    commit_block_header(state, header)?;
    Ok(block.proposer_index)
}

/// Processes the header of a signed block, returning the proposer index.
///
/// The proposal signature is verified after the header checks and before the state is touched,
/// so a block with a bad signature leaves `state` exactly as it was.
///
/// `block_root` may be provided to avoid recomputing the root of `signed_block.message`.
pub fn process_signed_block_header<S, O>(
    state: &mut S,
    oracle: &O,
    signed_block: &SignedBeaconBlock,
    block_root: Option<Hash256>,
    spec: &ChainSpec,
) -> Result<u64, HeaderError>
where
    S: ChainStateAccessor,
    O: ProposerOracle<S>,
{
    let block = &signed_block.message;
    let header = verify_block_header(state, oracle, block, spec)?;
    verify_block_signature(state, signed_block, block_root, spec)?;
    commit_block_header(state, header)?;
    Ok(block.proposer_index)
}

/// Verifies the signature of a block, as signed by `block.proposer_index`.
///
/// Does not check that the proposer index is the expected one; see `verify_block_header`.
pub fn verify_block_signature<S>(
    state: &S,
    signed_block: &SignedBeaconBlock,
    block_root: Option<Hash256>,
    spec: &ChainSpec,
) -> Result<(), HeaderError>
where
    S: ChainStateAccessor,
{
    verify!(
        block_proposal_signature_set(
            state,
            |i| get_pubkey_from_state(state, i),
            signed_block,
            block_root,
            spec
        )?
        .verify(),
        HeaderInvalid::ProposalSignatureInvalid
    );

    Ok(())
}

fn commit_block_header<S>(state: &mut S, header: BeaconBlockHeader) -> Result<(), HeaderError>
where
    S: ChainStateAccessor,
{
    state
        .set_latest_block_header(header)
        .map_err(BlockOperationError::StateMutationFailed)
}
