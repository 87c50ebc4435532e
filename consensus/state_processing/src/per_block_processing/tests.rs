use super::block_signature_verifier::{Error as VerifierError, ProposalSignatureVerifier};
use super::errors::*;
use super::signature_sets::{get_pubkey_from_state, Error as SignatureSetError};
use super::*;
use crate::{ChainStateAccessor, ProposerOracle, StateProposerOracle};
use tree_hash::TreeHash;
use types::test_utils::BeaconStateBuilder;
use types::*;

pub const VALIDATOR_COUNT: usize = 16;
pub const STATE_SLOT: u64 = 5;

/// Always answers with the same proposer, or the same error.
struct FixedOracle(Result<u64, BeaconStateError>);

impl<S: ?Sized> ProposerOracle<S> for FixedOracle {
    fn proposer_index(
        &self,
        _state: &S,
        _slot: Slot,
        _spec: &ChainSpec,
    ) -> Result<u64, BeaconStateError> {
        self.0.clone()
    }
}

/// A state that passes every read through but refuses to be written.
#[derive(Debug, PartialEq, Clone)]
struct ReadOnlyState(BeaconState);

impl ChainStateAccessor for ReadOnlyState {
    fn slot(&self) -> Slot {
        self.0.slot()
    }

    fn latest_block_header(&self) -> &BeaconBlockHeader {
        self.0.latest_block_header()
    }

    fn validator_slashed(&self, index: u64) -> Result<bool, BeaconStateError> {
        self.0.validator_slashed(index)
    }

    fn validator_pubkey(&self, index: u64) -> Result<PublicKeyBytes, BeaconStateError> {
        self.0.validator_pubkey(index)
    }

    fn fork(&self) -> Fork {
        self.0.fork()
    }

    fn genesis_validators_root(&self) -> Hash256 {
        self.0.genesis_validators_root()
    }

    fn set_latest_block_header(
        &mut self,
        _header: BeaconBlockHeader,
    ) -> Result<(), BeaconStateError> {
        Err(BeaconStateError::SlotOutOfBounds)
    }
}

fn get_harness(spec: &ChainSpec) -> (BeaconState, Vec<Keypair>) {
    BeaconStateBuilder::new(VALIDATOR_COUNT, spec)
        .slot(Slot::new(STATE_SLOT))
        .build_with_keypairs()
}

/// A block that extends the latest block header of `state`, produced by the expected proposer.
fn valid_block(state: &BeaconState, spec: &ChainSpec) -> BeaconBlock {
    let proposer_index = StateProposerOracle
        .proposer_index(state, state.slot, spec)
        .unwrap();

    BeaconBlock {
        slot: state.slot,
        proposer_index,
        parent_root: state.latest_block_header.canonical_root(),
        state_root: Hash256::repeat_byte(0x99),
        body: BeaconBlockBody {
            graffiti: Hash256::repeat_byte(0x01),
            ..BeaconBlockBody::default()
        },
    }
}

fn sign(
    block: BeaconBlock,
    keypairs: &[Keypair],
    state: &BeaconState,
    spec: &ChainSpec,
) -> SignedBeaconBlock {
    let keypair = &keypairs[block.proposer_index as usize];
    block.sign(&keypair.sk, &state.fork, state.genesis_validators_root, spec)
}

/// Runs the unsigned path and asserts that any rejection left `state` untouched.
fn process_unsigned(
    state: &mut BeaconState,
    block: &BeaconBlock,
    spec: &ChainSpec,
) -> Result<u64, HeaderError> {
    let pre_state = state.clone();
    let result = process_block_header(state, &StateProposerOracle, block, spec);
    if result.is_err() {
        assert_eq!(*state, pre_state, "state must not change on rejection");
    }
    result
}

/// Runs the signed path and asserts that any rejection left `state` untouched.
fn process_signed(
    state: &mut BeaconState,
    block: &SignedBeaconBlock,
    spec: &ChainSpec,
) -> Result<u64, HeaderError> {
    let pre_state = state.clone();
    let result = process_signed_block_header(state, &StateProposerOracle, block, None, spec);
    if result.is_err() {
        assert_eq!(*state, pre_state, "state must not change on rejection");
    }
    result
}

#[test]
fn valid_block_ok() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let block = valid_block(&state, &spec);

    let result = process_unsigned(&mut state, &block, &spec);

    assert_eq!(result, Ok(block.proposer_index));
    assert_eq!(state.latest_block_header, block.temporary_block_header(&spec));
}

#[test]
fn committed_header_fields() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let block = valid_block(&state, &spec);

    process_unsigned(&mut state, &block, &spec).unwrap();

    let header = &state.latest_block_header;
    assert_eq!(header.slot, block.slot);
    assert_eq!(header.proposer_index, block.proposer_index);
    assert_eq!(header.parent_root, block.parent_root);
    assert_eq!(header.state_root, spec.zero_hash);
    assert_eq!(header.body_root, block.body.tree_hash_root());
}

#[test]
fn valid_signed_block_ok() {
    let spec = ChainSpec::minimal();
    let (mut state, keypairs) = get_harness(&spec);
    let block = sign(valid_block(&state, &spec), &keypairs, &state, &spec);

    let result = process_signed(&mut state, &block, &spec);

    assert_eq!(result, Ok(block.message.proposer_index));
    assert_eq!(
        state.latest_block_header,
        block.message.temporary_block_header(&spec)
    );
}

#[test]
fn invalid_block_header_state_slot() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    block.slot = Slot::new(STATE_SLOT + 1);

    let result = process_unsigned(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::Invalid(
            HeaderInvalid::StateSlotMismatch {
                state_slot: Slot::new(STATE_SLOT),
                block_slot: Slot::new(STATE_SLOT + 1),
            }
        ))
    );
}

#[test]
fn invalid_proposer_index() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    let state_proposer_index = block.proposer_index;
    block.proposer_index = (state_proposer_index + 1) % VALIDATOR_COUNT as u64;

    let result = process_unsigned(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ProposerIndexMismatch {
                block_proposer_index: block.proposer_index,
                state_proposer_index,
            }
        ))
    );
}

#[test]
fn invalid_older_than_latest_block_header() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = BeaconStateBuilder::new(VALIDATOR_COUNT, &spec)
        .slot(Slot::new(STATE_SLOT))
        .latest_block_header(BeaconBlockHeader {
            slot: Slot::new(STATE_SLOT),
            ..BeaconBlockHeader::default()
        })
        .build_with_keypairs();
    let block = valid_block(&state, &spec);

    let result = process_unsigned(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::Invalid(
            HeaderInvalid::OlderThanLatestBlockHeader {
                block_slot: Slot::new(STATE_SLOT),
                latest_block_header_slot: Slot::new(STATE_SLOT),
            }
        ))
    );
}

#[test]
fn invalid_parent_block_root() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    let mut parent_root = state.latest_block_header.tree_hash_root();
    parent_root.as_bytes_mut()[31] ^= 0x01;
    block.parent_root = parent_root;

    let result = process_unsigned(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ParentBlockRootMismatch {
                state: state.latest_block_header.tree_hash_root(),
                block: parent_root,
            }
        ))
    );
}

#[test]
fn invalid_proposer_slashed() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let block = valid_block(&state, &spec);
    state.validators[block.proposer_index as usize].slashed = true;

    let result = process_unsigned(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::Invalid(HeaderInvalid::ProposerSlashed(
            block.proposer_index
        )))
    );
}

#[test]
fn invalid_block_signature() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let block = valid_block(&state, &spec);

    // Sign the block with a keypair that is not the expected proposer.
    let keypair = Keypair::random();
    let block = block.sign(&keypair.sk, &state.fork, state.genesis_validators_root, &spec);

    let result = process_signed(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ProposalSignatureInvalid
        ))
    );
}

#[test]
fn empty_block_signature() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let block = SignedBeaconBlock {
        message: valid_block(&state, &spec),
        signature: Signature::empty(),
    };

    let result = process_signed(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ProposalSignatureInvalid
        ))
    );
}

#[test]
fn signature_from_another_chain() {
    let spec = ChainSpec::minimal();
    let (mut state, keypairs) = get_harness(&spec);
    let block = valid_block(&state, &spec);
    let keypair = &keypairs[block.proposer_index as usize];
    let block = block.sign(&keypair.sk, &state.fork, Hash256::repeat_byte(0x13), &spec);

    let result = process_signed(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ProposalSignatureInvalid
        ))
    );
}

#[test]
fn provided_block_root() {
    let spec = ChainSpec::minimal();
    let (state, keypairs) = get_harness(&spec);
    let block = sign(valid_block(&state, &spec), &keypairs, &state, &spec);

    let mut good = state.clone();
    assert_eq!(
        process_signed_block_header(
            &mut good,
            &StateProposerOracle,
            &block,
            Some(block.canonical_root()),
            &spec
        ),
        Ok(block.message.proposer_index)
    );

    let mut bad = state.clone();
    assert_eq!(
        process_signed_block_header(
            &mut bad,
            &StateProposerOracle,
            &block,
            Some(Hash256::repeat_byte(0x42)),
            &spec
        ),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ProposalSignatureInvalid
        ))
    );
    assert_eq!(bad, state);
}

#[test]
fn signature_checked_after_header() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    block.parent_root = Hash256::repeat_byte(0xbb);
    let block = SignedBeaconBlock {
        message: block,
        signature: Signature::empty(),
    };

    assert!(matches!(
        process_signed(&mut state, &block, &spec),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ParentBlockRootMismatch { .. }
        ))
    ));
}

#[test]
fn skip_signature_verification() {
    let spec = ChainSpec::minimal();
    let (state, _) = get_harness(&spec);
    let block = SignedBeaconBlock {
        message: valid_block(&state, &spec),
        signature: Signature::empty(),
    };

    let mut unchecked = state.clone();
    assert_eq!(
        per_block_header_processing(
            &mut unchecked,
            &StateProposerOracle,
            &block,
            None,
            VerifySignatures::False,
            &spec
        ),
        Ok(block.message.proposer_index)
    );

    let mut checked = state;
    assert_eq!(
        per_block_header_processing(
            &mut checked,
            &StateProposerOracle,
            &block,
            None,
            VerifySignatures::True,
            &spec
        ),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ProposalSignatureInvalid
        ))
    );
}

#[test]
fn slot_mismatch_reported_before_everything_else() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    state.validators[block.proposer_index as usize].slashed = true;
    block.slot = Slot::new(STATE_SLOT + 2);
    block.proposer_index = (block.proposer_index + 1) % VALIDATOR_COUNT as u64;
    block.parent_root = Hash256::repeat_byte(0xcc);

    assert!(matches!(
        process_unsigned(&mut state, &block, &spec),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::StateSlotMismatch { .. }
        ))
    ));

    // The oracle is not consulted for a block at the wrong slot.
    let pre_state = state.clone();
    assert!(matches!(
        process_block_header(
            &mut state,
            &FixedOracle(Err(BeaconStateError::InsufficientValidators)),
            &block,
            &spec
        ),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::StateSlotMismatch { .. }
        ))
    ));
    assert_eq!(state, pre_state);
}

#[test]
fn proposer_mismatch_reported_before_ancestry() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    state.latest_block_header.slot = Slot::new(STATE_SLOT);
    block.proposer_index = (block.proposer_index + 1) % VALIDATOR_COUNT as u64;
    block.parent_root = Hash256::repeat_byte(0xcc);

    assert!(matches!(
        process_unsigned(&mut state, &block, &spec),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ProposerIndexMismatch { .. }
        ))
    ));
}

#[test]
fn monotonic_reported_before_parent_root() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    state.latest_block_header.slot = Slot::new(STATE_SLOT + 1);
    block.parent_root = Hash256::repeat_byte(0xcc);

    assert!(matches!(
        process_unsigned(&mut state, &block, &spec),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::OlderThanLatestBlockHeader { .. }
        ))
    ));
}

#[test]
fn parent_root_reported_before_slashing() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    state.validators[block.proposer_index as usize].slashed = true;
    block.parent_root = Hash256::repeat_byte(0xcc);

    assert!(matches!(
        process_unsigned(&mut state, &block, &spec),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ParentBlockRootMismatch { .. }
        ))
    ));
}

#[test]
fn oracle_failure_is_internal() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let block = valid_block(&state, &spec);
    let pre_state = state.clone();

    let result = process_block_header(
        &mut state,
        &FixedOracle(Err(BeaconStateError::InsufficientValidators)),
        &block,
        &spec,
    );

    assert_eq!(
        result,
        Err(BlockOperationError::ProposerIndexUnavailable(
            BeaconStateError::InsufficientValidators
        ))
    );
    assert!(result.unwrap_err().is_internal());
    assert_eq!(state, pre_state);
}

#[test]
fn unknown_proposer_is_a_state_error() {
    let spec = ChainSpec::minimal();
    let (mut state, _) = get_harness(&spec);
    let mut block = valid_block(&state, &spec);
    block.proposer_index = 999;
    let pre_state = state.clone();

    let result = process_block_header(&mut state, &FixedOracle(Ok(999)), &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::BeaconStateError(
            BeaconStateError::UnknownValidator(999)
        ))
    );
    assert!(result.unwrap_err().is_internal());
    assert_eq!(state, pre_state);
}

#[test]
fn undecodable_proposer_key() {
    let spec = ChainSpec::minimal();
    let (mut state, keypairs) = get_harness(&spec);
    let block = sign(valid_block(&state, &spec), &keypairs, &state, &spec);
    let proposer_index = block.message.proposer_index;
    state.validators[proposer_index as usize].pubkey = PublicKeyBytes::empty();

    let result = process_signed(&mut state, &block, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::SignatureSetError(
            SignatureSetError::BadBlsBytes {
                validator_index: proposer_index
            }
        ))
    );
    assert!(result.unwrap_err().is_internal());
}

#[test]
fn failed_mutation_is_reported() {
    let spec = ChainSpec::minimal();
    let (state, keypairs) = get_harness(&spec);
    let block = sign(valid_block(&state, &spec), &keypairs, &state, &spec);
    let oracle = FixedOracle(Ok(block.message.proposer_index));
    let mut read_only = ReadOnlyState(state.clone());

    let result = process_signed_block_header(&mut read_only, &oracle, &block, None, &spec);

    assert_eq!(
        result,
        Err(BlockOperationError::StateMutationFailed(
            BeaconStateError::SlotOutOfBounds
        ))
    );
    assert!(result.unwrap_err().is_internal());
    assert_eq!(read_only, ReadOnlyState(state));
}

#[test]
fn invalid_blocks_are_not_internal() {
    let error: HeaderError = BlockOperationError::invalid(HeaderInvalid::ProposerSlashed(3));
    assert!(!error.is_internal());
}

#[test]
fn replayed_block_is_rejected() {
    let spec = ChainSpec::minimal();
    let (mut state, keypairs) = get_harness(&spec);
    let block = sign(valid_block(&state, &spec), &keypairs, &state, &spec);

    assert!(process_signed(&mut state, &block, &spec).is_ok());
    assert_eq!(
        process_signed(&mut state, &block, &spec),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::OlderThanLatestBlockHeader {
                block_slot: Slot::new(STATE_SLOT),
                latest_block_header_slot: Slot::new(STATE_SLOT),
            }
        ))
    );
}

#[test]
fn chain_of_headers() {
    let spec = ChainSpec::minimal();
    let (mut state, keypairs) = get_harness(&spec);

    let first = sign(valid_block(&state, &spec), &keypairs, &state, &spec);
    assert!(process_signed(&mut state, &first, &spec).is_ok());

    state.slot = Slot::new(STATE_SLOT + 1);
    let second = sign(valid_block(&state, &spec), &keypairs, &state, &spec);
    assert_eq!(
        second.message.parent_root,
        first.message.temporary_block_header(&spec).canonical_root()
    );
    assert!(process_signed(&mut state, &second, &spec).is_ok());
    assert_eq!(state.latest_block_header.slot, Slot::new(STATE_SLOT + 1));

    // The first block no longer fits the advanced state.
    assert!(matches!(
        process_signed(&mut state, &first, &spec),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::StateSlotMismatch { .. }
        ))
    ));
}

#[test]
fn processing_is_deterministic() {
    let spec = ChainSpec::minimal();
    let (state, keypairs) = get_harness(&spec);
    let block = sign(valid_block(&state, &spec), &keypairs, &state, &spec);

    let mut a = state.clone();
    let mut b = state;
    assert_eq!(
        process_signed(&mut a, &block, &spec),
        process_signed(&mut b, &block, &spec)
    );
    assert_eq!(a, b);
}

#[test]
fn verify_block_header_does_not_mutate() {
    let spec = ChainSpec::minimal();
    let (state, _) = get_harness(&spec);
    let block = valid_block(&state, &spec);

    let header = verify_block_header(&state, &StateProposerOracle, &block, &spec).unwrap();

    assert_eq!(header, block.temporary_block_header(&spec));
    assert_ne!(state.latest_block_header, header);
}

/// Signed blocks at every slot of the first epoch, each valid against `state` advanced to its
/// slot.
fn blocks_for_epoch(
    state: &BeaconState,
    keypairs: &[Keypair],
    spec: &ChainSpec,
) -> Vec<SignedBeaconBlock> {
    (1..spec.slots_per_epoch)
        .map(|slot| {
            let state = BeaconState {
                slot: Slot::new(slot),
                ..state.clone()
            };
            sign(valid_block(&state, spec), keypairs, &state, spec)
        })
        .collect()
}

#[test]
fn bulk_verification_agrees_with_single() {
    let spec = ChainSpec::minimal();
    let (state, keypairs) = get_harness(&spec);
    let blocks = blocks_for_epoch(&state, &keypairs, &spec);

    for block in &blocks {
        assert_eq!(verify_block_signature(&state, block, None, &spec), Ok(()));
    }
    assert_eq!(
        ProposalSignatureVerifier::verify_blocks(
            |i| get_pubkey_from_state(&state, i),
            state.fork,
            state.genesis_validators_root,
            &blocks,
            &spec
        ),
        Ok(())
    );
}

#[test]
fn bulk_verification_detects_one_bad_signature() {
    let spec = ChainSpec::minimal();
    let (state, keypairs) = get_harness(&spec);
    let mut blocks = blocks_for_epoch(&state, &keypairs, &spec);
    blocks[3].signature = blocks[2].signature.clone();

    assert_eq!(
        verify_block_signature(&state, &blocks[3], None, &spec),
        Err(BlockOperationError::Invalid(
            HeaderInvalid::ProposalSignatureInvalid
        ))
    );
    assert_eq!(
        ProposalSignatureVerifier::verify_blocks(
            |i| get_pubkey_from_state(&state, i),
            state.fork,
            state.genesis_validators_root,
            &blocks,
            &spec
        ),
        Err(VerifierError::SignatureInvalid)
    );
}

#[test]
fn bulk_verification_edge_cases() {
    let spec = ChainSpec::minimal();
    let (state, keypairs) = get_harness(&spec);

    let mut verifier = ProposalSignatureVerifier::new(
        |i| get_pubkey_from_state(&state, i),
        state.fork,
        state.genesis_validators_root,
        &spec,
    );
    assert_eq!(verifier.num_sets(), 0);

    let block = sign(valid_block(&state, &spec), &keypairs, &state, &spec);
    let unknown = SignedBeaconBlock {
        message: BeaconBlock {
            proposer_index: 999,
            ..block.message.clone()
        },
        signature: block.signature.clone(),
    };
    assert_eq!(
        verifier.include_block_proposal(&unknown, None),
        Err(VerifierError::SignatureSetError(
            SignatureSetError::ValidatorUnknown(999)
        ))
    );
    assert_eq!(verifier.num_sets(), 0);
    assert_eq!(verifier.verify(), Ok(()));
}
