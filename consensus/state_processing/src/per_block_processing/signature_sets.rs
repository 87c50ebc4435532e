//! A `SignatureSet` is an abstraction over the components of a signature. A `SignatureSet` may be
//! validated individually, or alongside in others in a potentially cheaper bulk operation.
//!
//! This module exposes one function to extract a `SignatureSet` from a block proposal.
use crate::ChainStateAccessor;
use bls::SignatureSet;
use std::borrow::Cow;
use tree_hash::TreeHash;
use types::{
    BeaconStateError, ChainSpec, Domain, Fork, Hash256, PublicKey, SignedBeaconBlock, SigningData,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// There was an error attempting to read from a `BeaconState`.
    BeaconStateError(BeaconStateError),
    /// There is no public key for the validator at the given index.
    ValidatorUnknown(u64),
    /// The registered public key for the validator could not be decompressed.
    BadBlsBytes { validator_index: u64 },
}

impl From<BeaconStateError> for Error {
    fn from(e: BeaconStateError) -> Error {
        Error::BeaconStateError(e)
    }
}

/// Loads and decompresses the public key of the validator at `validator_index`.
pub fn get_pubkey_from_state<S>(
    state: &S,
    validator_index: u64,
) -> Result<Cow<'static, PublicKey>>
where
    S: ChainStateAccessor + ?Sized,
{
    let pubkey_bytes = state
        .validator_pubkey(validator_index)
        .map_err(|e| match e {
            BeaconStateError::UnknownValidator(_) => Error::ValidatorUnknown(validator_index),
            e => Error::BeaconStateError(e),
        })?;

    pubkey_bytes
        .decompress()
        .map(Cow::Owned)
        .map_err(|_| Error::BadBlsBytes { validator_index })
}

/// A signature set that is valid if a block was signed by the expected block producer.
///
/// The signing key is that of `signed_block.message.proposer_index`; the caller must already have
/// checked that index against the expected proposer.
pub fn block_proposal_signature_set<'a, S, F>(
    state: &S,
    get_pubkey: F,
    signed_block: &'a SignedBeaconBlock,
    block_root: Option<Hash256>,
    spec: &ChainSpec,
) -> Result<SignatureSet<'a>>
where
    S: ChainStateAccessor + ?Sized,
    F: Fn(u64) -> Result<Cow<'a, PublicKey>>,
{
    block_proposal_signature_set_from_parts(
        signed_block,
        block_root,
        signed_block.message.proposer_index,
        &state.fork(),
        state.genesis_validators_root(),
        get_pubkey,
        spec,
    )
}

/// A signature set that is valid if a block was signed by the expected block producer.
///
/// Unlike `block_proposal_signature_set` this does not take a state, so it can be used when the
/// fork and genesis validators root are known from elsewhere.
pub fn block_proposal_signature_set_from_parts<'a, F>(
    signed_block: &'a SignedBeaconBlock,
    block_root: Option<Hash256>,
    proposer_index: u64,
    fork: &Fork,
    genesis_validators_root: Hash256,
    get_pubkey: F,
    spec: &ChainSpec,
) -> Result<SignatureSet<'a>>
where
    F: Fn(u64) -> Result<Cow<'a, PublicKey>>,
{
    let block = &signed_block.message;
    let domain = spec.get_domain(
        block.epoch(spec.slots_per_epoch),
        Domain::BeaconProposer,
        fork,
        genesis_validators_root,
    );

    let message = SigningData {
        object_root: block_root.unwrap_or_else(|| block.tree_hash_root()),
        domain,
    }
    .tree_hash_root();

    Ok(SignatureSet::single_pubkey(
        &signed_block.signature,
        get_pubkey(proposer_index)?,
        message,
    ))
}
