#![allow(clippy::arithmetic_side_effects)]

use super::signature_sets::{
    block_proposal_signature_set_from_parts, Error as SignatureSetError, Result as SetResult,
};
use bls::{verify_signature_sets, PublicKey, SignatureSet};
use rayon::prelude::*;
use std::borrow::Cow;
use types::{ChainSpec, Fork, Hash256, SignedBeaconBlock};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// All public keys were found but signature verification failed. At least one block is
    /// invalid.
    SignatureInvalid,
    /// Failed to load a signature set. The blocks may be invalid or we failed to process them.
    SignatureSetError(SignatureSetError),
}

impl From<SignatureSetError> for Error {
    fn from(e: SignatureSetError) -> Error {
        Error::SignatureSetError(e)
    }
}

/// Collects the proposal signatures of many blocks so they can be verified in one batch.
///
/// The blocks need not share a parent; they only need to share a fork and genesis validators
/// root. The proposer of each block is taken from the block itself, so this should be used after
/// (or alongside) a check that each proposer is the expected one.
pub struct ProposalSignatureVerifier<'a, F>
where
    F: Fn(u64) -> SetResult<Cow<'a, PublicKey>>,
{
    get_pubkey: F,
    fork: Fork,
    genesis_validators_root: Hash256,
    spec: &'a ChainSpec,
    sets: ParallelSignatureSets<'a>,
}

impl<'a, F> ProposalSignatureVerifier<'a, F>
where
    F: Fn(u64) -> SetResult<Cow<'a, PublicKey>>,
{
    /// Create a new verifier without any included signatures.
    pub fn new(
        get_pubkey: F,
        fork: Fork,
        genesis_validators_root: Hash256,
        spec: &'a ChainSpec,
    ) -> Self {
        Self {
            get_pubkey,
            fork,
            genesis_validators_root,
            spec,
            sets: ParallelSignatureSets::default(),
        }
    }

    /// Verify all the proposal signatures of `blocks` in a single batch.
    pub fn verify_blocks(
        get_pubkey: F,
        fork: Fork,
        genesis_validators_root: Hash256,
        blocks: &'a [SignedBeaconBlock],
        spec: &'a ChainSpec,
    ) -> Result<()> {
        let mut verifier = Self::new(get_pubkey, fork, genesis_validators_root, spec);
        for block in blocks {
            verifier.include_block_proposal(block, None)?;
        }
        verifier.verify()
    }

    /// Includes the block proposal signature of `block`.
    ///
    /// `block_root` may be provided to avoid recomputing the root of `block.message`.
    pub fn include_block_proposal(
        &mut self,
        block: &'a SignedBeaconBlock,
        block_root: Option<Hash256>,
    ) -> Result<()> {
        let set = block_proposal_signature_set_from_parts(
            block,
            block_root,
            block.message.proposer_index,
            &self.fork,
            self.genesis_validators_root,
            &self.get_pubkey,
            self.spec,
        )?;
        self.sets.push(set);
        Ok(())
    }

    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Verify all `self.sets` in a single batch, in parallel.
    ///
    /// Verifying no signatures at all succeeds.
    pub fn verify(self) -> Result<()> {
        if self.sets.verify() {
            Ok(())
        } else {
            Err(Error::SignatureInvalid)
        }
    }
}

#[derive(Default)]
pub struct ParallelSignatureSets<'a> {
    sets: Vec<SignatureSet<'a>>,
}

impl<'a> From<Vec<SignatureSet<'a>>> for ParallelSignatureSets<'a> {
    fn from(sets: Vec<SignatureSet<'a>>) -> Self {
        Self { sets }
    }
}

impl<'a> ParallelSignatureSets<'a> {
    pub fn push(&mut self, set: SignatureSet<'a>) {
        self.sets.push(set);
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Verify all the signatures that have been included in `self`, returning `true` if and only if
    /// all the signatures are valid.
    ///
    /// ## Notes
    ///
    /// It is not possible to know exactly _which_ signature is invalid here, just that
    /// _at least one_ was invalid.
    ///
    /// Uses `rayon` to do a map-reduce of batched verification across multiple cores.
    #[must_use]
    pub fn verify(self) -> bool {
        let num_sets = self.sets.len();
        let num_chunks = std::cmp::max(1, num_sets / rayon::current_num_threads());
        self.sets
            .into_par_iter()
            .chunks(num_chunks)
            .map(|chunk| verify_signature_sets(chunk.iter()))
            .reduce(|| true, |current, this| current && this)
    }
}
