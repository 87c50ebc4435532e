use crate::*;
use ethereum_hashing::hash;
use safe_arith::{ArithError, SafeArith};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use swap_or_not_shuffle::compute_shuffled_index;

const MAX_RANDOM_BYTE: u64 = (1 << 8) - 1;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    SlotOutOfBounds,
    UnknownValidator(usize),
    UnableToShuffle,
    ShuffleIndexOutOfBounds(usize),
    InsufficientValidators,
    InsufficientRandaoMixes,
    RandaoMixesOutOfBounds(usize),
    BlsError(bls::Error),
    /// An arithmetic operation occurred which would have overflowed or divided by 0.
    ArithError(ArithError),
}

impl From<ArithError> for Error {
    fn from(e: ArithError) -> Self {
        Error::ArithError(e)
    }
}

impl From<bls::Error> for Error {
    fn from(e: bls::Error) -> Self {
        Error::BlsError(e)
    }
}

/// The parts of the beacon chain state that block-header admission reads and writes.
///
/// Held in memory; nothing here is persisted.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct BeaconState {
    pub genesis_validators_root: Hash256,
    pub slot: Slot,
    pub fork: Fork,
    pub latest_block_header: BeaconBlockHeader,
    pub validators: Vec<Validator>,
    pub randao_mixes: Vec<Hash256>,
}

impl BeaconState {
    /// Create a new state with the given validator registry, at slot zero.
    ///
    /// The RANDAO mixes are all `spec.zero_hash`, and the latest block header is that of
    /// `BeaconBlock::empty`.
    pub fn new(
        genesis_validators_root: Hash256,
        validators: Vec<Validator>,
        spec: &ChainSpec,
    ) -> Self {
        BeaconState {
            genesis_validators_root,
            slot: Slot::new(0),
            fork: Fork {
                previous_version: spec.genesis_fork_version,
                current_version: spec.genesis_fork_version,
                epoch: Epoch::new(0),
            },
            latest_block_header: BeaconBlock::empty(spec).temporary_block_header(spec),
            validators,
            randao_mixes: vec![spec.zero_hash; spec.epochs_per_historical_vector as usize],
        }
    }

    /// The epoch corresponding to `self.slot`.
    pub fn current_epoch(&self, spec: &ChainSpec) -> Epoch {
        self.slot.epoch(spec.slots_per_epoch)
    }

    /// Safe indexer for the `validators` list.
    pub fn get_validator(&self, validator_index: usize) -> Result<&Validator, Error> {
        self.validators
            .get(validator_index)
            .ok_or(Error::UnknownValidator(validator_index))
    }

    /// Return the effective balance for a validator with the given `validator_index`.
    pub fn get_effective_balance(&self, validator_index: usize) -> Result<u64, Error> {
        self.get_validator(validator_index)
            .map(|v| v.effective_balance)
    }

    /// Returns the indices of all validators active at `epoch`, in ascending order.
    pub fn get_active_validator_indices(&self, epoch: Epoch) -> Vec<usize> {
        self.validators
            .iter()
            .enumerate()
            .filter_map(|(index, validator)| {
                if validator.is_active_at(epoch) {
                    Some(index)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Returns the beacon proposer index for the `slot` in `self.current_epoch()`.
    pub fn get_beacon_proposer_index(&self, slot: Slot, spec: &ChainSpec) -> Result<usize, Error> {
        // Proposer indices are only known for the current epoch, due to the dependence on the
        // effective balances of validators, which change at every epoch transition.
        let epoch = slot.epoch(spec.slots_per_epoch);
        if epoch != self.current_epoch(spec) {
            return Err(Error::SlotOutOfBounds);
        }

        let seed = self.get_beacon_proposer_seed(slot, spec)?;
        let indices = self.get_active_validator_indices(epoch);

        self.compute_proposer_index(&indices, &seed, spec)
    }

    /// Compute the seed to use for the beacon proposer selection at the given `slot`.
    pub fn get_beacon_proposer_seed(&self, slot: Slot, spec: &ChainSpec) -> Result<Vec<u8>, Error> {
        let epoch = slot.epoch(spec.slots_per_epoch);
        let mut preimage = self
            .get_seed(epoch, Domain::BeaconProposer, spec)?
            .as_bytes()
            .to_vec();
        preimage.extend_from_slice(&slot.as_u64().to_le_bytes());
        Ok(hash(&preimage))
    }

    /// Compute the proposer from a list of active validator indices.
    ///
    /// Candidates are sampled in shuffled order and accepted with probability proportional to
    /// their effective balance.
    pub fn compute_proposer_index(
        &self,
        indices: &[usize],
        seed: &[u8],
        spec: &ChainSpec,
    ) -> Result<usize, Error> {
        if indices.is_empty() {
            return Err(Error::InsufficientValidators);
        }

        let mut i: usize = 0;
        loop {
            let shuffled_index = compute_shuffled_index(
                i.safe_rem(indices.len())?,
                indices.len(),
                seed,
                spec.shuffle_round_count,
            )
            .ok_or(Error::UnableToShuffle)?;
            let candidate_index = *indices
                .get(shuffled_index)
                .ok_or(Error::ShuffleIndexOutOfBounds(shuffled_index))?;
            let random_byte = Self::shuffling_random_byte(i, seed)?;
            let effective_balance = self.get_effective_balance(candidate_index)?;
            if effective_balance.safe_mul(MAX_RANDOM_BYTE)?
                >= spec
                    .max_effective_balance
                    .safe_mul(u64::from(random_byte))?
            {
                return Ok(candidate_index);
            }
            i.safe_add_assign(1)?;
        }
    }

    /// Get a random byte from the given `seed`.
    fn shuffling_random_byte(i: usize, seed: &[u8]) -> Result<u8, Error> {
        let mut preimage = seed.to_vec();
        preimage.extend_from_slice(&(i.safe_div(32)? as u64).to_le_bytes());
        let index = i.safe_rem(32)?;
        hash(&preimage)
            .get(index)
            .copied()
            .ok_or(Error::ShuffleIndexOutOfBounds(index))
    }

    /// Generate a seed for the given `epoch`.
    pub fn get_seed(
        &self,
        epoch: Epoch,
        domain_type: Domain,
        spec: &ChainSpec,
    ) -> Result<Hash256, Error> {
        if self.randao_mixes.is_empty() {
            return Err(Error::InsufficientRandaoMixes);
        }

        // Bypass the safe getter for RANDAO so we can gracefully handle the scenario where `epoch
        // == 0`.
        let mix = {
            let i = epoch
                .as_u64()
                .safe_add(spec.epochs_per_historical_vector)?
                .safe_sub(spec.min_seed_lookahead.as_u64())?
                .safe_sub(1)?;
            let i_mod = (i as usize).safe_rem(self.randao_mixes.len())?;
            self.randao_mixes
                .get(i_mod)
                .ok_or(Error::RandaoMixesOutOfBounds(i_mod))?
        };
        let domain_bytes = spec.get_domain_constant(domain_type).to_le_bytes();
        let epoch_bytes = epoch.as_u64().to_le_bytes();

        const NUM_DOMAIN_BYTES: usize = 4;
        const NUM_EPOCH_BYTES: usize = 8;
        const MIX_OFFSET: usize = NUM_DOMAIN_BYTES + NUM_EPOCH_BYTES;
        const NUM_MIX_BYTES: usize = 32;

        let mut preimage = [0; NUM_DOMAIN_BYTES + NUM_EPOCH_BYTES + NUM_MIX_BYTES];
        preimage[0..NUM_DOMAIN_BYTES].copy_from_slice(&domain_bytes);
        preimage[NUM_DOMAIN_BYTES..MIX_OFFSET].copy_from_slice(&epoch_bytes);
        preimage[MIX_OFFSET..].copy_from_slice(mix.as_bytes());

        Ok(Hash256::from_slice(&hash(&preimage)))
    }
}
