use types::{
    BeaconBlockHeader, BeaconState, BeaconStateError, ChainSpec, Fork, Hash256, PublicKeyBytes,
    Slot, Validator,
};

/// Read and write access to the parts of a chain state that header admission needs.
///
/// All reads are side-effect free. `set_latest_block_header` is the only mutation and is called
/// at most once per admitted block, after every check has passed.
pub trait ChainStateAccessor {
    fn slot(&self) -> Slot;

    fn latest_block_header(&self) -> &BeaconBlockHeader;

    /// Returns `Err(UnknownValidator(index))` if there is no validator at `index`.
    fn validator_slashed(&self, index: u64) -> Result<bool, BeaconStateError>;

    /// The compressed public key registered for the validator at `index`.
    fn validator_pubkey(&self, index: u64) -> Result<PublicKeyBytes, BeaconStateError>;

    fn fork(&self) -> Fork;

    fn genesis_validators_root(&self) -> Hash256;

    fn set_latest_block_header(&mut self, header: BeaconBlockHeader)
        -> Result<(), BeaconStateError>;
}

impl ChainStateAccessor for BeaconState {
    fn slot(&self) -> Slot {
        self.slot
    }

    fn latest_block_header(&self) -> &BeaconBlockHeader {
        &self.latest_block_header
    }

    fn validator_slashed(&self, index: u64) -> Result<bool, BeaconStateError> {
        validator(self, index).map(|v| v.slashed)
    }

    fn validator_pubkey(&self, index: u64) -> Result<PublicKeyBytes, BeaconStateError> {
        validator(self, index).map(|v| v.pubkey)
    }

    fn fork(&self) -> Fork {
        self.fork
    }

    fn genesis_validators_root(&self) -> Hash256 {
        self.genesis_validators_root
    }

    fn set_latest_block_header(
        &mut self,
        header: BeaconBlockHeader,
    ) -> Result<(), BeaconStateError> {
        self.latest_block_header = header;
        Ok(())
    }
}

/// Indices that do not fit in a `usize` can never be in the registry.
fn validator(state: &BeaconState, index: u64) -> Result<&Validator, BeaconStateError> {
    let index =
        usize::try_from(index).map_err(|_| BeaconStateError::UnknownValidator(usize::MAX))?;
    state.get_validator(index)
}

/// Determines which validator is entitled to propose at a given slot.
pub trait ProposerOracle<S: ?Sized> {
    fn proposer_index(&self, state: &S, slot: Slot, spec: &ChainSpec)
        -> Result<u64, BeaconStateError>;
}

/// Computes the proposer from the state's own validator registry and RANDAO mixes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateProposerOracle;

impl ProposerOracle<BeaconState> for StateProposerOracle {
    fn proposer_index(
        &self,
        state: &BeaconState,
        slot: Slot,
        spec: &ChainSpec,
    ) -> Result<u64, BeaconStateError> {
        state
            .get_beacon_proposer_index(slot, spec)
            .map(|index| index as u64)
    }
}
