use super::generate_deterministic_keypairs;
use crate::*;

/// Builds a `BeaconState` whose validators hold deterministic keys.
///
/// Every validator is active from genesis with the maximum effective balance.
pub struct BeaconStateBuilder {
    state: BeaconState,
    keypairs: Vec<Keypair>,
}

impl BeaconStateBuilder {
    pub fn new(validator_count: usize, spec: &ChainSpec) -> Self {
        let keypairs = generate_deterministic_keypairs(validator_count);
        let validators = keypairs
            .iter()
            .map(|keypair| Validator::genesis(keypair.pk.compress(), spec))
            .collect();

        Self {
            state: BeaconState::new(Hash256::repeat_byte(0x42), validators, spec),
            keypairs,
        }
    }

    /// Sets the state slot, leaving the latest block header untouched.
    pub fn slot(mut self, slot: Slot) -> Self {
        self.state.slot = slot;
        self
    }

    /// Sets the latest block header.
    pub fn latest_block_header(mut self, header: BeaconBlockHeader) -> Self {
        self.state.latest_block_header = header;
        self
    }

    /// Sets `slashed` on the validator at `index`.
    ///
    /// Panics if there is no such validator.
    pub fn slash(mut self, index: usize) -> Self {
        self.state.validators[index].slashed = true;
        self
    }

    pub fn keypairs(&self) -> &[Keypair] {
        &self.keypairs
    }

    pub fn build(self) -> BeaconState {
        self.state
    }

    pub fn build_with_keypairs(self) -> (BeaconState, Vec<Keypair>) {
        (self.state, self.keypairs)
    }
}
