use crate::*;
use ethereum_hashing::hash;
use rayon::prelude::*;

/// Generates `validator_count` keypairs where the secret key is derived from the index of the
/// validator.
///
/// The same index always yields the same keypair, so tests can re-derive the key of any
/// validator in a state built with `BeaconStateBuilder`.
pub fn generate_deterministic_keypairs(validator_count: usize) -> Vec<Keypair> {
    (0..validator_count)
        .into_par_iter()
        .map(generate_deterministic_keypair)
        .collect()
}

/// Generates a single deterministic keypair from `validator_index`.
pub fn generate_deterministic_keypair(validator_index: usize) -> Keypair {
    let mut secret = hash(&(validator_index as u64).to_le_bytes());
    // Clearing the most significant byte keeps the scalar below the curve order.
    secret[0] = 0;
    let sk = SecretKey::deserialize(&secret).expect("should be a valid secret key");
    Keypair::from_components(sk.public_key(), sk)
}
