//! Provides the "swap-or-not" index permutation used to select block proposers.
//!
//! `compute_shuffled_index` computes where a single index lands after shuffling a list of
//! `list_size` elements under `seed`, without materializing the list. Proposer selection only
//! ever samples a handful of positions from the active validator set, so the whole-list variant
//! is not provided.

mod compute_shuffled_index;

pub use compute_shuffled_index::compute_shuffled_index;

type Hash256 = ethereum_types::H256;
